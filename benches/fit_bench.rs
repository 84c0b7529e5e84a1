//! Performance benchmarks for the training loop.
//!
//! Measures fit throughput and the per-event cost of callback dispatch.

use bucle::data::{linear_batches, DataBunch};
use bucle::loss::MseLoss;
use bucle::model::Linear;
use bucle::optim::Sgd;
use bucle::train::{Callback, Control, Event, Learner, LoopState, Recorder};
use bucle::Model;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Callback that does nothing, to isolate dispatch overhead.
struct Noop;

impl<M: Model> Callback<M> for Noop {
    fn on_event(&mut self, _state: &mut LoopState<M>, _event: Event) -> Control {
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn fixture(batch_count: usize) -> Learner<Linear> {
    let mut rng = StdRng::seed_from_u64(7);
    let train = linear_batches(&mut rng, 2.0, 3.0, 16, batch_count, 0.0);
    Learner::new(
        Linear::new(0.0, 0.0),
        Box::new(Sgd::new(0.01, 0.0)),
        Box::new(MseLoss),
        DataBunch::repeat(train, vec![]),
    )
}

/// Benchmark one epoch of fit over growing batch counts
fn bench_fit_epoch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Learner");

    for size in [10, 100, 1_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("fit_epoch", size), size, |b, &size| {
            b.iter(|| {
                let mut learner = fixture(size);
                learner.add_callback(Recorder::new().quiet());
                learner.fit(1).unwrap();
                black_box(learner.state.model.params()[0])
            });
        });
    }
    group.finish();
}

/// Benchmark callback dispatch cost as the registry grows
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dispatch");

    for count in [1, 8, 64].iter() {
        group.bench_with_input(BenchmarkId::new("noop_callbacks", count), count, |b, &count| {
            b.iter(|| {
                let mut learner = fixture(100);
                for _ in 0..count {
                    learner.add_callback(Noop);
                }
                learner.fit(1).unwrap();
                black_box(learner.state.last_loss)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit_epoch, bench_dispatch);
criterion_main!(benches);
