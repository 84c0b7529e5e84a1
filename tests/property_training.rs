use bucle::data::{linear_batches, DataBunch};
use bucle::loss::MseLoss;
use bucle::model::Linear;
use bucle::optim::Sgd;
use bucle::schedule::{Schedule, Shape};
use bucle::train::{EarlyStopping, Learner, LrScheduler, Recorder};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn learner_for_line(
    seed: u64,
    batch_size: usize,
    batch_count: usize,
    valid_count: usize,
    lr: f32,
) -> Learner<Linear> {
    let mut rng = StdRng::seed_from_u64(seed);
    let train = linear_batches(&mut rng, 2.0, -1.0, batch_size, batch_count, 0.05);
    let valid = linear_batches(&mut rng, 2.0, -1.0, batch_size, valid_count, 0.0);
    Learner::new(
        Linear::new(0.0, 0.0),
        Box::new(Sgd::new(lr, 0.0)),
        Box::new(MseLoss),
        DataBunch::repeat(train, valid),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // =============================================================================
    // Schedule Property Tests (public API)
    // =============================================================================

    #[test]
    fn prop_schedule_stays_between_endpoints(
        start in 0.001f32..1.0,
        end in 0.001f32..1.0,
        t in 0.0f32..=1.0
    ) {
        for shape in [Shape::Linear, Shape::Cosine, Shape::Exponential] {
            let sched = Schedule::new(shape, start, Some(end)).unwrap();
            let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
            let value = sched.at(t);
            prop_assert!(
                value >= lo - 1e-5 && value <= hi + 1e-5,
                "{:?} produced {} outside [{}, {}] at t={}",
                shape, value, lo, hi, t
            );
        }
    }

    #[test]
    fn prop_scheduler_history_follows_schedule(
        epochs in 1usize..4,
        batch_count in 2usize..8
    ) {
        let mut learner = learner_for_line(11, 4, batch_count, 0, 0.01);
        let sched = Schedule::new(Shape::Linear, 0.1, Some(0.01)).unwrap();
        let handle = learner.add_callback(LrScheduler::new(sched.clone()));
        learner.add_callback(Recorder::new().quiet());

        learner.fit(epochs).unwrap();

        let total = epochs * batch_count;
        let lrs = learner.callback(handle).lrs();
        prop_assert_eq!(lrs.len(), total);
        for (i, lr) in lrs.iter().enumerate() {
            let expected = sched.at(i as f32 / (total - 1) as f32);
            prop_assert!((lr - expected).abs() < 1e-6);
        }
    }

    // =============================================================================
    // Training Loop Property Tests
    // =============================================================================

    #[test]
    fn prop_recorder_tracks_one_entry_per_epoch(
        epochs in 1usize..5,
        batch_count in 1usize..6,
        valid_count in 0usize..3
    ) {
        let mut learner = learner_for_line(3, 4, batch_count, valid_count, 0.05);
        let handle = learner.add_callback(Recorder::new().quiet());

        learner.fit(epochs).unwrap();

        let rec = learner.callback(handle);
        prop_assert_eq!(rec.train_losses.len(), epochs);
        prop_assert_eq!(rec.valid_losses.len(), epochs);
        prop_assert!(rec.train_losses.iter().all(|l| l.is_finite()));
    }

    #[test]
    fn prop_training_reduces_loss_on_clean_line(seed in 0u64..64) {
        let mut learner = learner_for_line(seed, 8, 10, 2, 0.1);
        let handle = learner.add_callback(Recorder::new().quiet());

        learner.fit(20).unwrap();

        let rec = learner.callback(handle);
        let first = rec.train_losses[0];
        let last = *rec.train_losses.last().unwrap();
        prop_assert!(
            last < first,
            "loss did not decrease: first={}, last={}",
            first, last
        );
    }
}

#[test]
fn early_stopping_halts_a_stalled_fit() {
    // lr 0 freezes the model, so no epoch ever improves on the first.
    let mut learner = learner_for_line(5, 4, 3, 1, 0.0);
    let recorder = learner.add_callback(Recorder::new().quiet());
    learner.add_callback(EarlyStopping::new(3, 1e-4));

    learner.fit(50).unwrap();

    let epochs_run = learner.callback(recorder).train_losses.len();
    assert!(epochs_run < 50, "fit ran all {} epochs", epochs_run);
    assert_eq!(epochs_run, 4);
}
