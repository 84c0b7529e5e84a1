//! Loss and metric recording callback

use super::callback::Callback;
use super::event::{Control, Event};
use super::learner::LoopState;
use crate::metrics::Metric;
use crate::model::Model;
use std::any::Any;

/// Callback that records per-epoch training and validation losses plus any
/// registered metrics.
///
/// At each phase start the running loss sum, sample count, and every metric
/// accumulator are reset. At every `BatchEnd` the batch loss (weighted by
/// batch size) and the (output, target) pair are folded in. `TrainEnd`
/// appends the mean training loss; `ValidateEnd` appends the mean
/// validation loss and a snapshot of all metric values. `EpochEnd` prints a
/// one-line summary, with the literal `nil` for metrics that saw no
/// samples.
pub struct Recorder<M: Model> {
    metrics: Vec<Box<dyn Metric<M::Output, M::Target>>>,
    loss_sum: f32,
    sample_count: usize,
    /// Mean training loss per epoch.
    pub train_losses: Vec<f32>,
    /// Mean validation loss per epoch.
    pub valid_losses: Vec<f32>,
    /// Metric snapshots, one row per epoch, one column per metric.
    pub metric_values: Vec<Vec<Option<f32>>>,
    /// Print the epoch summary line (on by default).
    pub verbose: bool,
}

impl<M: Model> Recorder<M> {
    pub fn new() -> Self {
        Self {
            metrics: Vec::new(),
            loss_sum: 0.0,
            sample_count: 0,
            train_losses: Vec::new(),
            valid_losses: Vec::new(),
            metric_values: Vec::new(),
            verbose: true,
        }
    }

    /// Register a metric to accumulate over each validation phase.
    pub fn with_metric<Me>(mut self, metric: Me) -> Self
    where
        Me: Metric<M::Output, M::Target> + 'static,
    {
        self.metrics.push(Box::new(metric));
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    fn reset_phase(&mut self) {
        self.loss_sum = 0.0;
        self.sample_count = 0;
        for metric in &mut self.metrics {
            metric.reset();
        }
    }

    fn mean_loss(&self) -> f32 {
        if self.sample_count == 0 {
            0.0
        } else {
            self.loss_sum / self.sample_count as f32
        }
    }

    fn print_summary(&self, epoch: usize, epoch_count: usize) {
        let train = self
            .train_losses
            .last()
            .map(|l| format!("{:.4}", l))
            .unwrap_or_else(|| "nil".into());
        let valid = self
            .valid_losses
            .last()
            .map(|l| format!("{:.4}", l))
            .unwrap_or_else(|| "nil".into());
        let mut line = format!(
            "Epoch {}/{}: train_loss: {}, valid_loss: {}",
            epoch + 1,
            epoch_count,
            train,
            valid
        );
        if let Some(row) = self.metric_values.last() {
            for (metric, value) in self.metrics.iter().zip(row) {
                let formatted = value
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_else(|| "nil".into());
                line.push_str(&format!(", {}: {}", metric.name(), formatted));
            }
        }
        println!("{}", line);
    }
}

impl<M: Model> Default for Recorder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model + 'static> Callback<M> for Recorder<M> {
    fn on_event(&mut self, state: &mut LoopState<M>, event: Event) -> Control {
        match event {
            Event::TrainBegin | Event::ValidateBegin => self.reset_phase(),
            Event::BatchEnd => {
                if let Some(loss) = state.last_loss {
                    self.loss_sum += loss * state.last_batch_size as f32;
                    self.sample_count += state.last_batch_size;
                }
                if let (Some(output), Some(target)) = (&state.last_output, &state.last_target) {
                    for metric in &mut self.metrics {
                        metric.accumulate(output, target);
                    }
                }
            }
            Event::TrainEnd => self.train_losses.push(self.mean_loss()),
            Event::ValidateEnd => {
                self.valid_losses.push(self.mean_loss());
                self.metric_values
                    .push(self.metrics.iter().map(|m| m.value()).collect());
            }
            Event::EpochEnd => {
                if self.verbose {
                    self.print_summary(state.epoch, state.epoch_count);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Recorder"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
