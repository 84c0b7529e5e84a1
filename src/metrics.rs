//! Evaluation metrics
//!
//! Metrics accumulate over a phase and are reset at each phase start by the
//! [`Recorder`](crate::train::Recorder). `value` is `None` until at least
//! one batch has been seen.

use ndarray::Array1;

/// Trait for accumulating evaluation metrics.
pub trait Metric<O, T> {
    /// Drop all accumulated state.
    fn reset(&mut self);

    /// Fold one batch of (output, target) into the running value.
    fn accumulate(&mut self, output: &O, target: &T);

    /// Current value, or `None` when no samples have been seen.
    fn value(&self) -> Option<f32>;

    /// Name of the metric.
    fn name(&self) -> &str;
}

/// Fraction of outputs within an absolute tolerance of the target.
#[derive(Clone, Debug)]
pub struct ToleranceAccuracy {
    tolerance: f32,
    correct: usize,
    total: usize,
}

impl ToleranceAccuracy {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            correct: 0,
            total: 0,
        }
    }
}

impl Metric<Array1<f32>, Array1<f32>> for ToleranceAccuracy {
    fn reset(&mut self) {
        self.correct = 0;
        self.total = 0;
    }

    fn accumulate(&mut self, output: &Array1<f32>, target: &Array1<f32>) {
        assert_eq!(
            output.len(),
            target.len(),
            "output and target must have same length"
        );
        self.correct += output
            .iter()
            .zip(target.iter())
            .filter(|(o, t)| (*o - *t).abs() <= self.tolerance)
            .count();
        self.total += output.len();
    }

    fn value(&self) -> Option<f32> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f32 / self.total as f32)
        }
    }

    fn name(&self) -> &str {
        "ToleranceAccuracy"
    }
}
