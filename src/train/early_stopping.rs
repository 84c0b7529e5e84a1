//! Early stopping callback

use super::callback::Callback;
use super::event::{Cancel, Control, Event, Phase};
use super::learner::LoopState;
use crate::model::Model;
use std::any::Any;

/// Callback that cancels the fit when the per-epoch loss stops improving.
///
/// Monitors the mean validation loss of each epoch (falling back to the
/// training loss when there is no validation data) and cancels the fit
/// after `patience` consecutive epochs without an improvement of at least
/// `min_delta`.
pub struct EarlyStopping {
    patience: usize,
    min_delta: f32,
    best_loss: f32,
    epochs_without_improvement: usize,
    train_sum: f32,
    train_count: usize,
    valid_sum: f32,
    valid_count: usize,
}

impl EarlyStopping {
    /// Stop after `patience` epochs without `min_delta` improvement.
    pub fn new(patience: usize, min_delta: f32) -> Self {
        Self {
            patience,
            min_delta,
            best_loss: f32::INFINITY,
            epochs_without_improvement: 0,
            train_sum: 0.0,
            train_count: 0,
            valid_sum: 0.0,
            valid_count: 0,
        }
    }

    fn epoch_loss(&self) -> f32 {
        if self.valid_count > 0 {
            self.valid_sum / self.valid_count as f32
        } else if self.train_count > 0 {
            self.train_sum / self.train_count as f32
        } else {
            0.0
        }
    }

    fn check_improvement(&mut self, loss: f32) {
        if loss < self.best_loss - self.min_delta {
            self.best_loss = loss;
            self.epochs_without_improvement = 0;
        } else {
            self.epochs_without_improvement += 1;
        }
    }
}

impl<M: Model> Callback<M> for EarlyStopping {
    fn on_event(&mut self, state: &mut LoopState<M>, event: Event) -> Control {
        match event {
            Event::FitBegin => {
                self.best_loss = f32::INFINITY;
                self.epochs_without_improvement = 0;
            }
            Event::TrainBegin => {
                self.train_sum = 0.0;
                self.train_count = 0;
            }
            Event::ValidateBegin => {
                self.valid_sum = 0.0;
                self.valid_count = 0;
            }
            Event::BatchEnd => {
                if let Some(loss) = state.last_loss {
                    match state.phase {
                        Phase::Training => {
                            self.train_sum += loss * state.last_batch_size as f32;
                            self.train_count += state.last_batch_size;
                        }
                        Phase::Validation => {
                            self.valid_sum += loss * state.last_batch_size as f32;
                            self.valid_count += state.last_batch_size;
                        }
                    }
                }
            }
            Event::EpochEnd => {
                self.check_improvement(self.epoch_loss());
                if self.epochs_without_improvement >= self.patience {
                    eprintln!(
                        "Early stopping: no improvement for {} epochs (best loss: {:.4})",
                        self.patience, self.best_loss
                    );
                    return Err(Cancel::Fit.into());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "EarlyStopping"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
