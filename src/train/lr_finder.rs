//! Learning rate range finder callback

use super::callback::Callback;
use super::event::{Cancel, Control, Event, Phase};
use super::learner::LoopState;
use crate::error::Result;
use crate::model::Model;
use crate::schedule::{Schedule, Shape};
use std::any::Any;

const DIVERGENCE_FACTOR: f32 = 4.0;

/// Callback that runs a bounded mock fit sweeping the learning rate
/// exponentially from a low to a high value, recording a smoothed loss per
/// batch.
///
/// Validation is skipped entirely. The fit is cancelled once the smoothed
/// loss exceeds [`DIVERGENCE_FACTOR`] times the best smoothed loss seen, or
/// once the iteration budget is spent. Inspect [`LrFinder::lrs`] and
/// [`LrFinder::losses`] afterwards to pick a learning rate.
pub struct LrFinder {
    schedule: Schedule,
    iteration_count: usize,
    smoothing: f32,
    iteration: usize,
    running: f32,
    best: f32,
    /// Learning rate used at each recorded batch.
    pub lrs: Vec<f32>,
    /// Bias-corrected exponential moving average of the batch loss.
    pub losses: Vec<f32>,
}

impl LrFinder {
    /// Sweep from `lr_low` to `lr_high` over at most `iteration_count`
    /// training batches. `lr_low` must be non-zero (exponential schedule).
    pub fn new(lr_low: f32, lr_high: f32, iteration_count: usize) -> Result<Self> {
        Ok(Self {
            schedule: Schedule::new(Shape::Exponential, lr_low, Some(lr_high))?,
            iteration_count,
            smoothing: 0.98,
            iteration: 0,
            running: 0.0,
            best: f32::INFINITY,
            lrs: Vec::new(),
            losses: Vec::new(),
        })
    }

    fn progress(&self) -> f32 {
        if self.iteration_count > 1 {
            (self.iteration as f32 / (self.iteration_count - 1) as f32).min(1.0)
        } else {
            0.0
        }
    }
}

impl<M: Model> Callback<M> for LrFinder {
    fn on_event(&mut self, state: &mut LoopState<M>, event: Event) -> Control {
        match event {
            Event::FitBegin => {
                self.iteration = 0;
                self.running = 0.0;
                self.best = f32::INFINITY;
                self.lrs.clear();
                self.losses.clear();
            }
            Event::ValidateBegin => return Err(Cancel::Validation.into()),
            Event::BatchBegin if state.phase == Phase::Training => {
                state.opt.set_lr(self.schedule.at(self.progress()));
            }
            Event::BatchEnd if state.phase == Phase::Training => {
                let Some(loss) = state.last_loss else {
                    return Ok(());
                };
                self.iteration += 1;
                self.running = self.smoothing * self.running + (1.0 - self.smoothing) * loss;
                // Bias-corrected EMA, stable from the first batch on.
                let smoothed = self.running / (1.0 - self.smoothing.powi(self.iteration as i32));

                self.lrs.push(state.opt.lr());
                self.losses.push(smoothed);

                if smoothed > DIVERGENCE_FACTOR * self.best || !smoothed.is_finite() {
                    return Err(Cancel::Fit.into());
                }
                if smoothed < self.best {
                    self.best = smoothed;
                }
                if self.iteration >= self.iteration_count {
                    return Err(Cancel::Fit.into());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "LrFinder"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
