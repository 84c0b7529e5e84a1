//! Learning rate scheduling callback

use super::callback::Callback;
use super::event::{Control, Event, Phase};
use super::learner::LoopState;
use crate::model::Model;
use crate::schedule::Schedule;
use std::any::Any;

/// Callback that drives the optimizer's learning rate from a
/// [`Schedule`] over global training progress.
///
/// At `FitBegin` it computes the total training-batch count for the run;
/// at every training-phase `BatchBegin` it evaluates the schedule at
/// `completed / (total - 1)` and overwrites the optimizer's learning rate.
/// Validation batches are left alone.
///
/// # Example
///
/// ```no_run
/// use bucle::schedule::{Schedule, Shape};
/// use bucle::train::LrScheduler;
///
/// let sched = Schedule::new(Shape::Cosine, 1e-2, Some(1e-4)).unwrap();
/// let callback = LrScheduler::new(sched);
/// // learner.add_callback(callback);
/// ```
pub struct LrScheduler {
    schedule: Schedule,
    total: usize,
    completed: usize,
    history: Vec<f32>,
}

impl LrScheduler {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            total: 0,
            completed: 0,
            history: Vec::new(),
        }
    }

    /// Learning rates emitted so far, one per training batch.
    pub fn lrs(&self) -> &[f32] {
        &self.history
    }
}

impl<M: Model> Callback<M> for LrScheduler {
    fn on_event(&mut self, state: &mut LoopState<M>, event: Event) -> Control {
        match event {
            Event::FitBegin => {
                self.total = state.data.total_train_batches(state.epoch_count);
                self.completed = 0;
                self.history.clear();
            }
            Event::BatchBegin if state.phase == Phase::Training => {
                let progress = if self.total > 1 {
                    self.completed as f32 / (self.total - 1) as f32
                } else {
                    0.0
                };
                let lr = self.schedule.at(progress);
                state.opt.set_lr(lr);
                self.history.push(lr);
                self.completed += 1;
            }
            _ => {}
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "LrScheduler"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
