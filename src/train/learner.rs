//! Learner: the training loop controller
//!
//! The [`Learner`] owns the loop state and drives the nested
//! epoch/phase/batch control flow, dispatching lifecycle events to the
//! registered callbacks in order and interpreting cancellation signals at
//! the matching scope boundary.
//!
//! Event nesting for one fit:
//!
//! ```text
//! FitBegin
//!   EpochBegin
//!     TrainBegin
//!       (BatchBegin step BatchEnd) x training batches
//!     TrainEnd
//!     ValidateBegin
//!       (BatchBegin step BatchEnd) x validation batches
//!     ValidateEnd
//!   EpochEnd          -- repeats per epoch
//! FitEnd
//! ```
//!
//! A cancellation signal unwinds to its target scope, firing exactly one
//! closing event per level on the way out; the target scope's own closing
//! event fires and the loop resumes outside it. A fatal error fires no
//! further events and surfaces as `Err` from [`Learner::fit`].

use super::callback::{Callback, Handle};
use super::event::{Cancel, Control, Event, Phase, Signal};
use super::step;
use crate::data::{Batch, DataBunch};
use crate::error::Result;
use crate::loss::Loss;
use crate::model::Model;
use crate::optim::Optimizer;
use std::marker::PhantomData;

/// Mutable loop state, owned by the controller and handed to every
/// callback at every event.
pub struct LoopState<M: Model> {
    /// Current model, updated in place by the optimizer step.
    pub model: M,

    /// Optimizer; callbacks may overwrite its learning rate.
    pub opt: Box<dyn Optimizer>,

    /// Loss function, fixed for the loop's lifetime.
    pub loss_fn: Box<dyn Loss<M::Output, M::Target>>,

    /// Training and validation data.
    pub data: DataBunch<M::Input, M::Target>,

    /// Input of the current batch; `None` before the first batch of a run.
    pub last_input: Option<M::Input>,
    /// Target of the current batch.
    pub last_target: Option<M::Target>,
    /// Model output for the current batch, set by the step function.
    pub last_output: Option<M::Output>,
    /// Loss for the current batch, set by the step function.
    pub last_loss: Option<f32>,
    /// Sample count of the current batch.
    pub last_batch_size: usize,

    /// Current epoch (0-indexed), valid inside an active fit.
    pub epoch: usize,
    /// Total epochs planned for the current fit.
    pub epoch_count: usize,
    /// Current batch within the phase (0-indexed).
    pub batch: usize,
    /// Batch count of the current phase; training and validation each set
    /// their own.
    pub batch_count: usize,

    /// Which pass the current batch belongs to.
    pub phase: Phase,
}

/// Training loop controller.
pub struct Learner<M: Model> {
    /// Loop state, readable and partially writable by callbacks.
    pub state: LoopState<M>,
    callbacks: Vec<Box<dyn Callback<M>>>,
}

impl<M: Model> Learner<M> {
    /// Create a learner for a training session with fixed data, model,
    /// optimizer, and loss.
    pub fn new(
        model: M,
        opt: Box<dyn Optimizer>,
        loss_fn: Box<dyn Loss<M::Output, M::Target>>,
        data: DataBunch<M::Input, M::Target>,
    ) -> Self {
        Self {
            state: LoopState {
                model,
                opt,
                loss_fn,
                data,
                last_input: None,
                last_target: None,
                last_output: None,
                last_loss: None,
                last_batch_size: 0,
                epoch: 0,
                epoch_count: 0,
                batch: 0,
                batch_count: 0,
                phase: Phase::Training,
            },
            callbacks: Vec::new(),
        }
    }

    /// Register a callback.
    ///
    /// The list is ordered and cumulative across `fit` calls; registration
    /// order is dispatch order, and earlier callbacks' state mutations are
    /// visible to later ones within the same event.
    pub fn add_callback<C>(&mut self, callback: C) -> Handle<C>
    where
        C: Callback<M> + 'static,
    {
        let index = self.callbacks.len();
        self.callbacks.push(Box::new(callback));
        Handle {
            index,
            _marker: PhantomData,
        }
    }

    /// Retrieve a registered callback through its typed handle.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was issued by a different learner.
    pub fn callback<C>(&self, handle: Handle<C>) -> &C
    where
        C: Callback<M> + 'static,
    {
        self.callbacks[handle.index]
            .as_any()
            .downcast_ref()
            .expect("handle type matches its registration")
    }

    /// Number of registered callbacks.
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Get current learning rate
    pub fn lr(&self) -> f32 {
        self.state.opt.lr()
    }

    /// Set learning rate
    pub fn set_lr(&mut self, lr: f32) {
        self.state.opt.set_lr(lr);
    }

    /// Fit for `epoch_count` epochs with the default training and
    /// inference steps.
    pub fn fit(&mut self, epoch_count: usize) -> Result<()>
    where
        M::Input: Clone,
        M::Target: Clone,
    {
        self.fit_with(epoch_count, step::train_step, step::infer_step)
    }

    /// Fit with substitute step functions for the training and validation
    /// phases.
    pub fn fit_with<TS, VS>(
        &mut self,
        epoch_count: usize,
        mut train_step: TS,
        mut infer_step: VS,
    ) -> Result<()>
    where
        TS: FnMut(&mut LoopState<M>) -> Control,
        VS: FnMut(&mut LoopState<M>) -> Control,
        M::Input: Clone,
        M::Target: Clone,
    {
        self.state.epoch_count = epoch_count;
        self.state.last_input = None;
        self.state.last_target = None;
        self.state.last_output = None;
        self.state.last_loss = None;
        self.state.last_batch_size = 0;
        self.state.epoch = 0;
        self.state.batch = 0;
        self.state.batch_count = 0;
        self.state.phase = Phase::Training;

        let body = match self.dispatch(Event::FitBegin) {
            Ok(()) => self.run_epochs(epoch_count, &mut train_step, &mut infer_step),
            Err(sig) => Err(sig),
        };
        match self.close_scope(body, Cancel::Fit) {
            Ok(()) => Ok(()),
            // A cancel with no matching open scope has nothing to cancel.
            Err(Signal::Cancel(_)) => Ok(()),
            Err(Signal::Fatal(err)) => Err(err),
        }
    }

    fn run_epochs<TS, VS>(
        &mut self,
        epoch_count: usize,
        train_step: &mut TS,
        infer_step: &mut VS,
    ) -> Control
    where
        TS: FnMut(&mut LoopState<M>) -> Control,
        VS: FnMut(&mut LoopState<M>) -> Control,
        M::Input: Clone,
        M::Target: Clone,
    {
        for epoch in 0..epoch_count {
            // The training data may run out of epochs before the budget does.
            let Some(batches) = self.state.data.train_epoch(epoch) else {
                break;
            };
            let train: Vec<Batch<M::Input, M::Target>> = batches.to_vec();
            let valid: Vec<Batch<M::Input, M::Target>> = self.state.data.valid().to_vec();

            self.state.epoch = epoch;
            let body = match self.dispatch(Event::EpochBegin) {
                Ok(()) => {
                    // Validation runs even when the training phase was
                    // cancelled, as long as the epoch itself survives.
                    match self.run_phase(Phase::Training, train, train_step) {
                        Ok(()) => self.run_phase(Phase::Validation, valid, infer_step),
                        Err(sig) => Err(sig),
                    }
                }
                Err(sig) => Err(sig),
            };
            self.close_scope(body, Cancel::Epoch)?;
        }
        Ok(())
    }

    fn run_phase<F>(
        &mut self,
        phase: Phase,
        batches: Vec<Batch<M::Input, M::Target>>,
        step: &mut F,
    ) -> Control
    where
        F: FnMut(&mut LoopState<M>) -> Control,
    {
        self.state.phase = phase;
        self.state.batch_count = batches.len();
        let (begin, caught) = match phase {
            Phase::Training => (Event::TrainBegin, Cancel::Training),
            Phase::Validation => (Event::ValidateBegin, Cancel::Validation),
        };
        let body = match self.dispatch(begin) {
            Ok(()) => self.run_batches(batches, step),
            Err(sig) => Err(sig),
        };
        self.close_scope(body, caught)
    }

    fn run_batches<F>(&mut self, batches: Vec<Batch<M::Input, M::Target>>, step: &mut F) -> Control
    where
        F: FnMut(&mut LoopState<M>) -> Control,
    {
        for (index, batch) in batches.into_iter().enumerate() {
            self.state.batch = index;
            self.state.last_batch_size = batch.size;
            self.state.last_input = Some(batch.input);
            self.state.last_target = Some(batch.target);
            let body = match self.dispatch(Event::BatchBegin) {
                Ok(()) => step(&mut self.state),
                Err(sig) => Err(sig),
            };
            self.close_scope(body, Cancel::Batch)?;
        }
        Ok(())
    }

    /// Close one scope: fire its `*End` event, swallow the signal this
    /// scope catches, and let signals targeting an outer scope keep
    /// unwinding after the closing event has fired. Fatal errors fire no
    /// closing event.
    fn close_scope(&mut self, body: Control, caught: Cancel) -> Control {
        match body {
            Ok(()) => self.dispatch(Event::closing(caught)),
            Err(Signal::Cancel(cancel)) if cancel == caught => {
                self.dispatch(Event::closing(caught))
            }
            Err(Signal::Cancel(cancel)) => {
                // A signal raised by this closing dispatch replaces the one
                // in flight.
                self.dispatch(Event::closing(caught))?;
                Err(Signal::Cancel(cancel))
            }
            Err(fatal @ Signal::Fatal(_)) => Err(fatal),
        }
    }

    /// Invoke `on_event` on every callback in registration order. The
    /// first signal skips the remaining callbacks for this event and
    /// propagates.
    fn dispatch(&mut self, event: Event) -> Control {
        for callback in &mut self.callbacks {
            callback.on_event(&mut self.state, event)?;
        }
        Ok(())
    }
}
