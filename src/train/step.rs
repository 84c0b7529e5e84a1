//! Default batch step functions
//!
//! The controller invokes one step function per batch: the training step
//! during the training phase, the inference step during validation. Both
//! are substitutable per fit call through
//! [`Learner::fit_with`](super::Learner::fit_with).

use super::event::Control;
use super::learner::LoopState;
use crate::model::Model;

/// Training step: forward + loss + gradient, then the optimizer update.
///
/// No-op when the input or target slot is empty.
pub fn train_step<M: Model>(state: &mut LoopState<M>) -> Control {
    let (Some(input), Some(target)) = (&state.last_input, &state.last_target) else {
        return Ok(());
    };
    let vg = state
        .model
        .value_with_gradient(input, target, state.loss_fn.as_ref());
    state.last_output = Some(vg.output);
    state.last_loss = Some(vg.loss);
    state.opt.update(state.model.params_mut(), &vg.grad);
    Ok(())
}

/// Inference step: forward only, no parameter update.
///
/// Stores the loss only when a target is present; no-op when the input
/// slot is empty.
pub fn infer_step<M: Model>(state: &mut LoopState<M>) -> Control {
    let Some(input) = &state.last_input else {
        return Ok(());
    };
    let output = state.model.forward(input);
    state.last_loss = state
        .last_target
        .as_ref()
        .map(|target| state.loss_fn.loss(&output, target));
    state.last_output = Some(output);
    Ok(())
}
