//! Callback protocol
//!
//! A callback observes every lifecycle event through a single `on_event`
//! entry point. It may read any field of the loop state, mutate the
//! optimizer's learning rate, keep private accumulated state across calls,
//! and request early termination of an enclosing scope by returning
//! `Err(Signal::Cancel(..))`. Returning `Err(Signal::Fatal(..))` aborts the
//! whole fit.
//!
//! Callbacks are dispatched in registration order, and an earlier
//! callback's mutations are visible to later ones within the same event.
//!
//! # Example
//!
//! ```
//! use bucle::train::{Callback, Control, Event, LoopState};
//! use bucle::Model;
//! use std::any::Any;
//!
//! struct PrintLoss;
//!
//! impl<M: Model> Callback<M> for PrintLoss {
//!     fn on_event(&mut self, state: &mut LoopState<M>, event: Event) -> Control {
//!         if event == Event::BatchEnd {
//!             if let Some(loss) = state.last_loss {
//!                 println!("batch {}: loss {:.4}", state.batch, loss);
//!             }
//!         }
//!         Ok(())
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//! ```

use super::event::{Control, Event};
use super::learner::LoopState;
use crate::model::Model;
use std::any::Any;
use std::marker::PhantomData;

/// Trait for training-loop callbacks.
pub trait Callback<M: Model> {
    /// Observe one lifecycle event, with mutable access to the loop state.
    fn on_event(&mut self, state: &mut LoopState<M>, event: Event) -> Control;

    /// Get callback name for logging
    fn name(&self) -> &str {
        "Callback"
    }

    /// Upcast for typed retrieval through a [`Handle`].
    fn as_any(&self) -> &dyn Any;
}

/// Typed handle to a registered callback.
///
/// Returned by [`Learner::add_callback`](super::Learner::add_callback) so a
/// caller can get its callback's accumulated state back after a fit without
/// unchecked casts.
pub struct Handle<C> {
    pub(crate) index: usize,
    pub(crate) _marker: PhantomData<fn() -> C>,
}

// Derived Clone/Copy would bound C; the handle itself is just an index.
impl<C> Clone for Handle<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Handle<C> {}
