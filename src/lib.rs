//! # Bucle: Callback-Extensible Training Loop
//!
//! Bucle decouples the fixed control-flow skeleton of supervised training
//! (iterate epochs, train batches, validate batches) from pluggable
//! behaviors injected as observers of a well-defined event stream.
//!
//! ## Architecture
//!
//! - **schedule**: Pure hyperparameter curves (constant, linear, cosine,
//!   exponential, polynomial)
//! - **data**: Batches and datasets, plus a synthetic regression generator
//! - **model / loss / optim / metrics**: Capability traits the loop calls,
//!   with simple reference implementations
//! - **train**: The event/signal model, callback protocol, [`Learner`]
//!   controller, and reference callbacks (scheduler, recorder, learning
//!   rate finder, early stopping)
//!
//! The loop is single-threaded and cooperative: callbacks run to
//! completion in registration order, may mutate the optimizer's learning
//! rate, and may cancel the current batch, phase, epoch, or the whole fit
//! through typed signals caught at the matching scope boundary.

pub mod data;
pub mod error;
pub mod loss;
pub mod metrics;
pub mod model;
pub mod optim;
pub mod schedule;
pub mod train;

// Re-export commonly used types
pub use data::{Batch, DataBunch};
pub use error::{Error, Result};
pub use loss::{Loss, MseLoss};
pub use metrics::{Metric, ToleranceAccuracy};
pub use model::{Linear, Model, ValueWithGrad};
pub use optim::{Optimizer, Sgd};
pub use schedule::{Schedule, Shape};
pub use train::{
    Callback, Cancel, Control, EarlyStopping, Event, Handle, Learner, LoopState, LrFinder,
    LrScheduler, Phase, Recorder, Signal,
};
