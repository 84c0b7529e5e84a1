//! Training loop engine
//!
//! This module provides the callback-extensible training loop:
//! - Lifecycle events and typed cancellation signals
//! - The callback protocol
//! - The [`Learner`] controller and default batch step functions
//! - Reference callbacks: scheduler, recorder, LR finder, early stopping
//!
//! # Example
//!
//! ```
//! use bucle::data::{linear_batches, DataBunch};
//! use bucle::loss::MseLoss;
//! use bucle::model::Linear;
//! use bucle::optim::Sgd;
//! use bucle::train::{Learner, Recorder};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let train = linear_batches(&mut rng, 2.0, 3.0, 16, 10, 0.0);
//! let valid = linear_batches(&mut rng, 2.0, 3.0, 16, 2, 0.0);
//!
//! let mut learner = Learner::new(
//!     Linear::new(0.0, 0.0),
//!     Box::new(Sgd::new(0.1, 0.0)),
//!     Box::new(MseLoss),
//!     DataBunch::repeat(train, valid),
//! );
//! let recorder = learner.add_callback(Recorder::new().quiet());
//!
//! learner.fit(5).unwrap();
//! assert_eq!(learner.callback(recorder).train_losses.len(), 5);
//! ```

pub mod callback;
pub mod event;
mod early_stopping;
mod learner;
mod lr_finder;
mod recorder;
mod scheduler;
pub mod step;


pub use callback::{Callback, Handle};
pub use early_stopping::EarlyStopping;
pub use event::{Cancel, Control, Event, Phase, Signal};
pub use learner::{Learner, LoopState};
pub use lr_finder::LrFinder;
pub use recorder::Recorder;
pub use scheduler::LrScheduler;
