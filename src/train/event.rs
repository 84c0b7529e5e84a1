//! Lifecycle events and cancellation signals
//!
//! Cancellation is modelled as a typed value returned from callback
//! dispatch, not as an unwind: a callback hands back `Err(Signal::Cancel)`
//! and the [`Learner`](super::Learner) catches it at the matching scope
//! boundary, firing that scope's closing event on the way out.

use crate::error::Error;

/// Lifecycle events emitted by the training loop, in nesting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    FitBegin,
    EpochBegin,
    TrainBegin,
    BatchBegin,
    BatchEnd,
    TrainEnd,
    ValidateBegin,
    ValidateEnd,
    EpochEnd,
    FitEnd,
}

/// Which pass the current batch belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Training,
    Validation,
}

/// Scope targeted by an early-exit request, one per nesting level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cancel {
    /// Skip the rest of the current batch's step; its BatchEnd still fires.
    Batch,
    /// Skip the remaining training batches; TrainEnd still fires.
    Training,
    /// Skip the remaining validation batches; ValidateEnd still fires.
    Validation,
    /// Skip the remainder of the current epoch; EpochEnd still fires.
    Epoch,
    /// Skip the remainder of the run; FitEnd still fires.
    Fit,
}

/// Raised out of a callback or step function.
///
/// `Cancel` is caught by the loop at the targeted scope. `Fatal` is not
/// recovered anywhere: it unwinds out of `fit` without firing the closing
/// events of scopes not yet exited.
#[derive(Debug)]
pub enum Signal {
    Cancel(Cancel),
    Fatal(Error),
}

impl From<Cancel> for Signal {
    fn from(cancel: Cancel) -> Self {
        Signal::Cancel(cancel)
    }
}

impl From<Error> for Signal {
    fn from(err: Error) -> Self {
        Signal::Fatal(err)
    }
}

/// Result of one callback invocation or one batch step.
pub type Control = Result<(), Signal>;

impl Event {
    /// `*End` event closing the scope that catches `cancel`.
    pub(crate) fn closing(cancel: Cancel) -> Event {
        match cancel {
            Cancel::Batch => Event::BatchEnd,
            Cancel::Training => Event::TrainEnd,
            Cancel::Validation => Event::ValidateEnd,
            Cancel::Epoch => Event::EpochEnd,
            Cancel::Fit => Event::FitEnd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_cancel() {
        let sig: Signal = Cancel::Epoch.into();
        assert!(matches!(sig, Signal::Cancel(Cancel::Epoch)));
    }

    #[test]
    fn test_signal_from_error_is_fatal() {
        let sig: Signal = Error::MissingParameter("end").into();
        assert!(matches!(sig, Signal::Fatal(_)));
    }

    #[test]
    fn test_closing_events_match_scopes() {
        assert_eq!(Event::closing(Cancel::Batch), Event::BatchEnd);
        assert_eq!(Event::closing(Cancel::Training), Event::TrainEnd);
        assert_eq!(Event::closing(Cancel::Validation), Event::ValidateEnd);
        assert_eq!(Event::closing(Cancel::Epoch), Event::EpochEnd);
        assert_eq!(Event::closing(Cancel::Fit), Event::FitEnd);
    }
}
