//! Hyperparameter schedules
//!
//! A [`Schedule`] is a pure curve mapping a progress fraction in `[0, 1]`
//! to a hyperparameter value. Schedules are validated at construction and
//! carry no mutable state, so they can be evaluated any number of times.
//!
//! # Example
//!
//! ```
//! use bucle::schedule::{Schedule, Shape};
//!
//! let sched = Schedule::new(Shape::Linear, 0.1, Some(0.0)).unwrap();
//! assert_eq!(sched.at(0.0), 0.1);
//! assert_eq!(sched.at(1.0), 0.0);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Shape of a schedule curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Always returns the start value.
    Constant,
    /// `start + (end - start) * t`
    Linear,
    /// Cosine interpolation from start to end.
    Cosine,
    /// `start * (end / start)^t`; requires a non-zero start.
    Exponential,
    /// `start + (end - start) * t^beta`
    Polynomial(f32),
}

/// A validated schedule curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    shape: Shape,
    start: f32,
    end: f32,
}

impl Schedule {
    /// Build a schedule from a shape and endpoints.
    ///
    /// All shapes except [`Shape::Constant`] require `end`.
    /// [`Shape::Exponential`] additionally requires `start != 0`.
    pub fn new(shape: Shape, start: f32, end: Option<f32>) -> Result<Self> {
        let end = match shape {
            Shape::Constant => end.unwrap_or(start),
            _ => end.ok_or(Error::MissingParameter("end"))?,
        };
        if matches!(shape, Shape::Exponential) && start == 0.0 {
            return Err(Error::InvalidParameter(
                "exponential schedule requires a non-zero start".into(),
            ));
        }
        Ok(Self { shape, start, end })
    }

    /// Constant schedule at `value`.
    pub fn constant(value: f32) -> Self {
        Self {
            shape: Shape::Constant,
            start: value,
            end: value,
        }
    }

    /// Evaluate the schedule at progress `t` in `[0, 1]`.
    pub fn at(&self, t: f32) -> f32 {
        let (a, b) = (self.start, self.end);
        match self.shape {
            Shape::Constant => a,
            Shape::Linear => a + (b - a) * t,
            Shape::Cosine => a + (b - a) * (1.0 + (PI * (1.0 - t)).cos()) / 2.0,
            Shape::Exponential => a * (b / a).powf(t),
            Shape::Polynomial(beta) => a + (b - a) * t.powf(beta),
        }
    }

    /// Start value of the curve.
    pub fn start(&self) -> f32 {
        self.start
    }

    /// End value of the curve.
    pub fn end(&self) -> f32 {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constant_ignores_progress() {
        let sched = Schedule::new(Shape::Constant, 0.3, None).unwrap();
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_abs_diff_eq!(sched.at(t), 0.3, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_endpoints_match_start_and_end() {
        let shapes = [
            Shape::Linear,
            Shape::Cosine,
            Shape::Exponential,
            Shape::Polynomial(2.0),
        ];
        for shape in shapes {
            let sched = Schedule::new(shape, 0.1, Some(0.01)).unwrap();
            assert_abs_diff_eq!(sched.at(0.0), 0.1, epsilon = 1e-6);
            assert_abs_diff_eq!(sched.at(1.0), 0.01, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let sched = Schedule::new(Shape::Linear, 1.0, Some(0.0)).unwrap();
        assert_abs_diff_eq!(sched.at(0.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_midpoint() {
        // cos(pi/2) = 0, so the midpoint sits halfway between start and end
        let sched = Schedule::new(Shape::Cosine, 1.0, Some(0.0)).unwrap();
        assert_abs_diff_eq!(sched.at(0.5), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_exponential_is_geometric() {
        let sched = Schedule::new(Shape::Exponential, 1e-5, Some(1e-1)).unwrap();
        // Halfway through a four-decade sweep lands two decades up.
        assert_abs_diff_eq!(sched.at(0.5), 1e-3, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_end_is_an_error() {
        let err = Schedule::new(Shape::Linear, 0.1, None).unwrap_err();
        assert!(err.to_string().contains("missing required parameter"));
    }

    #[test]
    fn test_exponential_zero_start_is_an_error() {
        assert!(Schedule::new(Shape::Exponential, 0.0, Some(0.1)).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Schedules are pure: the same progress always yields the same value.
        #[test]
        fn schedule_is_idempotent(
            start in 0.001f32..10.0,
            end in 0.001f32..10.0,
            t in 0.0f32..=1.0,
        ) {
            for shape in [Shape::Constant, Shape::Linear, Shape::Cosine,
                          Shape::Exponential, Shape::Polynomial(3.0)] {
                let sched = Schedule::new(shape, start, Some(end)).unwrap();
                prop_assert_eq!(sched.at(t), sched.at(t));
            }
        }

        /// Non-constant shapes hit their endpoints.
        #[test]
        fn schedule_hits_endpoints(
            start in 0.001f32..10.0,
            end in 0.001f32..10.0,
        ) {
            for shape in [Shape::Linear, Shape::Cosine,
                          Shape::Exponential, Shape::Polynomial(2.0)] {
                let sched = Schedule::new(shape, start, Some(end)).unwrap();
                prop_assert!((sched.at(0.0) - start).abs() < 1e-4 * start.max(1.0));
                prop_assert!((sched.at(1.0) - end).abs() < 1e-4 * end.max(1.0));
            }
        }

        /// Linear schedules interpolate monotonically between endpoints.
        #[test]
        fn linear_stays_between_endpoints(
            start in 0.0f32..10.0,
            end in 0.0f32..10.0,
            t in 0.0f32..=1.0,
        ) {
            let sched = Schedule::new(Shape::Linear, start, Some(end)).unwrap();
            let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
            let v = sched.at(t);
            prop_assert!(v >= lo - 1e-5 && v <= hi + 1e-5);
        }
    }
}
