//! Optimizers
//!
//! An optimizer applies a gradient to a flat parameter vector and exposes
//! its learning rate as a plain mutable `f32`, which is what schedule
//! callbacks overwrite mid-fit.

use ndarray::Array1;

/// Trait for optimization algorithms.
pub trait Optimizer {
    /// Apply one update to `params` given the gradient of the loss.
    fn update(&mut self, params: &mut Array1<f32>, grad: &Array1<f32>);

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}

/// SGD optimizer with optional momentum
pub struct Sgd {
    lr: f32,
    momentum: f32,
    velocity: Option<Array1<f32>>,
}

impl Sgd {
    /// Create a new SGD optimizer
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self {
            lr,
            momentum,
            velocity: None,
        }
    }
}

impl Optimizer for Sgd {
    fn update(&mut self, params: &mut Array1<f32>, grad: &Array1<f32>) {
        if self.momentum > 0.0 {
            // v = momentum * v - lr * grad
            let velocity = match &self.velocity {
                Some(v) => v * self.momentum - grad * self.lr,
                None => grad * (-self.lr),
            };
            *params += &velocity;
            self.velocity = Some(velocity);
        } else {
            // param -= lr * grad
            *params -= &(grad * self.lr);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}
