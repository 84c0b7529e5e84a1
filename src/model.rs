//! Model capability
//!
//! The loop treats the model as an opaque differentiable function: it maps
//! inputs to outputs, and it can compute the loss together with the
//! gradient of that loss with respect to a flat `f32` parameter vector.

use crate::loss::Loss;
use ndarray::Array1;

/// Output and gradient of one differentiable forward pass.
pub struct ValueWithGrad<O> {
    pub output: O,
    pub loss: f32,
    /// Gradient of the loss w.r.t. the flat parameter vector.
    pub grad: Array1<f32>,
}

/// Trait for differentiable models with a flat parameter vector.
pub trait Model {
    type Input;
    type Target;
    type Output;

    /// Forward pass.
    fn forward(&self, input: &Self::Input) -> Self::Output;

    /// Forward pass plus loss and the gradient of the loss w.r.t. the
    /// parameters, chained through the loss function's output gradient.
    fn value_with_gradient(
        &self,
        input: &Self::Input,
        target: &Self::Target,
        loss_fn: &dyn Loss<Self::Output, Self::Target>,
    ) -> ValueWithGrad<Self::Output>;

    /// Flat parameter vector.
    fn params(&self) -> &Array1<f32>;

    /// Mutable flat parameter vector, updated in place by the optimizer.
    fn params_mut(&mut self) -> &mut Array1<f32>;
}

/// Elementwise linear model `y = a*x + b` with params stored as `[a, b]`.
#[derive(Clone, Debug)]
pub struct Linear {
    params: Array1<f32>,
}

impl Linear {
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            params: Array1::from(vec![a, b]),
        }
    }

    pub fn a(&self) -> f32 {
        self.params[0]
    }

    pub fn b(&self) -> f32 {
        self.params[1]
    }
}

impl Model for Linear {
    type Input = Array1<f32>;
    type Target = Array1<f32>;
    type Output = Array1<f32>;

    fn forward(&self, input: &Array1<f32>) -> Array1<f32> {
        input.mapv(|x| self.a() * x + self.b())
    }

    fn value_with_gradient(
        &self,
        input: &Array1<f32>,
        target: &Array1<f32>,
        loss_fn: &dyn Loss<Array1<f32>, Array1<f32>>,
    ) -> ValueWithGrad<Array1<f32>> {
        let output = self.forward(input);
        let loss = loss_fn.loss(&output, target);
        let dl_dout = loss_fn.grad(&output, target);

        // Chain rule: dout/da = x, dout/db = 1.
        let da = (&dl_dout * input).sum();
        let db = dl_dout.sum();

        ValueWithGrad {
            output,
            loss,
            grad: Array1::from(vec![da, db]),
        }
    }

    fn params(&self) -> &Array1<f32> {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Array1<f32> {
        &mut self.params
    }
}
