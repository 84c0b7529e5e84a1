//! Loss functions
//!
//! A loss maps (output, target) to a scalar and also exposes its gradient
//! with respect to the output, which models chain through their own
//! parameter gradients in `value_with_gradient`.

use ndarray::Array1;

/// Trait for loss functions over output type `O` and target type `T`.
pub trait Loss<O, T> {
    /// Scalar loss for one batch.
    fn loss(&self, output: &O, target: &T) -> f32;

    /// Gradient of the loss with respect to the output.
    fn grad(&self, output: &O, target: &T) -> O;

    /// Name of the loss function.
    fn name(&self) -> &str {
        "Loss"
    }
}

/// Mean Squared Error: `mean((output - target)^2)`.
pub struct MseLoss;

impl Loss<Array1<f32>, Array1<f32>> for MseLoss {
    fn loss(&self, output: &Array1<f32>, target: &Array1<f32>) -> f32 {
        assert_eq!(
            output.len(),
            target.len(),
            "output and target must have same length"
        );
        let diff = output - target;
        (&diff * &diff).mean().unwrap_or(0.0)
    }

    // d(MSE)/d(output) = 2 * (output - target) / n
    fn grad(&self, output: &Array1<f32>, target: &Array1<f32>) -> Array1<f32> {
        let n = output.len() as f32;
        (output - target) * (2.0 / n)
    }

    fn name(&self) -> &str {
        "MSE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_mse_basic() {
        let output = array![1.0, 2.0, 3.0];
        let target = array![1.5, 2.5, 3.5];
        // mean((0.5)^2 * 3) = 0.25
        assert_relative_eq!(MseLoss.loss(&output, &target), 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_mse_zero_for_perfect() {
        let v = array![1.0, 2.0, 3.0];
        assert_relative_eq!(MseLoss.loss(&v, &v), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mse_gradient() {
        let output = array![1.0, 2.0, 3.0];
        let target = array![0.0, 0.0, 0.0];
        let grad = MseLoss.grad(&output, &target);

        assert_relative_eq!(grad[0], 2.0 / 3.0, epsilon = 1e-5);
        assert_relative_eq!(grad[1], 4.0 / 3.0, epsilon = 1e-5);
        assert_relative_eq!(grad[2], 6.0 / 3.0, epsilon = 1e-5);
    }

    #[test]
    #[should_panic(expected = "must have same length")]
    fn test_mse_mismatched_lengths() {
        MseLoss.loss(&array![1.0, 2.0], &array![1.0]);
    }
}
