// Loss Functions
//
// A loss turns (prediction, target) into a scalar the optimizer minimizes,
// and also produces dLoss/dPrediction so the network can start backward().
// Both methods require prediction and target to have identical shapes.
//
// KEY LOSSES:
//
// 1. MSE (Mean Squared Error): mean((pred - target)²)
//    gradient: 2 * (pred - target) / N
//
// 2. Cross-Entropy: mean(-target * log(max(pred, ε)))
//    gradient: (p - target) / (p * N), with p = max(pred, ε)
//
//    Predictions are expected to already be probabilities. No softmax is
//    applied here; put a Sigmoid (or normalise upstream) before this loss.
//
// N is the total element count of the prediction tensor.

use vole_core::error::{Error, Result};
use vole_core::tensor::Tensor;

/// Clamp applied to predictions before `log` and division in cross-entropy.
pub const CROSS_ENTROPY_EPS: f32 = 1e-15;

/// A differentiable scalar objective. Implementations are stateless.
pub trait Loss {
    /// Scalar loss value.
    fn compute_loss(&self, prediction: &Tensor, target: &Tensor) -> Result<f32>;

    /// dLoss/dPrediction, shaped like `prediction`.
    fn compute_gradient(&self, prediction: &Tensor, target: &Tensor) -> Result<Tensor>;

    /// Short type name.
    fn name(&self) -> &'static str;
}

fn ensure_same_shape(prediction: &Tensor, target: &Tensor) -> Result<()> {
    if prediction.shape() != target.shape() {
        return Err(Error::ShapeMismatch {
            expected: prediction.shape(),
            got: target.shape(),
        });
    }
    Ok(())
}

/// Mean Squared Error loss.
#[derive(Debug, Clone, Copy, Default)]
pub struct MseLoss;

impl Loss for MseLoss {
    fn compute_loss(&self, prediction: &Tensor, target: &Tensor) -> Result<f32> {
        ensure_same_shape(prediction, target)?;
        let diff = prediction.sub(target)?;
        Ok(diff.map(|d| d * d).mean_all())
    }

    fn compute_gradient(&self, prediction: &Tensor, target: &Tensor) -> Result<Tensor> {
        ensure_same_shape(prediction, target)?;
        let n = prediction.elem_count() as f32;
        prediction.zip_map(target, |p, t| 2.0 * (p - t) / n)
    }

    fn name(&self) -> &'static str {
        "MSE"
    }
}

/// Cross-entropy over pre-normalised probabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossEntropyLoss;

impl Loss for CrossEntropyLoss {
    fn compute_loss(&self, prediction: &Tensor, target: &Tensor) -> Result<f32> {
        ensure_same_shape(prediction, target)?;
        let per_elem = prediction.zip_map(target, |p, t| -t * p.max(CROSS_ENTROPY_EPS).ln())?;
        Ok(per_elem.mean_all())
    }

    fn compute_gradient(&self, prediction: &Tensor, target: &Tensor) -> Result<Tensor> {
        ensure_same_shape(prediction, target)?;
        let n = prediction.elem_count() as f32;
        prediction.zip_map(target, |p, t| {
            let p = p.max(CROSS_ENTROPY_EPS);
            (p - t) / (p * n)
        })
    }

    fn name(&self) -> &'static str {
        "CrossEntropy"
    }
}

/// Mean Squared Error: mean((prediction - target)²)
///
/// # Example
/// ```ignore
/// let loss = mse_loss(&y_pred, &y_true)?;
/// ```
pub fn mse_loss(prediction: &Tensor, target: &Tensor) -> Result<f32> {
    MseLoss.compute_loss(prediction, target)
}

/// Cross-entropy over probabilities: mean(-target * log(max(prediction, ε)))
pub fn cross_entropy_loss(prediction: &Tensor, target: &Tensor) -> Result<f32> {
    CrossEntropyLoss.compute_loss(prediction, target)
}
