// Linear — Fully-connected (dense) layer
//
// y = W @ x + b
//
// Inputs are column-oriented: a single sample is an (in_features, 1) column,
// a batch is (in_features, batch) with one sample per column.
//
// PARAMETER SHAPES:
//
//   weight: [out_features, in_features]
//   bias:   [out_features, 1]   — added to every column of W @ x
//
// WEIGHT INITIALIZATION:
//
// Weights are drawn from N(0, 0.1) using a caller-supplied RNG, so two
// layers built from the same seed are identical. Bias starts at zero.
//
// BACKWARD:
//
//   dW     = grad_out @ x^T
//   db     = sum of grad_out over the batch (columns)
//   dInput = W^T @ grad_out

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vole_core::error::{Error, Result};
use vole_core::shape::Shape;
use vole_core::tensor::Tensor;

use crate::init;
use crate::layer::Layer;

/// Standard deviation of the initial weight distribution.
pub const INIT_STD: f64 = 0.1;

/// A fully-connected layer: y = Wx + b.
#[derive(Debug, Clone)]
pub struct Linear {
    weight: Tensor,
    bias: Tensor,
    grad_weight: Tensor,
    grad_bias: Tensor,
    input_cache: Option<Tensor>,
}

impl Linear {
    /// Create a layer with N(0, 0.1) weights drawn from `rng` and zero bias.
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let weight = init::normal((out_features, in_features), 0.0, INIT_STD, rng)?;
        let bias = init::zeros((out_features, 1));
        Ok(Self::from_parts(weight, bias))
    }

    /// Create a layer whose weights come from a fresh `StdRng` seeded with `seed`.
    pub fn with_seed(in_features: usize, out_features: usize, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(in_features, out_features, &mut rng)
    }

    /// Create a layer from existing weight and bias tensors.
    ///
    /// `bias` must be a column with one entry per weight row.
    pub fn from_tensors(weight: Tensor, bias: Tensor) -> Result<Self> {
        let expected = Shape::new(weight.rows(), 1);
        if bias.shape() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                got: bias.shape(),
            });
        }
        Ok(Self::from_parts(weight, bias))
    }

    fn from_parts(weight: Tensor, bias: Tensor) -> Self {
        Linear {
            grad_weight: Tensor::zeros_like(&weight),
            grad_bias: Tensor::zeros_like(&bias),
            weight,
            bias,
            input_cache: None,
        }
    }

    /// The input feature dimension.
    pub fn in_features(&self) -> usize {
        self.weight.cols()
    }

    /// The output feature dimension.
    pub fn out_features(&self) -> usize {
        self.weight.rows()
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    /// Gradient of the weights from the most recent backward pass.
    pub fn weight_grad(&self) -> &Tensor {
        &self.grad_weight
    }

    /// Gradient of the bias from the most recent backward pass.
    pub fn bias_grad(&self) -> &Tensor {
        &self.grad_bias
    }

    /// Replace the weights. The new tensor must keep the current shape.
    pub fn set_weights(&mut self, weight: Tensor) -> Result<()> {
        if weight.shape() != self.weight.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.weight.shape(),
                got: weight.shape(),
            });
        }
        self.weight = weight;
        Ok(())
    }

    /// Replace the bias. The new tensor must keep the current shape.
    pub fn set_bias(&mut self, bias: Tensor) -> Result<()> {
        if bias.shape() != self.bias.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.bias.shape(),
                got: bias.shape(),
            });
        }
        self.bias = bias;
        Ok(())
    }
}

impl Layer for Linear {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        let output = self.infer(x)?;
        self.input_cache = Some(x.clone());
        Ok(output)
    }

    fn infer(&self, x: &Tensor) -> Result<Tensor> {
        let mut output = self.weight.matmul(x)?;
        let cols = output.cols();
        let bias = self.bias.as_slice();
        for (i, row) in output.as_mut_slice().chunks_mut(cols.max(1)).enumerate() {
            for v in row.iter_mut() {
                *v += bias[i];
            }
        }
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let input = self
            .input_cache
            .as_ref()
            .ok_or(Error::MissingForwardCache { layer: "Linear" })?;
        // All three products succeed before any gradient slot is written.
        let grad_weight = grad_output.matmul(&input.transpose())?;
        let grad_bias = grad_output.sum(1)?;
        let grad_input = self.weight.transpose().matmul(grad_output)?;
        self.grad_weight = grad_weight;
        self.grad_bias = grad_bias;
        Ok(grad_input)
    }

    fn name(&self) -> &'static str {
        "Linear"
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weight, &self.bias]
    }

    fn gradients(&self) -> Vec<&Tensor> {
        vec![&self.grad_weight, &self.grad_bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weight, &mut self.bias]
    }

    fn gradients_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.grad_weight, &mut self.grad_bias]
    }

    fn params_and_grads(&mut self) -> (Vec<&mut Tensor>, Vec<&Tensor>) {
        (
            vec![&mut self.weight, &mut self.bias],
            vec![&self.grad_weight, &self.grad_bias],
        )
    }

    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        vec![
            ("weight".to_string(), &self.weight),
            ("bias".to_string(), &self.bias),
        ]
    }
}
