// Activation layers — element-wise non-linearities with no parameters
//
// Each layer caches exactly what its derivative needs:
//
//   Sigmoid  caches the output y:  dy/dx = y * (1 - y)
//   Tanh     caches the output y:  dy/dx = 1 - y²
//   ReLU     caches the input x:   dy/dx = 1 if x > 0, else 0
//
// ReLU's derivative at exactly x == 0 is taken as 0.
//
// Example:
//   let mut net = Network::new();
//   net.add_layer(Linear::with_seed(2, 4, 0)?);
//   net.add_layer(ReLU::new());

use vole_core::error::{Error, Result};
use vole_core::tensor::Tensor;

use crate::layer::Layer;

/// Sigmoid activation: 1 / (1 + e^(-x))
#[derive(Debug, Clone, Default)]
pub struct Sigmoid {
    output_cache: Option<Tensor>,
}

impl Sigmoid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for Sigmoid {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        let y = x.sigmoid();
        self.output_cache = Some(y.clone());
        Ok(y)
    }

    fn infer(&self, x: &Tensor) -> Result<Tensor> {
        Ok(x.sigmoid())
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let y = self
            .output_cache
            .as_ref()
            .ok_or(Error::MissingForwardCache { layer: "Sigmoid" })?;
        grad_output.zip_map(y, |g, y| g * y * (1.0 - y))
    }

    fn name(&self) -> &'static str {
        "Sigmoid"
    }
}

/// ReLU activation: max(0, x)
#[derive(Debug, Clone, Default)]
pub struct ReLU {
    input_cache: Option<Tensor>,
}

impl ReLU {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for ReLU {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        self.input_cache = Some(x.clone());
        Ok(x.relu())
    }

    fn infer(&self, x: &Tensor) -> Result<Tensor> {
        Ok(x.relu())
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let x = self
            .input_cache
            .as_ref()
            .ok_or(Error::MissingForwardCache { layer: "ReLU" })?;
        grad_output.zip_map(x, |g, x| if x > 0.0 { g } else { 0.0 })
    }

    fn name(&self) -> &'static str {
        "ReLU"
    }
}

/// Tanh activation
#[derive(Debug, Clone, Default)]
pub struct Tanh {
    output_cache: Option<Tensor>,
}

impl Tanh {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for Tanh {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor> {
        let y = x.tanh();
        self.output_cache = Some(y.clone());
        Ok(y)
    }

    fn infer(&self, x: &Tensor) -> Result<Tensor> {
        Ok(x.tanh())
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let y = self
            .output_cache
            .as_ref()
            .ok_or(Error::MissingForwardCache { layer: "Tanh" })?;
        grad_output.zip_map(y, |g, y| g * (1.0 - y * y))
    }

    fn name(&self) -> &'static str {
        "Tanh"
    }
}
