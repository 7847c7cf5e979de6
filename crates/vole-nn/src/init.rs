// nn::init — Parameter Initialization Utilities
//
// Standalone functions for creating initialized tensors. Randomness is always
// supplied by the caller, so initialization is reproducible from a seed.
//
// AVAILABLE INITIALIZERS:
//
//   normal(shape, mean, std, rng)    — N(mean, std)
//   uniform(shape, low, high, rng)   — U(low, high)
//   zeros(shape)                     — all zeros

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use vole_core::error::{Error, Result};
use vole_core::shape::Shape;
use vole_core::tensor::Tensor;

/// Initialize a tensor from a normal distribution N(mean, std).
///
/// Fails when `std` is negative or not finite.
pub fn normal<R: Rng + ?Sized>(
    shape: impl Into<Shape>,
    mean: f64,
    std: f64,
    rng: &mut R,
) -> Result<Tensor> {
    let shape = shape.into();
    let dist = Normal::new(mean, std)
        .map_err(|e| Error::msg(format!("invalid normal distribution N({mean}, {std}): {e}")))?;
    let data = (0..shape.elem_count())
        .map(|_| dist.sample(rng) as f32)
        .collect();
    Tensor::new(data, shape)
}

/// Initialize a tensor from a uniform distribution U(low, high).
///
/// Fails unless both bounds are finite and `low < high`.
pub fn uniform<R: Rng + ?Sized>(
    shape: impl Into<Shape>,
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<Tensor> {
    if !low.is_finite() || !high.is_finite() || low >= high {
        return Err(Error::msg(format!(
            "invalid uniform range: low {low} must be below high {high}"
        )));
    }
    let shape = shape.into();
    let dist = Uniform::new(low, high);
    let data = (0..shape.elem_count())
        .map(|_| dist.sample(rng) as f32)
        .collect();
    Tensor::new(data, shape)
}

/// Initialize a tensor with all zeros.
pub fn zeros(shape: impl Into<Shape>) -> Tensor {
    Tensor::zeros(shape)
}
