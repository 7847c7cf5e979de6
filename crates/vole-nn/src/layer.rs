// Layer trait — The interface every network layer implements
//
// A layer is a differentiable transformation with hand-derived gradients.
// It owns its learnable parameters, their gradients, and whatever it must
// remember from forward() to run backward().
//
// THE PROTOCOL:
//
//   forward(x)        — compute the output and cache what backward needs
//   backward(grad)    — given dLoss/dOutput, fill the gradient slots and
//                       return dLoss/dInput for the previous layer
//   optimizer.step()  — reads (parameter, gradient) pairs and updates in place
//
// Every backward() overwrites the gradient slots; nothing accumulates across
// calls.
//
// PARAMETER ORDER:
//
// parameters() and gradients() list slots in a fixed order. For Linear,
// slot 0 is the weight matrix and slot 1 is the bias. Optimizers key their
// per-slot state on this position.

use vole_core::error::Result;
use vole_core::tensor::Tensor;

/// The fundamental trait for all network layers.
///
/// Layers are stored as `Box<dyn Layer>` inside a network, so the trait is
/// object safe. Parameter-free layers only implement `forward`, `infer`,
/// `backward` and `name`; the parameter accessors default to empty lists.
///
/// # Example
/// ```ignore
/// struct Scale { k: f32 }
///
/// impl Layer for Scale {
///     fn forward(&mut self, x: &Tensor) -> Result<Tensor> { self.infer(x) }
///     fn infer(&self, x: &Tensor) -> Result<Tensor> { Ok(x.scale(self.k)) }
///     fn backward(&mut self, g: &Tensor) -> Result<Tensor> { Ok(g.scale(self.k)) }
///     fn name(&self) -> &'static str { "Scale" }
/// }
/// ```
pub trait Layer {
    /// Compute the output and cache what `backward` needs.
    fn forward(&mut self, x: &Tensor) -> Result<Tensor>;

    /// Compute the output without touching any cache.
    fn infer(&self, x: &Tensor) -> Result<Tensor>;

    /// Propagate `grad_output` (dLoss/dOutput) through the layer.
    ///
    /// Overwrites the layer's gradient slots and returns dLoss/dInput.
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor>;

    /// Short type name, used in error messages and parameter names.
    fn name(&self) -> &'static str;

    /// Plain gradient descent on this layer's own parameters:
    /// `param -= learning_rate * grad`.
    fn update_parameters(&mut self, learning_rate: f32) -> Result<()> {
        let (params, grads) = self.params_and_grads();
        for (p, g) in params.into_iter().zip(grads) {
            p.axpy(-learning_rate, g)?;
        }
        Ok(())
    }

    /// Learnable tensors, in slot order.
    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    /// Gradients of the learnable tensors, in slot order.
    fn gradients(&self) -> Vec<&Tensor> {
        vec![]
    }

    /// Mutable learnable tensors, in slot order.
    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }

    /// Mutable gradient tensors, in slot order.
    fn gradients_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }

    /// Parameters (mutable) together with their gradients (shared).
    ///
    /// Optimizers need both at once; this is the split borrow that allows it.
    fn params_and_grads(&mut self) -> (Vec<&mut Tensor>, Vec<&Tensor>) {
        (vec![], vec![])
    }

    /// Total number of scalar parameters in this layer.
    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(|p| p.elem_count()).sum()
    }

    /// Parameters with human-readable names.
    ///
    /// The default uses positional indices (`param_0`, `param_1`, …).
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        self.parameters()
            .into_iter()
            .enumerate()
            .map(|(i, p)| (format!("param_{i}"), p))
            .collect()
    }
}
