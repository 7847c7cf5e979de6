// Optimizer trait — updates layer parameters from their gradients
//
// An optimizer walks the network's layer slice. For each layer it takes the
// split borrow (parameters mutable, gradients shared) and updates every
// parameter in place.
//
// LAYER IDENTITY:
//
// A layer is identified by its position in the slice, which is the slot
// the network assigned when the layer was added. Optimizer state (momentum
// velocities, Adam moments) is kept in a side-table indexed by that
// position, so it is only meaningful while the optimizer trains one network
// whose layer list does not change. Do not share one optimizer between
// networks.

use vole_core::error::{Error, Result};
use vole_core::tensor::Tensor;
use vole_nn::Layer;

/// Gradient-based parameter update rule.
pub trait Optimizer {
    /// Apply one update to every layer using its current gradients.
    fn step(&mut self, layers: &mut [Box<dyn Layer>]) -> Result<()>;

    /// Zero every gradient slot.
    ///
    /// `backward()` overwrites gradients, so training never needs this; it is
    /// here for callers that inspect or accumulate gradients themselves.
    fn zero_grad(&mut self, layers: &mut [Box<dyn Layer>]) {
        for layer in layers.iter_mut() {
            for grad in layer.gradients_mut() {
                grad.fill(0.0);
            }
        }
    }

    /// Current base learning rate.
    fn learning_rate(&self) -> f32;

    /// Change the base learning rate.
    fn set_learning_rate(&mut self, lr: f32);
}

/// Per-layer auxiliary state, indexed by layer slot.
///
/// Entries are created on first use and live as long as the optimizer.
#[derive(Debug, Clone)]
pub struct LayerSlots<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for LayerSlots<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> LayerSlots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for layer `id`, created with `init` if absent.
    pub fn get_or_insert_with(&mut self, id: usize, init: impl FnOnce() -> T) -> &mut T {
        if self.slots.len() <= id {
            self.slots.resize_with(id + 1, || None);
        }
        self.slots[id].get_or_insert_with(init)
    }

    /// State for layer `id`, if it has been created.
    pub fn get(&self, id: usize) -> Option<&T> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    /// Number of layers with state.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resize `buf` to `len`, zero-filling new entries.
pub(crate) fn track_len(buf: &mut Vec<f32>, len: usize) {
    if buf.len() != len {
        buf.resize(len, 0.0);
    }
}

/// Parameters and gradients of one layer, or `None` when the counts differ.
pub(crate) fn paired(layer: &mut dyn Layer) -> Option<(Vec<&mut Tensor>, Vec<&Tensor>)> {
    let (params, grads) = layer.params_and_grads();
    if params.len() != grads.len() {
        return None;
    }
    Some((params, grads))
}

/// Shape-check every (parameter, gradient) pair of every layer.
///
/// Runs before a step touches anything, so a failing step leaves all
/// parameters and optimizer state as they were.
pub(crate) fn check_layers(layers: &mut [Box<dyn Layer>]) -> Result<()> {
    for layer in layers.iter_mut() {
        if let Some((params, grads)) = paired(layer.as_mut()) {
            for (param, grad) in params.iter().zip(&grads) {
                check_pair(param, grad)?;
            }
        }
    }
    Ok(())
}

/// A parameter and its gradient must have identical shapes.
pub(crate) fn check_pair(param: &Tensor, grad: &Tensor) -> Result<()> {
    if param.shape() != grad.shape() {
        return Err(Error::ShapeMismatch {
            expected: param.shape(),
            got: grad.shape(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_slots_lazy() {
        let mut slots: LayerSlots<Vec<f32>> = LayerSlots::new();
        assert!(slots.is_empty());
        slots.get_or_insert_with(3, || vec![1.0]).push(2.0);
        assert_eq!(slots.len(), 1);
        assert!(slots.get(0).is_none());
        assert_eq!(slots.get(3), Some(&vec![1.0, 2.0]));
        // A second lookup does not re-run init.
        assert_eq!(slots.get_or_insert_with(3, Vec::new).len(), 2);
    }

    #[test]
    fn test_track_len() {
        let mut v = vec![1.0, 2.0];
        track_len(&mut v, 4);
        assert_eq!(v, vec![1.0, 2.0, 0.0, 0.0]);
        track_len(&mut v, 1);
        assert_eq!(v, vec![1.0]);
    }
}
