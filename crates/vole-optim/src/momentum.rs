// Momentum — SGD with a velocity term
//
// For every parameter slot of every layer:
//
//   v     = momentum * v - lr * grad
//   param = param + v
//
// One velocity buffer is kept per layer per parameter slot. Buffers are
// zero-initialised on first use and follow the slot's element count.

use vole_core::error::Result;
use vole_nn::Layer;

use crate::optimizer::{check_layers, paired, track_len, LayerSlots, Optimizer};

/// Gradient descent with classical momentum.
#[derive(Debug, Clone)]
pub struct Momentum {
    lr: f32,
    momentum: f32,
    /// velocities[layer][slot][element]
    velocities: LayerSlots<Vec<Vec<f32>>>,
}

impl Momentum {
    pub fn new(lr: f32, momentum: f32) -> Self {
        Momentum {
            lr,
            momentum,
            velocities: LayerSlots::new(),
        }
    }

    /// The momentum coefficient.
    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    /// Velocity buffers of the layer at `layer_id`, one per parameter slot.
    pub fn velocity(&self, layer_id: usize) -> Option<&[Vec<f32>]> {
        self.velocities.get(layer_id).map(Vec::as_slice)
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(0.01, 0.9)
    }
}

impl Optimizer for Momentum {
    fn step(&mut self, layers: &mut [Box<dyn Layer>]) -> Result<()> {
        check_layers(layers)?;
        let (lr, mu) = (self.lr, self.momentum);
        for (id, layer) in layers.iter_mut().enumerate() {
            let Some((params, grads)) = paired(layer.as_mut()) else {
                continue;
            };
            if params.is_empty() {
                continue;
            }
            let slots = self.velocities.get_or_insert_with(id, Vec::new);
            if slots.len() < params.len() {
                slots.resize_with(params.len(), Vec::new);
            }
            for ((param, grad), velocity) in params.into_iter().zip(grads).zip(slots.iter_mut()) {
                track_len(velocity, param.elem_count());
                for ((p, &g), v) in param
                    .as_mut_slice()
                    .iter_mut()
                    .zip(grad.as_slice())
                    .zip(velocity.iter_mut())
                {
                    *v = mu * *v - lr * g;
                    *p += *v;
                }
            }
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }
}
