// Adam — adaptive moment estimation
//
// Per element, at timestep t:
//
//   m     = β1 * m + (1 - β1) * g
//   v     = β2 * v + (1 - β2) * g²
//   m_hat = m / (1 - β1^t)
//   v_hat = v / (1 - β2^t)
//   param -= lr * m_hat / (sqrt(v_hat) + ε)
//
// The bias corrections are folded into a per-step learning rate so the inner
// loop works on the raw moments:
//
//   lr_t  = lr * sqrt(1 - β2^t) / (1 - β1^t)
//   ε_t   = ε * sqrt(1 - β2^t)
//   param -= lr_t * m / (sqrt(v) + ε_t)
//
// which is algebraically the same update.
//
// t is global: it advances once per step() and every layer in that call uses
// the same value. Moments are kept per layer per parameter slot (slot 0 is
// the weight matrix, slot 1 the bias for Linear).

use vole_core::error::Result;
use vole_nn::Layer;

use crate::optimizer::{check_layers, paired, track_len, LayerSlots, Optimizer};

/// First and second moment estimates for one parameter slot.
#[derive(Debug, Clone, Default)]
pub struct Moments {
    pub m: Vec<f32>,
    pub v: Vec<f32>,
}

/// The Adam optimizer.
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    timestep: u32,
    /// moments[layer][slot]
    moments: LayerSlots<Vec<Moments>>,
}

impl Adam {
    /// Adam with β1 = 0.9, β2 = 0.999, ε = 1e-8.
    pub fn new(lr: f32) -> Self {
        Self::with_config(lr, 0.9, 0.999, 1e-8)
    }

    pub fn with_config(lr: f32, beta1: f32, beta2: f32, eps: f32) -> Self {
        Adam {
            lr,
            beta1,
            beta2,
            eps,
            timestep: 0,
            moments: LayerSlots::new(),
        }
    }

    /// Number of completed steps.
    pub fn timestep(&self) -> u32 {
        self.timestep
    }

    pub fn betas(&self) -> (f32, f32) {
        (self.beta1, self.beta2)
    }

    pub fn eps(&self) -> f32 {
        self.eps
    }

    /// Moment estimates of the layer at `layer_id`, one entry per parameter slot.
    pub fn moments(&self, layer_id: usize) -> Option<&[Moments]> {
        self.moments.get(layer_id).map(Vec::as_slice)
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.001)
    }
}

impl Optimizer for Adam {
    fn step(&mut self, layers: &mut [Box<dyn Layer>]) -> Result<()> {
        check_layers(layers)?;
        self.timestep = self.timestep.saturating_add(1);
        let t = i32::try_from(self.timestep).unwrap_or(i32::MAX);

        let (beta1, beta2) = (self.beta1, self.beta2);
        let bc1 = 1.0 - beta1.powi(t);
        let bc2 = 1.0 - beta2.powi(t);
        let lr_t = self.lr * bc2.sqrt() / bc1;
        let eps_t = self.eps * bc2.sqrt();

        for (id, layer) in layers.iter_mut().enumerate() {
            let Some((params, grads)) = paired(layer.as_mut()) else {
                continue;
            };
            if params.is_empty() {
                continue;
            }
            let slots = self.moments.get_or_insert_with(id, Vec::new);
            if slots.len() < params.len() {
                slots.resize_with(params.len(), Moments::default);
            }
            for ((param, grad), moments) in params.into_iter().zip(grads).zip(slots.iter_mut()) {
                let n = param.elem_count();
                track_len(&mut moments.m, n);
                track_len(&mut moments.v, n);
                for (((p, &g), m), v) in param
                    .as_mut_slice()
                    .iter_mut()
                    .zip(grad.as_slice())
                    .zip(moments.m.iter_mut())
                    .zip(moments.v.iter_mut())
                {
                    *m = beta1 * *m + (1.0 - beta1) * g;
                    *v = beta2 * *v + (1.0 - beta2) * g * g;
                    *p -= lr_t * *m / (v.sqrt() + eps_t);
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

#[cfg(test)]
mod tests {
    use super::*;
    use vole_core::tensor::Tensor;
    use vole_nn::Linear;

    fn unit_grad_layer() -> Vec<Box<dyn Layer>> {
        let w = Tensor::from_rows(&[[0.0, 0.0]]).unwrap();
        let b = Tensor::zeros((1, 1));
        let mut lin = Linear::from_tensors(w, b).unwrap();
        lin.forward(&Tensor::column(&[1.0, 1.0])).unwrap();
        lin.backward(&Tensor::column(&[1.0])).unwrap();
        vec![Box::new(lin)]
    }

    #[test]
    fn test_first_step_magnitude() {
        let mut layers = unit_grad_layer();
        let mut opt = Adam::new(0.001);
        opt.step(&mut layers).unwrap();
        assert_eq!(opt.timestep(), 1);

        let expected = -0.001 / (1.0 + 1e-8);
        for p in layers[0].parameters() {
            for &x in p.as_slice() {
                assert!((x - expected).abs() < 1e-6, "got {x}");
            }
        }
    }

    #[test]
    fn test_timestep_is_global() {
        let mut layers = unit_grad_layer();
        layers.extend(unit_grad_layer());
        let mut opt = Adam::default();
        opt.step(&mut layers).unwrap();
        opt.step(&mut layers).unwrap();
        // One tick per step, not per layer.
        assert_eq!(opt.timestep(), 2);
        assert_eq!(opt.moments(0).unwrap().len(), 2);
        assert_eq!(opt.moments(1).unwrap()[0].m.len(), 2);
    }
}
