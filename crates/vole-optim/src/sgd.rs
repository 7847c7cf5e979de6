// SGD — plain stochastic gradient descent
//
// For every (parameter, gradient) pair:  param -= lr * grad
//
// Stateless: nothing is remembered between steps.

use vole_core::error::Result;
use vole_nn::Layer;

use crate::optimizer::{check_layers, paired, Optimizer};

/// Stochastic gradient descent.
#[derive(Debug, Clone)]
pub struct Sgd {
    lr: f32,
}

impl Sgd {
    pub fn new(lr: f32) -> Self {
        Sgd { lr }
    }
}

impl Default for Sgd {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, layers: &mut [Box<dyn Layer>]) -> Result<()> {
        check_layers(layers)?;
        for layer in layers.iter_mut() {
            let Some((params, grads)) = paired(layer.as_mut()) else {
                continue;
            };
            for (param, grad) in params.into_iter().zip(grads) {
                param.axpy(-self.lr, grad)?;
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
    use vole_nn::{Linear, ReLU};

    #[test]
    fn test_sgd_exact_update() {
        let w = Tensor::from_rows(&[[1.0, 2.0]]).unwrap();
        let b = Tensor::from_rows(&[[0.5]]).unwrap();
        let mut lin = Linear::from_tensors(w, b).unwrap();
        lin.forward(&Tensor::column(&[1.0, -1.0])).unwrap();
        lin.backward(&Tensor::column(&[2.0])).unwrap();

        let mut layers: Vec<Box<dyn Layer>> = vec![Box::new(lin), Box::new(ReLU::new())];
        let mut opt = Sgd::new(0.1);
        opt.step(&mut layers).unwrap();

        // grad_w = [2, -2], grad_b = [2]
        let params = layers[0].parameters();
        assert!(params[0].approx_eq(&Tensor::from_rows(&[[0.8, 2.2]]).unwrap(), 1e-6));
        assert!(params[1].approx_eq(&Tensor::from_rows(&[[0.3]]).unwrap(), 1e-6));
    }

    #[test]
    fn test_learning_rate_accessors() {
        let mut opt = Sgd::default();
        assert_eq!(opt.learning_rate(), 0.01);
        opt.set_learning_rate(0.5);
        assert_eq!(opt.learning_rate(), 0.5);
    }
}
