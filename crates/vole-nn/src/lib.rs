//! # vole-nn
//!
//! Network layers, loss functions and initialisers for vole.
//!
//! Every layer implements the [`Layer`] trait:
//!
//! 1. **Layer trait** — `forward()` caches, `backward()` fills gradient slots
//! 2. **Linear** — fully connected: `y = Wx + b`
//! 3. **Activations** — Sigmoid, ReLU, Tanh
//! 4. **Loss functions** — MseLoss, CrossEntropyLoss
//!
//! Gradients are derived by hand in each layer; there is no autograd graph.

pub mod activation;
pub mod init;
pub mod layer;
pub mod linear;
pub mod loss;
pub mod metrics;

pub use activation::{ReLU, Sigmoid, Tanh};
pub use layer::Layer;
pub use linear::Linear;
pub use loss::{cross_entropy_loss, mse_loss, CrossEntropyLoss, Loss, MseLoss};
pub use metrics::{accuracy, argmax_classes};
