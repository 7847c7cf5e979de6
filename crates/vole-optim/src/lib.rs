//! # vole-optim
//!
//! Optimizers that update layer parameters in place from the gradients
//! filled in by `backward()`:
//!
//! - [`Sgd`] — `param -= lr * grad`
//! - [`Momentum`] — SGD with a per-slot velocity buffer
//! - [`Adam`] — bias-corrected first/second moment estimates
//!
//! Per-layer state lives in a [`LayerSlots`] side-table keyed by the layer's
//! position in the network.

pub mod adam;
pub mod momentum;
pub mod optimizer;
pub mod sgd;

pub use adam::{Adam, Moments};
pub use momentum::Momentum;
pub use optimizer::{LayerSlots, Optimizer};
pub use sgd::Sgd;
