//! # vole
//!
//! A minimal feed-forward neural network training engine.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use vole::prelude::*;
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|----------|
//! | `vole-core` | Tensor, Shape, Error |
//! | `vole-nn` | Layers (Linear, Sigmoid, ReLU, Tanh), losses, initialisers |
//! | `vole-optim` | Optimizers (SGD, Momentum, Adam) |
//! | `vole-data` | TensorDataset, DataLoader, preprocessing, logic-gate datasets |
//!
//! ## Modules
//!
//! - [`network`] — layer stack with forward / backward / train step
//! - [`train`] — epoch loop with validation split and logging

/// Re-export core types.
pub use vole_core::{bail, Error, Result, Shape, Tensor};

/// Re-export neural network layers and losses.
pub mod nn {
    pub use vole_nn::*;
}

/// Re-export optimizers.
pub mod optim {
    pub use vole_optim::*;
}

/// Re-export datasets and loaders.
pub mod data {
    pub use vole_data::*;
}

/// Network — ordered layer stack.
pub mod network;

/// Trainer — epoch loop runner.
pub mod train;

pub use network::{LayerId, Network};
pub use train::{EpochLog, TrainResult, Trainer, TrainingConfig};

/// Convenience prelude: `use vole::prelude::*;`
pub mod prelude {
    pub use crate::network::{LayerId, Network};
    pub use crate::train::{EpochLog, TrainResult, Trainer, TrainingConfig};
    pub use crate::{Error, Result, Shape, Tensor};
    pub use vole_data::{DataLoader, DataLoaderConfig, LogicGate, TensorDataset};
    pub use vole_nn::{CrossEntropyLoss, Layer, Linear, Loss, MseLoss, ReLU, Sigmoid, Tanh};
    pub use vole_optim::{Adam, Momentum, Optimizer, Sgd};
}
