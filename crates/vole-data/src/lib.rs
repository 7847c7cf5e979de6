//! # vole-data
//!
//! Datasets, batching and preprocessing for vole.
//!
//! This crate provides:
//! - [`TensorDataset`] — in-memory (input, target) samples with seeded splitting
//! - [`DataLoader`] — batching and shuffling over a dataset
//! - Preprocessing — [`normalize`], [`standardize`], their dataset variants, [`one_hot`]
//! - [`logic_gate_dataset`] — XOR / AND / OR truth tables

pub mod dataset;
pub mod loader;
pub mod synthetic;
pub mod transform;

pub use dataset::TensorDataset;
pub use loader::{Batch, DataLoader, DataLoaderConfig};
pub use synthetic::{logic_gate_dataset, LogicGate};
pub use transform::{normalize, normalize_dataset, one_hot, standardize, standardize_dataset};
