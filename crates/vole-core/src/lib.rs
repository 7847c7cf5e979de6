//! # vole-core
//!
//! Core tensor primitives and error types for vole.
//!
//! This crate provides:
//! - [`Tensor`] — dense, row-major 2-D `f32` matrix
//! - [`Shape`] — (rows, cols) pair
//! - [`Error`] / [`Result`] — the error type shared by every vole crate

pub mod error;
pub mod shape;
pub mod tensor;

pub use error::{Error, Result};
pub use shape::Shape;
pub use tensor::Tensor;
