use crate::shape::Shape;

/// All errors that can occur within vole.
///
/// Every failure is detected synchronously and returned to the caller; nothing
/// is retried or recovered internally. A single error type is shared by the
/// tensor, layer, optimizer and data crates so `?` works across all of them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Element-wise operation, loss or parameter update on differing shapes.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    /// Flat data does not fill the requested shape.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// Matrix multiplication with incompatible inner dimensions.
    #[error("matmul dimension mismatch: [{m}x{k1}] @ [{k2}x{n}], inner dims must match")]
    DimensionMismatch {
        m: usize,
        k1: usize,
        k2: usize,
        n: usize,
    },

    /// (row, col) access outside the tensor.
    #[error("index ({row}, {col}) out of range for tensor of shape {shape}")]
    IndexOutOfRange { row: usize, col: usize, shape: Shape },

    /// Flat access outside the tensor storage.
    #[error("flat index {index} out of range for tensor with {len} elements")]
    FlatIndexOutOfRange { index: usize, len: usize },

    /// Reduction over an axis other than -1, 0 or 1.
    #[error("invalid axis {axis} for sum: expected -1, 0 or 1")]
    InvalidAxis { axis: isize },

    /// Scalar division by zero.
    #[error("division by zero")]
    DivideByZero,

    /// `backward` was called on a layer that has not run `forward` yet.
    #[error("{layer}: backward called before forward")]
    MissingForwardCache { layer: &'static str },

    /// Input and target collections of different lengths.
    #[error("length mismatch: {inputs} inputs but {targets} targets")]
    LengthMismatch { inputs: usize, targets: usize },

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout vole.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
