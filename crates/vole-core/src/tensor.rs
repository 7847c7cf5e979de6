use std::fmt;
use std::ops::{Mul, Neg};

use crate::error::{Error, Result};
use crate::shape::Shape;

// Tensor — dense 2-D float matrix
//
// A Tensor owns a flat row-major buffer of f32 plus its Shape. There is no
// sharing: cloning copies the buffer, and every operation that produces a
// tensor allocates fresh storage. The receiver of a non-`&mut` method is
// never modified.
//
// SHAPE RULES:
//
//   add / sub / mul     — operands must have identical shapes
//   matmul              — lhs.cols == rhs.rows, result (lhs.rows, rhs.cols)
//   sum(axis)           — -1: (1, 1), 0: (1, cols), 1: (rows, 1)
//
// Gradients are derived by hand in each layer, so the tensor carries no
// autograd graph.

/// A dense, row-major 2-D matrix of `f32`.
///
/// # Example
/// ```
/// use vole_core::Tensor;
///
/// let a = Tensor::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
/// let b = Tensor::from_rows(&[[1.0], [1.0]])?;
/// let c = a.matmul(&b)?;
/// assert_eq!(c.to_vec(), vec![3.0, 7.0]);
/// # Ok::<(), vole_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Shape,
}

impl Tensor {
    // Construction

    /// Create a tensor from flat row-major data and an explicit shape.
    pub fn new(data: Vec<f32>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.elem_count() {
            return Err(Error::ElementCountMismatch {
                shape,
                expected: shape.elem_count(),
                got: data.len(),
            });
        }
        Ok(Tensor { data, shape })
    }

    /// Create a tensor from a nested row literal.
    ///
    /// All rows must have the same length. An empty row list gives a 0×0
    /// tensor; `n` empty rows give an n×0 tensor.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::ShapeMismatch {
                    expected: Shape::new(1, cols),
                    got: Shape::new(1, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Tensor {
            data,
            shape: Shape::new(rows.len(), cols),
        })
    }

    /// A column vector (n, 1) holding `values`.
    pub fn column(values: &[f32]) -> Self {
        Tensor {
            data: values.to_vec(),
            shape: Shape::new(values.len(), 1),
        }
    }

    /// A tensor filled with `value`.
    pub fn full(shape: impl Into<Shape>, value: f32) -> Self {
        let shape = shape.into();
        Tensor {
            data: vec![value; shape.elem_count()],
            shape,
        }
    }

    /// A zero-filled tensor.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        Self::full(shape, 0.0)
    }

    /// A tensor of ones.
    pub fn ones(shape: impl Into<Shape>) -> Self {
        Self::full(shape, 1.0)
    }

    /// A zero-filled tensor with the same shape as `other`.
    pub fn zeros_like(other: &Tensor) -> Self {
        Self::zeros(other.shape)
    }

    // Accessors

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Number of stored elements (rows * cols).
    pub fn elem_count(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the raw row-major buffer.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        self.checked_index(row, col).map(|i| self.data[i])
    }

    /// Mutable reference to the element at (row, col).
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut f32> {
        let i = self.checked_index(row, col)?;
        Ok(&mut self.data[i])
    }

    /// Overwrite the element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        *self.get_mut(row, col)? = value;
        Ok(())
    }

    /// Element at a flat row-major index.
    pub fn get_flat(&self, index: usize) -> Result<f32> {
        self.data
            .get(index)
            .copied()
            .ok_or(Error::FlatIndexOutOfRange {
                index,
                len: self.data.len(),
            })
    }

    /// Overwrite the element at a flat row-major index.
    pub fn set_flat(&mut self, index: usize, value: f32) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(Error::FlatIndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize> {
        if !self.shape.contains(row, col) {
            return Err(Error::IndexOutOfRange {
                row,
                col,
                shape: self.shape,
            });
        }
        Ok(self.shape.index(row, col))
    }

    // Element-wise arithmetic

    fn ensure_same_shape(&self, rhs: &Tensor) -> Result<()> {
        if self.shape != rhs.shape {
            return Err(Error::ShapeMismatch {
                expected: self.shape,
                got: rhs.shape,
            });
        }
        Ok(())
    }

    /// Apply `f` pairwise to two tensors of identical shape.
    pub fn zip_map(&self, rhs: &Tensor, f: impl Fn(f32, f32) -> f32) -> Result<Tensor> {
        self.ensure_same_shape(rhs)?;
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Tensor {
            data,
            shape: self.shape,
        })
    }

    /// Apply `f` to every element.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape,
        }
    }

    /// Element-wise sum.
    pub fn add(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_map(rhs, |a, b| a + b)
    }

    /// Element-wise difference.
    pub fn sub(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_map(rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn mul(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_map(rhs, |a, b| a * b)
    }

    /// Multiply every element by `k`.
    pub fn scale(&self, k: f32) -> Tensor {
        self.map(|x| x * k)
    }

    /// Add `k` to every element.
    pub fn add_scalar(&self, k: f32) -> Tensor {
        self.map(|x| x + k)
    }

    /// Divide every element by `k`. Fails on `k == 0`.
    pub fn div_scalar(&self, k: f32) -> Result<Tensor> {
        if k == 0.0 {
            return Err(Error::DivideByZero);
        }
        Ok(self.map(|x| x / k))
    }

    /// In place: `self += alpha * x`.
    pub fn axpy(&mut self, alpha: f32, x: &Tensor) -> Result<()> {
        self.ensure_same_shape(x)?;
        for (p, &g) in self.data.iter_mut().zip(&x.data) {
            *p += alpha * g;
        }
        Ok(())
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    // Linear algebra

    /// Matrix product `self @ rhs`.
    ///
    /// Plain triple loop; requires `self.cols() == rhs.rows()`.
    pub fn matmul(&self, rhs: &Tensor) -> Result<Tensor> {
        let (m, k1) = (self.rows(), self.cols());
        let (k2, n) = (rhs.rows(), rhs.cols());
        if k1 != k2 {
            return Err(Error::DimensionMismatch { m, k1, k2, n });
        }
        let mut out = vec![0.0f32; m * n];
        for i in 0..m {
            for j in 0..n {
                let mut acc = 0.0f32;
                for k in 0..k1 {
                    acc += self.data[i * k1 + k] * rhs.data[k * n + j];
                }
                out[i * n + j] = acc;
            }
        }
        Ok(Tensor {
            data: out,
            shape: Shape::new(m, n),
        })
    }

    /// A new tensor with rows and columns swapped.
    pub fn transpose(&self) -> Tensor {
        let (rows, cols) = (self.rows(), self.cols());
        let mut out = vec![0.0f32; self.data.len()];
        for r in 0..rows {
            for c in 0..cols {
                out[c * rows + r] = self.data[r * cols + c];
            }
        }
        Tensor {
            data: out,
            shape: self.shape.transposed(),
        }
    }

    /// Same data viewed under a new shape with the same element count.
    pub fn reshape(&self, shape: impl Into<Shape>) -> Result<Tensor> {
        Tensor::new(self.data.clone(), shape)
    }

    // Reductions

    /// Sum along an axis.
    ///
    /// - `-1`: total of all elements as a (1, 1) tensor
    /// - `0`: collapse rows, giving column sums (1, cols)
    /// - `1`: collapse columns, giving row sums (rows, 1)
    pub fn sum(&self, axis: isize) -> Result<Tensor> {
        let (rows, cols) = (self.rows(), self.cols());
        match axis {
            -1 => Ok(Tensor {
                data: vec![self.sum_all()],
                shape: Shape::new(1, 1),
            }),
            0 => {
                let mut out = vec![0.0f32; cols];
                for r in 0..rows {
                    for (c, acc) in out.iter_mut().enumerate() {
                        *acc += self.data[r * cols + c];
                    }
                }
                Ok(Tensor {
                    data: out,
                    shape: Shape::new(1, cols),
                })
            }
            1 => {
                let mut out = vec![0.0f32; rows];
                for (r, acc) in out.iter_mut().enumerate() {
                    *acc = self.data[r * cols..(r + 1) * cols].iter().sum();
                }
                Ok(Tensor {
                    data: out,
                    shape: Shape::new(rows, 1),
                })
            }
            other => Err(Error::InvalidAxis { axis: other }),
        }
    }

    /// Total of all elements.
    pub fn sum_all(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Mean of all elements (0 for an empty tensor).
    pub fn mean_all(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.sum_all() / self.data.len() as f32
    }

    /// Flat index of the largest element; the first one wins on ties.
    /// Returns `None` for an empty tensor.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
    }

    // Activations

    /// Logistic sigmoid: 1 / (1 + e^(-x)).
    pub fn sigmoid(&self) -> Tensor {
        self.map(|x| 1.0 / (1.0 + (-x).exp()))
    }

    /// max(0, x).
    pub fn relu(&self) -> Tensor {
        self.map(|x| x.max(0.0))
    }

    /// Hyperbolic tangent.
    pub fn tanh(&self) -> Tensor {
        self.map(f32::tanh)
    }

    // Comparison

    /// Same shape and every element within `tol`.
    pub fn approx_eq(&self, other: &Tensor, tol: f32) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows() {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for c in 0..self.cols() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data[self.shape.index(r, c)])?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

// Scalar operators, on references only. An owned `Tensor: Mul<f32>` would
// shadow the element-wise `Tensor::mul(&self, &Tensor)` in method calls.

impl Mul<f32> for &Tensor {
    type Output = Tensor;

    fn mul(self, k: f32) -> Tensor {
        self.scale(k)
    }
}

impl Mul<&Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, t: &Tensor) -> Tensor {
        t.scale(self)
    }
}

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        self.scale(-1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(rows: &[&[f32]]) -> Tensor {
        Tensor::from_rows(rows).unwrap()
    }

    #[test]
    fn test_new_checks_element_count() {
        assert!(Tensor::new(vec![1.0, 2.0, 3.0], (2, 2)).is_err());
        let a = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], (2, 2)).unwrap();
        assert_eq!(a.get(1, 0).unwrap(), 3.0);
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = Tensor::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_rows_empty() {
        let rows: [[f32; 0]; 0] = [];
        let a = Tensor::from_rows(&rows).unwrap();
        assert_eq!(a.shape(), Shape::new(0, 0));
        assert!(a.is_empty());
    }

    #[test]
    fn test_from_rows_keeps_empty_row_count() {
        let rows: [[f32; 0]; 3] = [[], [], []];
        let a = Tensor::from_rows(&rows).unwrap();
        assert_eq!(a.shape(), Shape::new(3, 0));
        assert!(a.is_empty());
    }

    #[test]
    fn test_owned_mul_is_elementwise() {
        // `Mul` is in scope here; an owned receiver must still reach the
        // element-wise method.
        let a = t(&[&[1.0, 2.0]]);
        let b = t(&[&[3.0, 4.0]]);
        let c: Result<Tensor> = a.clone().mul(&b);
        assert_eq!(c.unwrap().to_vec(), vec![3.0, 8.0]);
        assert_eq!(Mul::mul(&a, 3.0).to_vec(), vec![3.0, 6.0]);
    }

    #[test]
    fn test_index_out_of_range() {
        let mut a = Tensor::zeros((2, 3));
        assert!(matches!(
            a.get(2, 0),
            Err(Error::IndexOutOfRange { row: 2, col: 0, .. })
        ));
        assert!(a.get(0, 3).is_err());
        assert!(matches!(
            a.get_flat(6),
            Err(Error::FlatIndexOutOfRange { index: 6, len: 6 })
        ));
        assert!(a.set_flat(6, 1.0).is_err());
        a.set(1, 2, 7.0).unwrap();
        assert_eq!(a.get_flat(5).unwrap(), 7.0);
    }

    #[test]
    fn test_elementwise_shape_mismatch() {
        let a = Tensor::zeros((2, 3));
        let b = Tensor::zeros((3, 2));
        assert!(matches!(a.add(&b), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(a.sub(&b), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(a.mul(&b), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_elementwise_values() {
        let a = t(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = t(&[&[5.0, 6.0], &[7.0, 8.0]]);
        assert_eq!(a.add(&b).unwrap().to_vec(), vec![6.0, 8.0, 10.0, 12.0]);
        assert_eq!(b.sub(&a).unwrap().to_vec(), vec![4.0, 4.0, 4.0, 4.0]);
        assert_eq!(a.mul(&b).unwrap().to_vec(), vec![5.0, 12.0, 21.0, 32.0]);
        assert_eq!((&a * 2.0).to_vec(), vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!((0.5 * &a).to_vec(), vec![0.5, 1.0, 1.5, 2.0]);
        assert_eq!((-&a).to_vec(), vec![-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn test_div_scalar() {
        let a = t(&[&[2.0, 4.0]]);
        assert_eq!(a.div_scalar(2.0).unwrap().to_vec(), vec![1.0, 2.0]);
        assert!(matches!(a.div_scalar(0.0), Err(Error::DivideByZero)));
    }

    #[test]
    fn test_matmul() {
        let a = t(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = t(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), Shape::new(2, 2));
        assert_eq!(c.to_vec(), vec![22.0, 28.0, 49.0, 64.0]);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let a = Tensor::zeros((2, 3));
        let b = Tensor::zeros((4, 5));
        assert!(matches!(
            a.matmul(&b),
            Err(Error::DimensionMismatch {
                m: 2,
                k1: 3,
                k2: 4,
                n: 5
            })
        ));
    }

    #[test]
    fn test_transpose() {
        let a = t(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let at = a.transpose();
        assert_eq!(at.shape(), Shape::new(3, 2));
        assert_eq!(at.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(at.transpose(), a);
    }

    #[test]
    fn test_sum_axes() {
        let a = t(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let total = a.sum(-1).unwrap();
        assert_eq!(total.shape(), Shape::new(1, 1));
        assert_eq!(total.to_vec(), vec![21.0]);

        let cols = a.sum(0).unwrap();
        assert_eq!(cols.shape(), Shape::new(1, 3));
        assert_eq!(cols.to_vec(), vec![5.0, 7.0, 9.0]);

        let rows = a.sum(1).unwrap();
        assert_eq!(rows.shape(), Shape::new(2, 1));
        assert_eq!(rows.to_vec(), vec![6.0, 15.0]);

        assert!(matches!(a.sum(2), Err(Error::InvalidAxis { axis: 2 })));
        assert!(matches!(a.sum(-2), Err(Error::InvalidAxis { axis: -2 })));
    }

    #[test]
    fn test_activations_leave_receiver_untouched() {
        let a = t(&[&[-1.0, 0.0, 2.0]]);
        let before = a.clone();
        assert_eq!(a.relu().to_vec(), vec![0.0, 0.0, 2.0]);
        assert!((a.sigmoid().get(0, 1).unwrap() - 0.5).abs() < 1e-7);
        assert!((a.tanh().get(0, 2).unwrap() - 2.0f32.tanh()).abs() < 1e-7);
        assert_eq!(a, before);
    }

    #[test]
    fn test_axpy() {
        let mut p = t(&[&[1.0, 1.0]]);
        let g = t(&[&[2.0, -4.0]]);
        p.axpy(-0.5, &g).unwrap();
        assert_eq!(p.to_vec(), vec![0.0, 3.0]);
        assert!(p.axpy(1.0, &Tensor::zeros((2, 1))).is_err());
    }

    #[test]
    fn test_argmax() {
        let a = t(&[&[0.1], &[0.7], &[0.7], &[0.2]]);
        assert_eq!(a.argmax(), Some(1));
        assert_eq!(Tensor::default().argmax(), None);
    }

    #[test]
    fn test_reshape() {
        let a = t(&[&[1.0, 2.0, 3.0, 4.0]]);
        let b = a.reshape((2, 2)).unwrap();
        assert_eq!(b.get(1, 1).unwrap(), 4.0);
        assert!(a.reshape((3, 1)).is_err());
    }

    #[test]
    fn test_display() {
        let a = t(&[&[1.0, 2.0], &[3.0, 4.5]]);
        assert_eq!(format!("{}", a), "[[1, 2], [3, 4.5]]");
    }
}
