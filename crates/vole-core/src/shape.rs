use std::fmt;

// Shape — rows × cols of a dense matrix
//
// Every tensor in vole is two-dimensional. Column vectors are (n, 1), row
// vectors are (1, n), and a scalar result is (1, 1).
//
// Storage is row-major, so element (r, c) lives at r * cols + c.

/// Shape of a 2-D tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Shape { rows, cols }
    }

    /// The dimension sizes as `[rows, cols]`.
    pub fn dims(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Total number of elements.
    pub fn elem_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major linear index of (row, col). No bounds check.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Whether (row, col) lies inside this shape.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// The shape with rows and cols swapped.
    pub fn transposed(&self) -> Shape {
        Shape::new(self.cols, self.rows)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.rows, self.cols)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Shape::new(rows, cols)
    }
}

impl From<[usize; 2]> for Shape {
    fn from([rows, cols]: [usize; 2]) -> Self {
        Shape::new(rows, cols)
    }
}
