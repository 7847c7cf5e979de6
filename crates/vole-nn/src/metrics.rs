// Metrics — classification helpers on network outputs
//
// Samples are columns: a (num_classes, batch) output holds one score vector
// per column, and the predicted class of a column is the row of its largest
// score.

use vole_core::bail;
use vole_core::error::Result;
use vole_core::tensor::Tensor;

/// Predicted class (row of the maximum) for every column of `output`.
///
/// Ties resolve to the lowest row. A tensor with no rows yields class 0 for
/// every column.
pub fn argmax_classes(output: &Tensor) -> Vec<usize> {
    let (rows, cols) = (output.rows(), output.cols());
    let data = output.as_slice();
    (0..cols)
        .map(|c| {
            let mut best = 0;
            for r in 1..rows {
                if data[r * cols + c] > data[best * cols + c] {
                    best = r;
                }
            }
            best
        })
        .collect()
}

/// Fraction of positions where `predicted` equals `actual`.
///
/// Both slices must have the same length; two empty slices give 0.0.
pub fn accuracy(predicted: &[usize], actual: &[usize]) -> Result<f32> {
    if predicted.len() != actual.len() {
        bail!(
            "accuracy: {} predictions but {} labels",
            predicted.len(),
            actual.len()
        );
    }
    let n = predicted.len();
    if n == 0 {
        return Ok(0.0);
    }
    let correct = predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| p == a)
        .count();
    Ok(correct as f32 / n as f32)
}
