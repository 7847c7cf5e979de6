// Preprocessing — per-tensor scaling and label encoding
//
//   normalize(t)     — min-max to [0, 1]; a constant tensor uses range 1
//   standardize(t)   — (x - mean) / std with the population std; std 0 → 1
//   one_hot(c, n)    — n×1 column with a 1 at row c
//
// The *_dataset variants apply the per-tensor function to every sample
// independently, in parallel with rayon. Statistics are computed per
// sample, not across the dataset.

use rayon::prelude::*;

use vole_core::bail;
use vole_core::error::Result;
use vole_core::tensor::Tensor;

/// Min-max scale every element to [0, 1].
pub fn normalize(t: &Tensor) -> Tensor {
    let data = t.as_slice();
    if data.is_empty() {
        return t.clone();
    }
    let (min, max) = data
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    t.map(|x| (x - min) / range)
}

/// Shift to zero mean and scale to unit (population) standard deviation.
pub fn standardize(t: &Tensor) -> Tensor {
    if t.is_empty() {
        return t.clone();
    }
    let mean = t.mean_all();
    let var = t.map(|x| (x - mean) * (x - mean)).mean_all();
    let std = if var.sqrt() == 0.0 { 1.0 } else { var.sqrt() };
    t.map(|x| (x - mean) / std)
}

pub fn normalize_dataset(samples: &[Tensor]) -> Vec<Tensor> {
    samples.par_iter().map(normalize).collect()
}

pub fn standardize_dataset(samples: &[Tensor]) -> Vec<Tensor> {
    samples.par_iter().map(standardize).collect()
}

/// One-hot encode `class` as a `num_classes × 1` column vector.
pub fn one_hot(class: usize, num_classes: usize) -> Result<Tensor> {
    if class >= num_classes {
        bail!("one_hot: class {class} out of range for {num_classes} classes");
    }
    let mut t = Tensor::zeros((num_classes, 1));
    t.set(class, 0, 1.0)?;
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        let t = Tensor::from_rows(&[[2.0, 4.0], [6.0, 10.0]]).unwrap();
        let n = normalize(&t);
        assert_eq!(n.as_slice(), &[0.0, 0.25, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_constant() {
        let t = Tensor::full((2, 2), 3.0);
        assert_eq!(normalize(&t).as_slice(), &[0.0; 4]);
    }

    #[test]
    fn test_standardize_moments() {
        let t = Tensor::column(&[1.0, 2.0, 3.0, 4.0]);
        let s = standardize(&t);
        assert!(s.mean_all().abs() < 1e-6);
        let var = s.map(|x| x * x).mean_all();
        assert!((var - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_standardize_constant() {
        let t = Tensor::full((1, 3), 5.0);
        assert_eq!(standardize(&t).as_slice(), &[0.0; 3]);
    }

    #[test]
    fn test_one_hot() {
        let t = one_hot(2, 4).unwrap();
        assert_eq!(t.as_slice(), &[0.0, 0.0, 1.0, 0.0]);
        assert!(one_hot(4, 4).is_err());
    }
}
