// TensorDataset — paired input/target tensors held in memory
//
// Sample i is (inputs[i], targets[i]). Each sample is its own tensor,
// typically a column vector (features × 1), so one sample can be fed
// straight into Network::train.

use rand::seq::SliceRandom;
use rand::Rng;

use vole_core::bail;
use vole_core::error::{Error, Result};
use vole_core::tensor::Tensor;

/// An indexed collection of (input, target) samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TensorDataset {
    inputs: Vec<Tensor>,
    targets: Vec<Tensor>,
}

impl TensorDataset {
    /// Pair up inputs and targets. Both lists must have the same length.
    pub fn new(inputs: Vec<Tensor>, targets: Vec<Tensor>) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(Error::LengthMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }
        Ok(Self { inputs, targets })
    }

    /// Pairs built by this crate whose lengths already agree.
    pub(crate) fn from_pairs(pairs: Vec<(Tensor, Tensor)>) -> Self {
        let (inputs, targets) = pairs.into_iter().unzip();
        Self { inputs, targets }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// The sample at `index`, if any.
    pub fn get(&self, index: usize) -> Option<(&Tensor, &Tensor)> {
        Some((self.inputs.get(index)?, self.targets.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tensor, &Tensor)> + '_ {
        self.inputs.iter().zip(&self.targets)
    }

    pub fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    pub fn targets(&self) -> &[Tensor] {
        &self.targets
    }

    pub fn into_parts(self) -> (Vec<Tensor>, Vec<Tensor>) {
        (self.inputs, self.targets)
    }

    /// A new dataset holding copies of the samples at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        let mut inputs = Vec::with_capacity(indices.len());
        let mut targets = Vec::with_capacity(indices.len());
        for &i in indices {
            let (x, y) = self.get(i).ok_or(Error::FlatIndexOutOfRange {
                index: i,
                len: self.len(),
            })?;
            inputs.push(x.clone());
            targets.push(y.clone());
        }
        Ok(Self { inputs, targets })
    }

    /// Shuffle, then split into (train, validation).
    ///
    /// The validation set gets `floor(len * val_fraction)` samples, the
    /// training set the rest. `val_fraction` must lie in [0, 1].
    pub fn split<R: Rng + ?Sized>(&self, val_fraction: f32, rng: &mut R) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&val_fraction) {
            bail!("validation fraction must be in [0, 1], got {val_fraction}");
        }
        let n = self.len();
        let val_len = (n as f32 * val_fraction).floor() as usize;
        let train_len = n - val_len.min(n);

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);

        let train = self.subset(&indices[..train_len])?;
        let val = self.subset(&indices[train_len..])?;
        Ok((train, val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy(n: usize) -> TensorDataset {
        let inputs = (0..n).map(|i| Tensor::column(&[i as f32])).collect();
        let targets = (0..n).map(|i| Tensor::column(&[(i * 10) as f32])).collect();
        TensorDataset::new(inputs, targets).unwrap()
    }

    #[test]
    fn test_length_mismatch() {
        let r = TensorDataset::new(vec![Tensor::zeros((1, 1))], vec![]);
        assert!(matches!(
            r,
            Err(Error::LengthMismatch {
                inputs: 1,
                targets: 0
            })
        ));
    }

    #[test]
    fn test_subset_keeps_pairs() {
        let ds = toy(5);
        let sub = ds.subset(&[4, 1]).unwrap();
        assert_eq!(sub.len(), 2);
        let (x, y) = sub.get(0).unwrap();
        assert_eq!(x.as_slice(), &[4.0]);
        assert_eq!(y.as_slice(), &[40.0]);
        assert!(ds.subset(&[5]).is_err());
    }

    #[test]
    fn test_split_sizes_and_pairing() {
        let ds = toy(10);
        let mut rng = StdRng::seed_from_u64(7);
        let (train, val) = ds.split(0.25, &mut rng).unwrap();
        // floor(10 * 0.25) = 2
        assert_eq!(val.len(), 2);
        assert_eq!(train.len(), 8);
        for (x, y) in train.iter().chain(val.iter()) {
            assert_eq!(y.as_slice()[0], x.as_slice()[0] * 10.0);
        }
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(toy(3).split(1.5, &mut rng).is_err());
        assert!(toy(3).split(-0.1, &mut rng).is_err());
    }
}
