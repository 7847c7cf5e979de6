// DataLoader — batching, shuffling, iteration

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};

use vole_core::bail;
use vole_core::error::{Error, Result};
use vole_core::tensor::Tensor;

use crate::dataset::TensorDataset;

/// Configuration for the DataLoader.
#[derive(Debug, Clone)]
pub struct DataLoaderConfig {
    /// Number of samples per batch.
    pub batch_size: usize,
    /// Whether to shuffle indices each epoch.
    pub shuffle: bool,
    /// Whether to drop the last incomplete batch.
    pub drop_last: bool,
    /// Optional random seed for reproducible shuffling.
    pub seed: Option<u64>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            shuffle: false,
            drop_last: false,
            seed: None,
        }
    }
}

impl DataLoaderConfig {
    pub fn batch_size(mut self, bs: usize) -> Self {
        self.batch_size = bs;
        self
    }

    pub fn shuffle(mut self, s: bool) -> Self {
        self.shuffle = s;
        self
    }

    pub fn drop_last(mut self, d: bool) -> Self {
        self.drop_last = d;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }
}

/// One batch of samples, in loader order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub inputs: Vec<Tensor>,
    pub targets: Vec<Tensor>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tensor, &Tensor)> + '_ {
        self.inputs.iter().zip(&self.targets)
    }

    /// Concatenate the samples side by side into one (inputs, targets) pair.
    ///
    /// Column-vector samples of shape (features, 1) become a
    /// (features, batch) matrix, the batched-column layout `Linear` accepts.
    /// All inputs must share a row count, and so must all targets.
    pub fn stack_columns(&self) -> Result<(Tensor, Tensor)> {
        Ok((hstack(&self.inputs)?, hstack(&self.targets)?))
    }
}

fn hstack(parts: &[Tensor]) -> Result<Tensor> {
    let Some(first) = parts.first() else {
        bail!("cannot stack an empty batch");
    };
    let rows = first.rows();
    let mut cols = 0;
    for p in parts {
        if p.rows() != rows {
            return Err(Error::ShapeMismatch {
                expected: (rows, p.cols()).into(),
                got: p.shape(),
            });
        }
        cols += p.cols();
    }

    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for p in parts {
            let c = p.cols();
            data.extend_from_slice(&p.as_slice()[r * c..(r + 1) * c]);
        }
    }
    Tensor::new(data, (rows, cols))
}

/// A DataLoader walks a dataset in batches.
///
/// It is a cursor: `next_batch()` advances it, `reset()` rewinds it for the
/// next epoch and reshuffles when shuffling is enabled. The loader also
/// implements `Iterator<Item = Batch>`.
pub struct DataLoader<'a> {
    dataset: &'a TensorDataset,
    config: DataLoaderConfig,
    indices: Vec<usize>,
    cursor: usize,
    rng: StdRng,
}

impl<'a> DataLoader<'a> {
    /// Create a new DataLoader over a dataset.
    ///
    /// Fails when `batch_size` is zero.
    pub fn new(dataset: &'a TensorDataset, config: DataLoaderConfig) -> Result<Self> {
        if config.batch_size == 0 {
            bail!("DataLoader: batch_size must be at least 1");
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(thread_rng()).map_err(|e| Error::msg(e.to_string()))?,
        };
        let mut loader = Self {
            dataset,
            config,
            indices: (0..dataset.len()).collect(),
            cursor: 0,
            rng,
        };
        loader.reshuffle();
        Ok(loader)
    }

    pub fn config(&self) -> &DataLoaderConfig {
        &self.config
    }

    /// The number of batches per epoch.
    pub fn num_batches(&self) -> usize {
        if self.config.drop_last {
            self.dataset.len() / self.config.batch_size
        } else {
            self.dataset.len().div_ceil(self.config.batch_size)
        }
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Whether another batch is available this epoch.
    pub fn has_next(&self) -> bool {
        let n = self.dataset.len();
        if self.config.drop_last {
            self.cursor + self.config.batch_size <= n
        } else {
            self.cursor < n
        }
    }

    /// Take the next batch. Fails once the epoch is exhausted.
    pub fn next_batch(&mut self) -> Result<Batch> {
        if !self.has_next() {
            bail!("DataLoader: no more batches, call reset() to start a new epoch");
        }
        let end = (self.cursor + self.config.batch_size).min(self.dataset.len());
        let mut batch = Batch {
            inputs: Vec::with_capacity(end - self.cursor),
            targets: Vec::with_capacity(end - self.cursor),
        };
        for &i in &self.indices[self.cursor..end] {
            if let Some((x, y)) = self.dataset.get(i) {
                batch.inputs.push(x.clone());
                batch.targets.push(y.clone());
            }
        }
        self.cursor = end;
        Ok(batch)
    }

    /// Rewind to the first batch, reshuffling when enabled.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.reshuffle();
    }

    /// Visiting order of the dataset for the current epoch.
    pub fn order(&self) -> &[usize] {
        &self.indices
    }

    fn reshuffle(&mut self) {
        if self.config.shuffle {
            self.indices.shuffle(&mut self.rng);
        }
    }
}

impl Iterator for DataLoader<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if !self.has_next() {
            return None;
        }
        self.next_batch().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(n: usize) -> TensorDataset {
        let inputs = (0..n).map(|i| Tensor::column(&[i as f32, -(i as f32)])).collect();
        let targets = (0..n).map(|i| Tensor::column(&[i as f32])).collect();
        TensorDataset::new(inputs, targets).unwrap()
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let ds = toy(3);
        assert!(DataLoader::new(&ds, DataLoaderConfig::default().batch_size(0)).is_err());
    }

    #[test]
    fn test_exhausted_loader_errors() {
        let ds = toy(2);
        let mut loader = DataLoader::new(&ds, DataLoaderConfig::default().batch_size(2)).unwrap();
        assert_eq!(loader.next_batch().unwrap().len(), 2);
        assert!(!loader.has_next());
        assert!(loader.next_batch().is_err());
        loader.reset();
        assert!(loader.has_next());
    }

    #[test]
    fn test_stack_columns() {
        let ds = toy(3);
        let mut loader = DataLoader::new(&ds, DataLoaderConfig::default().batch_size(3)).unwrap();
        let (x, y) = loader.next_batch().unwrap().stack_columns().unwrap();
        assert_eq!(x.shape().dims(), [2, 3]);
        assert_eq!(x.as_slice(), &[0.0, 1.0, 2.0, 0.0, -1.0, -2.0]);
        assert_eq!(y.as_slice(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_stack_columns_empty_and_ragged() {
        assert!(Batch::default().stack_columns().is_err());
        let batch = Batch {
            inputs: vec![Tensor::zeros((2, 1)), Tensor::zeros((3, 1))],
            targets: vec![Tensor::zeros((1, 1)), Tensor::zeros((1, 1))],
        };
        assert!(batch.stack_columns().is_err());
    }
}
