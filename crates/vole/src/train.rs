// Trainer — epoch loop over a dataset
//
// For each run:
//   1. Split the dataset into train / validation (shuffled, validation gets
//      floor(n * validation_split) samples)
//   2. For each epoch:
//      a. Walk the training set in batches via DataLoader
//      b. Network::train on every sample of the batch
//      c. batch loss = mean of the sample losses
//      d. epoch loss = mean of the batch losses
//      e. Every `log_every` epochs: validation loss + tracing event
//
// Parameters are updated after every sample; batching only groups losses
// for reporting.

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use tracing::{debug, info};

use vole_core::bail;
use vole_core::error::{Error, Result};
use vole_data::{DataLoader, DataLoaderConfig, TensorDataset};
use vole_nn::Loss;
use vole_optim::Optimizer;

use crate::network::Network;

// Configuration

/// Settings for [`Trainer`].
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Number of passes over the training set.
    pub epochs: usize,
    /// Samples per batch.
    pub batch_size: usize,
    /// Overrides the optimizer's learning rate when set.
    pub learning_rate: Option<f32>,
    /// Emit an `info` event on logged epochs.
    pub verbose: bool,
    /// Fraction of the dataset held out for validation.
    pub validation_split: f32,
    /// Log (and validate) every N epochs, starting at epoch 0. 0 disables.
    pub log_every: usize,
    /// Reshuffle the training set every epoch.
    pub shuffle: bool,
    /// Seed for the split and the shuffling.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 32,
            learning_rate: None,
            verbose: true,
            validation_split: 0.2,
            log_every: 10,
            shuffle: false,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn epochs(mut self, n: usize) -> Self {
        self.epochs = n;
        self
    }

    pub fn batch_size(mut self, bs: usize) -> Self {
        self.batch_size = bs;
        self
    }

    pub fn learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = Some(lr);
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    pub fn validation_split(mut self, f: f32) -> Self {
        self.validation_split = f;
        self
    }

    pub fn log_every(mut self, n: usize) -> Self {
        self.log_every = n;
        self
    }

    pub fn shuffle(mut self, s: bool) -> Self {
        self.shuffle = s;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }
}

// Training result types

/// Summary of a full training run.
#[derive(Debug, Clone, Default)]
pub struct TrainResult {
    /// Per-epoch logs.
    pub epochs: Vec<EpochLog>,
    /// Loss of the last epoch.
    pub final_loss: f32,
}

/// Log for a single training epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochLog {
    /// Epoch number (0-indexed).
    pub epoch: usize,
    /// Mean batch loss over the epoch.
    pub loss: f32,
    /// Validation loss, on logged epochs with a non-empty validation set.
    pub val_loss: Option<f32>,
}

impl std::fmt::Display for TrainResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Training complete: {} epochs", self.epochs.len())?;
        for log in &self.epochs {
            write!(f, "  epoch {}: loss = {:.6}", log.epoch, log.loss)?;
            if let Some(v) = log.val_loss {
                write!(f, ", val loss = {v:.6}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  final loss: {:.6}", self.final_loss)
    }
}

// Trainer

/// Runs the epoch loop for a [`Network`] over a [`TensorDataset`].
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `network` on `dataset` and return the per-epoch losses.
    pub fn train(
        &self,
        network: &mut Network,
        dataset: &TensorDataset,
        loss: &dyn Loss,
        optimizer: &mut dyn Optimizer,
    ) -> Result<TrainResult> {
        let cfg = &self.config;
        if let Some(lr) = cfg.learning_rate {
            optimizer.set_learning_rate(lr);
        }

        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(thread_rng()).map_err(|e| Error::msg(e.to_string()))?,
        };
        let (train_set, val_set) = dataset.split(cfg.validation_split, &mut rng)?;
        if train_set.is_empty() {
            bail!(
                "no training samples: {} samples with validation split {}",
                dataset.len(),
                cfg.validation_split
            );
        }
        debug!(
            train = train_set.len(),
            val = val_set.len(),
            epochs = cfg.epochs,
            batch_size = cfg.batch_size,
            loss = loss.name(),
            "starting training"
        );

        let mut loader_cfg = DataLoaderConfig::default()
            .batch_size(cfg.batch_size)
            .shuffle(cfg.shuffle);
        if cfg.seed.is_some() {
            loader_cfg = loader_cfg.seed(rng.gen());
        }
        let mut loader = DataLoader::new(&train_set, loader_cfg)?;

        let mut epoch_logs = Vec::with_capacity(cfg.epochs);
        for epoch in 0..cfg.epochs {
            if epoch > 0 {
                loader.reset();
            }

            let mut epoch_loss = 0.0;
            let mut n_batches = 0;
            while loader.has_next() {
                let batch = loader.next_batch()?;
                let mut batch_loss = 0.0;
                for (x, y) in batch.iter() {
                    batch_loss += network.train(x, y, loss, optimizer)?;
                }
                epoch_loss += batch_loss / batch.len() as f32;
                n_batches += 1;
            }
            let avg_loss = if n_batches > 0 {
                epoch_loss / n_batches as f32
            } else {
                0.0
            };

            let report = cfg.log_every > 0 && epoch % cfg.log_every == 0;
            let val_loss = if report && !val_set.is_empty() {
                Some(self.validate(network, &val_set, loss)?)
            } else {
                None
            };
            if report && cfg.verbose {
                match val_loss {
                    Some(v) => info!(
                        epoch,
                        epochs = cfg.epochs,
                        loss = avg_loss,
                        val_loss = v,
                        "epoch"
                    ),
                    None => info!(epoch, epochs = cfg.epochs, loss = avg_loss, "epoch"),
                }
            }

            epoch_logs.push(EpochLog {
                epoch,
                loss: avg_loss,
                val_loss,
            });
        }

        let final_loss = epoch_logs.last().map_or(0.0, |l| l.loss);
        Ok(TrainResult {
            epochs: epoch_logs,
            final_loss,
        })
    }

    /// Mean per-sample loss of `network` over `dataset`, without training.
    pub fn validate(
        &self,
        network: &Network,
        dataset: &TensorDataset,
        loss: &dyn Loss,
    ) -> Result<f32> {
        if dataset.is_empty() {
            bail!("cannot validate on an empty dataset");
        }
        let mut total = 0.0;
        for (x, y) in dataset.iter() {
            total += network.evaluate(x, y, loss)?;
        }
        Ok(total / dataset.len() as f32)
    }
}
