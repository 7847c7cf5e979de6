// Tests for vole-data: TensorDataset, DataLoader, preprocessing, logic gates

use rand::rngs::StdRng;
use rand::SeedableRng;

use vole_core::{Result, Tensor};
use vole_data::{
    logic_gate_dataset, normalize_dataset, standardize_dataset, DataLoader, DataLoaderConfig,
    LogicGate, TensorDataset,
};

// Simple in-memory dataset for testing

fn toy_dataset(n: usize) -> TensorDataset {
    let inputs = (0..n)
        .map(|i| {
            let x = i as f32;
            Tensor::column(&[x, x * 2.0])
        })
        .collect();
    let targets = (0..n).map(|i| Tensor::column(&[(i % 3) as f32])).collect();
    TensorDataset::new(inputs, targets).unwrap()
}

fn first_feature(t: &Tensor) -> usize {
    t.as_slice()[0] as usize
}

// DataLoader tests

#[test]
fn test_ten_samples_batch_three() -> Result<()> {
    let ds = toy_dataset(10);
    let mut loader = DataLoader::new(&ds, DataLoaderConfig::default().batch_size(3))?;
    assert_eq!(loader.num_batches(), 4);

    let mut sizes = Vec::new();
    while loader.has_next() {
        sizes.push(loader.next_batch()?.len());
    }
    assert_eq!(sizes, vec![3, 3, 3, 1]);
    Ok(())
}

#[test]
fn test_drop_last() -> Result<()> {
    let ds = toy_dataset(10);
    let config = DataLoaderConfig::default().batch_size(3).drop_last(true);
    let loader = DataLoader::new(&ds, config)?;
    assert_eq!(loader.num_batches(), 3);
    let sizes: Vec<usize> = loader.map(|b| b.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3]);
    Ok(())
}

#[test]
fn test_sequential_order_without_shuffle() -> Result<()> {
    let ds = toy_dataset(5);
    let loader = DataLoader::new(&ds, DataLoaderConfig::default().batch_size(2))?;
    let seen: Vec<usize> = loader
        .flat_map(|b| b.inputs.into_iter().map(|t| first_feature(&t)).collect::<Vec<_>>())
        .collect();
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    Ok(())
}

#[test]
fn test_shuffle_covers_every_sample() -> Result<()> {
    let ds = toy_dataset(20);
    let config = DataLoaderConfig::default()
        .batch_size(6)
        .shuffle(true)
        .seed(42);
    let mut loader = DataLoader::new(&ds, config)?;

    let mut seen = Vec::new();
    while loader.has_next() {
        for (x, y) in loader.next_batch()?.iter() {
            // Inputs and targets stay paired.
            assert_eq!(first_feature(x) % 3, y.as_slice()[0] as usize);
            seen.push(first_feature(x));
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..20).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_seeded_shuffle_reproducible() -> Result<()> {
    let ds = toy_dataset(16);
    let config = DataLoaderConfig::default().shuffle(true).seed(3);
    let a = DataLoader::new(&ds, config.clone())?;
    let b = DataLoader::new(&ds, config)?;
    assert_eq!(a.order(), b.order());
    Ok(())
}

#[test]
fn test_reset_starts_new_epoch() -> Result<()> {
    let ds = toy_dataset(4);
    let mut loader = DataLoader::new(&ds, DataLoaderConfig::default().batch_size(4))?;
    let first = loader.next_batch()?;
    assert!(loader.next_batch().is_err());
    loader.reset();
    let again = loader.next_batch()?;
    assert_eq!(first, again);
    Ok(())
}

#[test]
fn test_empty_dataset() -> Result<()> {
    let ds = TensorDataset::default();
    let mut loader = DataLoader::new(&ds, DataLoaderConfig::default())?;
    assert!(loader.is_empty());
    assert_eq!(loader.num_batches(), 0);
    assert!(!loader.has_next());
    assert!(loader.next().is_none());
    Ok(())
}

// Split tests

#[test]
fn test_split_is_seeded() -> Result<()> {
    let ds = toy_dataset(10);
    let (train_a, val_a) = ds.split(0.2, &mut StdRng::seed_from_u64(9))?;
    let (train_b, val_b) = ds.split(0.2, &mut StdRng::seed_from_u64(9))?;
    assert_eq!(train_a, train_b);
    assert_eq!(val_a, val_b);
    assert_eq!(val_a.len(), 2);
    Ok(())
}

#[test]
fn test_split_small_dataset_has_no_validation() -> Result<()> {
    // floor(4 * 0.2) = 0
    let ds = logic_gate_dataset(LogicGate::Xor);
    let (train, val) = ds.split(0.2, &mut StdRng::seed_from_u64(0))?;
    assert_eq!(train.len(), 4);
    assert!(val.is_empty());
    Ok(())
}

// Preprocessing tests

#[test]
fn test_dataset_preprocessing_is_per_sample() {
    let samples = vec![
        Tensor::column(&[0.0, 5.0, 10.0]),
        Tensor::column(&[100.0, 200.0]),
    ];
    let normalized = normalize_dataset(&samples);
    assert_eq!(normalized[0].as_slice(), &[0.0, 0.5, 1.0]);
    assert_eq!(normalized[1].as_slice(), &[0.0, 1.0]);

    let standardized = standardize_dataset(&samples);
    assert_eq!(standardized.len(), 2);
    assert!((standardized[1].as_slice()[0] + 1.0).abs() < 1e-6);
    assert!((standardized[1].as_slice()[1] - 1.0).abs() < 1e-6);
}

#[test]
fn test_logic_gate_batches_stack() -> Result<()> {
    let ds = logic_gate_dataset(LogicGate::Or);
    let mut loader = DataLoader::new(&ds, DataLoaderConfig::default().batch_size(4))?;
    let (x, y) = loader.next_batch()?.stack_columns()?;
    assert_eq!(x.shape().dims(), [2, 4]);
    assert_eq!(y.as_slice(), &[0.0, 1.0, 1.0, 1.0]);
    Ok(())
}
