// MLP XOR Example — Training a Multi-Layer Perceptron from scratch
//
// XOR is the classic problem that demonstrates why we NEED hidden layers.
// A single linear layer cannot learn XOR because it's not linearly separable.
// A 2-layer MLP with a nonlinear activation CAN learn it.
//
// Architecture: Input(2) → Linear(2,4) → Tanh → Linear(4,1) → Sigmoid
//
// Usage:
//   cargo run -p mlp_xor            # XOR
//   cargo run -p mlp_xor -- and     # AND / OR truth tables work too
//   RUST_LOG=debug cargo run -p mlp_xor
//
// Training progress is reported through `tracing`; the final truth table is
// printed to stdout.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use vole::data::logic_gate_dataset;
use vole::prelude::*;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    Registry::default().with(filter).with(fmt_layer).init();
}

fn main() -> vole::Result<()> {
    init_tracing();

    let gate: LogicGate = match std::env::args().nth(1) {
        Some(name) => name.parse()?,
        None => LogicGate::Xor,
    };
    let dataset = logic_gate_dataset(gate);

    // 1. Build the network
    let mut net = Network::new()
        .with_layer(Linear::with_seed(2, 4, 42)?)
        .with_layer(Tanh::new())
        .with_layer(Linear::with_seed(4, 1, 43)?)
        .with_layer(Sigmoid::new());
    info!(%gate, params = net.num_parameters(), "network ready");
    println!("{net}");
    println!();

    // 2. Train. Four samples are too few to hold any out for validation.
    let config = TrainingConfig::default()
        .epochs(1000)
        .batch_size(4)
        .validation_split(0.0)
        .log_every(100)
        .seed(7);
    let mut optimizer = Adam::new(0.1);
    let result = Trainer::new(config).train(&mut net, &dataset, &MseLoss, &mut optimizer)?;
    info!(final_loss = result.final_loss, "training finished");

    // 3. Show what it learned
    println!("{gate} truth table:");
    let mut correct = 0;
    for (x, y) in dataset.iter() {
        let p = net.predict(x)?.get(0, 0)?;
        let expected = y.get(0, 0)?;
        let predicted = if p > 0.5 { 1.0 } else { 0.0 };
        if predicted == expected {
            correct += 1;
        }
        println!(
            "  ({}, {}) → {:.4}  (expected {})",
            x.get(0, 0)?,
            x.get(1, 0)?,
            p,
            expected
        );
    }
    println!("Accuracy: {correct}/{}", dataset.len());
    Ok(())
}
