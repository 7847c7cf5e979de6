// Network — an ordered stack of layers
//
// The network owns its layers as Box<dyn Layer>. A layer's slot index
// (returned by add_layer) is its identity for optimizer state, so layers are
// only ever appended; they are never removed or reordered.
//
// TRAINING STEP:
//
//   output = layer_n(… layer_1(input))          forward, each layer caches
//   loss   = L(output, target)
//   grad   = dL/doutput
//   grad   = layer_i.backward(grad)             for i = n … 1
//   optimizer.step(layers)

use vole_core::error::Result;
use vole_core::tensor::Tensor;
use vole_nn::{Layer, Loss};
use vole_optim::Optimizer;

/// Position of a layer in its network.
pub type LayerId = usize;

/// A feed-forward network: layers applied in insertion order.
#[derive(Default)]
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer and return its slot.
    pub fn add_layer<L: Layer + 'static>(&mut self, layer: L) -> LayerId {
        self.layers.push(Box::new(layer));
        self.layers.len() - 1
    }

    /// Append a layer, builder style.
    pub fn with_layer<L: Layer + 'static>(mut self, layer: L) -> Self {
        self.add_layer(layer);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Mutable access to the layers. The slice cannot grow or shrink, so
    /// slot ids stay valid.
    pub fn layers_mut(&mut self) -> &mut [Box<dyn Layer>] {
        &mut self.layers
    }

    /// Forward pass that caches activations for a following backward pass.
    pub fn forward(&mut self, input: &Tensor) -> Result<Tensor> {
        let mut x = input.clone();
        for layer in self.layers.iter_mut() {
            x = layer.forward(&x)?;
        }
        Ok(x)
    }

    /// Forward pass without caching. Leaves the network untouched.
    pub fn predict(&self, input: &Tensor) -> Result<Tensor> {
        let mut x = input.clone();
        for layer in &self.layers {
            x = layer.infer(&x)?;
        }
        Ok(x)
    }

    /// Propagate `grad` (dLoss/dOutput) back through every layer, last first.
    ///
    /// Returns dLoss/dInput.
    pub fn backward(&mut self, grad: &Tensor) -> Result<Tensor> {
        let mut g = grad.clone();
        for layer in self.layers.iter_mut().rev() {
            g = layer.backward(&g)?;
        }
        Ok(g)
    }

    /// One full training step on a single example.
    ///
    /// Returns the loss measured before the parameters were updated.
    pub fn train(
        &mut self,
        input: &Tensor,
        target: &Tensor,
        loss: &dyn Loss,
        optimizer: &mut dyn Optimizer,
    ) -> Result<f32> {
        let output = self.forward(input)?;
        let value = loss.compute_loss(&output, target)?;
        let grad = loss.compute_gradient(&output, target)?;
        self.backward(&grad)?;
        optimizer.step(&mut self.layers)?;
        Ok(value)
    }

    /// Loss on one example without backward or parameter updates.
    pub fn evaluate(&self, input: &Tensor, target: &Tensor, loss: &dyn Loss) -> Result<f32> {
        let output = self.predict(input)?;
        loss.compute_loss(&output, target)
    }

    /// Total number of scalar parameters across all layers.
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.num_parameters()).sum()
    }

    /// Every parameter as ("<slot>.<layer>.<name>", tensor).
    pub fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        self.layers
            .iter()
            .enumerate()
            .flat_map(|(id, layer)| {
                let kind = layer.name();
                layer
                    .named_parameters()
                    .into_iter()
                    .map(move |(name, t)| (format!("{id}.{kind}.{name}"), t))
            })
            .collect()
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|l| l.name()))
            .finish()
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Network ({} layers)", self.layers.len())?;
        for (id, layer) in self.layers.iter().enumerate() {
            writeln!(
                f,
                "  [{id}] {} ({} params)",
                layer.name(),
                layer.num_parameters()
            )?;
        }
        write!(f, "  total params: {}", self.num_parameters())
    }
}
