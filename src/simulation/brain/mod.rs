//! Neural network that steers a car.
//!
//! A fixed-topology multi-layer perceptron whose weights are evolved with
//! crossover and mutation.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub mod mlp;

pub use mlp::Mlp;

/// Feed-forward network used as the "brain" that drives a car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
}

impl Brain {
    /// Creates a new brain with random weights.
    ///
    /// `layer_sizes` lists the width of every layer, input first, and must
    /// contain at least two entries.
    pub fn new(layer_sizes: &[usize], scale: f32) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Mlp::new_random(pair[0], pair[1], scale))
            .collect();

        Self { layers }
    }

    /// Runs a forward pass through the brain.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Creates a new brain by weighted averaging two parent brains.
    ///
    /// `weight1` is the share of `parent1`; `parent2` contributes the rest.
    pub fn crossover_weighted(parent1: &Brain, parent2: &Brain, weight1: f32) -> Self {
        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| Mlp::crossover_weighted(layer1, layer2, weight1))
            .collect();

        Self { layers }
    }

    /// Perturbs each parameter with probability `rate` by up to `scale`.
    pub fn mutate(&mut self, rate: f32, scale: f32) {
        for layer in &mut self.layers {
            layer.mutate(rate, scale);
        }
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.weights.len() + layer.biases.len())
            .sum()
    }

    /// Number of inputs the brain expects.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.weights.ncols())
    }

    /// Number of outputs the brain produces.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.weights.nrows())
    }
}
