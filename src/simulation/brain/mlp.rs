//! Single dense layer with tanh activation.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with random weights and biases.
    pub fn new_random(input_size: usize, output_size: usize, scale: f32) -> Self {
        Self {
            weights: Array2::random((output_size, input_size), Uniform::new(-scale, scale)),
            biases: Array1::random(output_size, Uniform::new(-scale, scale)),
        }
    }

    /// Performs forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Adds uniform noise in `[-scale, scale]` to a `rate` fraction of the parameters.
    pub fn mutate(&mut self, rate: f32, scale: f32) {
        if rate <= 0.0 || scale <= 0.0 {
            return;
        }
        let mut rng = rand::rng();
        let mut perturb = |value: f32| {
            if rng.random::<f32>() < rate {
                value + rng.random_range(-scale..scale)
            } else {
                value
            }
        };
        self.weights.mapv_inplace(&mut perturb);
        self.biases.mapv_inplace(&mut perturb);
    }

    /// Creates a new layer by weighted averaging two parent layers.
    pub fn crossover_weighted(parent1: &Mlp, parent2: &Mlp, weight1: f32) -> Self {
        let weight2 = 1.0 - weight1;
        Self {
            weights: &parent1.weights * weight1 + &parent2.weights * weight2,
            biases: &parent1.biases * weight1 + &parent2.biases * weight2,
        }
    }
}
