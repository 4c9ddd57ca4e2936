//! Dense feed-forward reference strategy.
//!
//! A [`FeedForwardStrategy`] is a stack of fully connected layers: `tanh` on
//! hidden layers, identity on the output layer. Its outputs are raw catalog
//! weights; [`codec::decode_output`](crate::codec::decode_output) does the
//! normalization.
//!
//! Networks are plain data: they serialize to JSON and can be created with
//! seeded random weights for reproducible tournaments. How networks are bred
//! or mutated is left to the caller.
//!
//! ```
//! use columns_evaluator::{
//!     catalog::STANDARD_LEN, codec::INPUT_LEN, network::FeedForwardStrategy,
//!     strategy::Strategy,
//! };
//!
//! let network = FeedForwardStrategy::seeded(&[INPUT_LEN, 32, STANDARD_LEN], 7);
//! let output = network.activate(&[0.0; INPUT_LEN]).unwrap();
//! assert_eq!(output.len(), STANDARD_LEN);
//! ```

use std::iter;

use rand::{Rng, SeedableRng as _};
use rand_distr::{Distribution as _, StandardNormal};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::strategy::{Strategy, StrategyError};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("network has no layers")]
    NoLayers,
    #[display("layer {layer} has no inputs or no outputs")]
    EmptyLayer { layer: usize },
    #[display("layer {layer} has {actual} weights, expected {expected}")]
    WeightCount {
        layer: usize,
        expected: usize,
        actual: usize,
    },
    #[display("layer {layer} has {actual} biases, expected {expected}")]
    BiasCount {
        layer: usize,
        expected: usize,
        actual: usize,
    },
    #[display("layer {layer} takes {inputs} inputs but the previous layer has {previous} outputs")]
    Disconnected {
        layer: usize,
        inputs: usize,
        previous: usize,
    },
}

/// One fully connected layer. `weights` is row-major: one row of `inputs`
/// weights per output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    inputs: usize,
    outputs: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl DenseLayer {
    #[must_use]
    pub fn new(inputs: usize, outputs: usize, weights: Vec<f32>, biases: Vec<f32>) -> Self {
        Self {
            inputs,
            outputs,
            weights,
            biases,
        }
    }

    /// Weights drawn from `N(0, 1/inputs)`, zero biases.
    pub fn random<R>(rng: &mut R, inputs: usize, outputs: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(inputs > 0 && outputs > 0, "layer dimensions must be positive");
        #[expect(clippy::cast_precision_loss)]
        let scale = (inputs as f32).sqrt().recip();
        let weights = iter::repeat_with(|| {
            let w: f32 = StandardNormal.sample(rng);
            w * scale
        })
        .take(inputs * outputs)
        .collect();
        Self::new(inputs, outputs, weights, vec![0.0; outputs])
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    fn check(&self, layer: usize) -> Result<(), NetworkError> {
        if self.inputs == 0 || self.outputs == 0 {
            return Err(NetworkError::EmptyLayer { layer });
        }
        let expected = self.inputs * self.outputs;
        if self.weights.len() != expected {
            return Err(NetworkError::WeightCount {
                layer,
                expected,
                actual: self.weights.len(),
            });
        }
        if self.biases.len() != self.outputs {
            return Err(NetworkError::BiasCount {
                layer,
                expected: self.outputs,
                actual: self.biases.len(),
            });
        }
        Ok(())
    }

    fn forward(&self, input: &[f32], activation: fn(f32) -> f32) -> Vec<f32> {
        self.weights
            .chunks_exact(self.inputs)
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum = iter::zip(row, input).map(|(w, x)| w * x).sum::<f32>();
                activation(sum + bias)
            })
            .collect()
    }
}

/// A validated stack of dense layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct FeedForwardStrategy {
    layers: Vec<DenseLayer>,
}

#[derive(Deserialize)]
struct RawNetwork {
    layers: Vec<DenseLayer>,
}

impl TryFrom<RawNetwork> for FeedForwardStrategy {
    type Error = NetworkError;

    fn try_from(raw: RawNetwork) -> Result<Self, Self::Error> {
        Self::new(raw.layers)
    }
}

impl FeedForwardStrategy {
    /// Checks that every layer is well formed and feeds the next one.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::NoLayers);
        }
        for (i, layer) in layers.iter().enumerate() {
            layer.check(i)?;
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[1].inputs != pair[0].outputs {
                return Err(NetworkError::Disconnected {
                    layer: i + 1,
                    inputs: pair[1].inputs,
                    previous: pair[0].outputs,
                });
            }
        }
        Ok(Self { layers })
    }

    /// Creates a network with the given layer sizes (input size first).
    ///
    /// # Panics
    ///
    /// Panics if fewer than two sizes are given or any size is zero.
    pub fn random<R>(rng: &mut R, sizes: &[usize]) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(sizes.len() >= 2, "a network needs input and output sizes");
        let layers = sizes
            .windows(2)
            .map(|pair| DenseLayer::random(rng, pair[0], pair[1]))
            .collect();
        Self { layers }
    }

    /// Like [`Self::random`], with a deterministic generator.
    #[must_use]
    pub fn seeded(sizes: &[usize], seed: u64) -> Self {
        Self::random(&mut Pcg32::seed_from_u64(seed), sizes)
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.layers[0].inputs
    }

    #[must_use]
    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].outputs
    }

    #[must_use]
    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }
}

impl Strategy for FeedForwardStrategy {
    fn activate(&self, input: &[f32]) -> Result<Vec<f32>, StrategyError> {
        if input.len() != self.input_len() {
            return Err(StrategyError::InputLength {
                expected: self.input_len(),
                actual: input.len(),
            });
        }
        let last = self.layers.len() - 1;
        let mut values = input.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            let activation: fn(f32) -> f32 = if i == last { identity } else { f32::tanh };
            values = layer.forward(&values, activation);
        }
        Ok(values)
    }
}

fn identity(x: f32) -> f32 {
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> FeedForwardStrategy {
        // 2 -> 2 (tanh) -> 1 (linear)
        FeedForwardStrategy::new(vec![
            DenseLayer::new(2, 2, vec![1.0, 0.0, 0.0, 1.0], vec![0.0, 0.0]),
            DenseLayer::new(2, 1, vec![1.0, -1.0], vec![0.5]),
        ])
        .unwrap()
    }

    #[test]
    fn test_forward_pass() {
        let output = tiny().activate(&[1.0, 0.0]).unwrap();
        assert_eq!(output.len(), 1);
        assert!((output[0] - (1.0_f32.tanh() + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_input_length_checked() {
        assert_eq!(
            tiny().activate(&[1.0]),
            Err(StrategyError::InputLength {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_shape_validation() {
        assert_eq!(FeedForwardStrategy::new(vec![]), Err(NetworkError::NoLayers));
        assert!(matches!(
            FeedForwardStrategy::new(vec![DenseLayer::new(2, 2, vec![0.0; 3], vec![0.0; 2])]),
            Err(NetworkError::WeightCount { layer: 0, .. })
        ));
        assert!(matches!(
            FeedForwardStrategy::new(vec![
                DenseLayer::new(2, 3, vec![0.0; 6], vec![0.0; 3]),
                DenseLayer::new(2, 1, vec![0.0; 2], vec![0.0]),
            ]),
            Err(NetworkError::Disconnected { layer: 1, .. })
        ));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = FeedForwardStrategy::seeded(&[4, 3, 5], 42);
        let b = FeedForwardStrategy::seeded(&[4, 3, 5], 42);
        let c = FeedForwardStrategy::seeded(&[4, 3, 5], 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.input_len(), 4);
        assert_eq!(a.output_len(), 5);
    }

    #[test]
    fn test_json_validates_on_load() {
        let network = FeedForwardStrategy::seeded(&[3, 2], 1);
        let json = serde_json::to_string(&network).unwrap();
        let back: FeedForwardStrategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, network);

        let broken = r#"{"layers":[{"inputs":3,"outputs":2,"weights":[0.0],"biases":[0.0,0.0]}]}"#;
        assert!(serde_json::from_str::<FeedForwardStrategy>(broken).is_err());
    }

    #[test]
    fn test_zero_width_layer_rejected() {
        assert_eq!(
            FeedForwardStrategy::new(vec![
                DenseLayer::new(3, 0, vec![], vec![]),
                DenseLayer::new(0, 2, vec![], vec![0.0; 2]),
            ]),
            Err(NetworkError::EmptyLayer { layer: 0 })
        );

        let hollow = r#"{"layers":[
            {"inputs":3,"outputs":0,"weights":[],"biases":[]},
            {"inputs":0,"outputs":2,"weights":[],"biases":[0.0,0.0]}
        ]}"#;
        assert!(serde_json::from_str::<FeedForwardStrategy>(hollow).is_err());
    }
}
