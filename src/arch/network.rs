use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::activations::ActFn;
use crate::{NetErr, Result};

/// The `(layer, node)` index of a node inside a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodePos {
    pub layer: usize,
    pub node: usize,
}

impl NodePos {
    pub fn new(layer: usize, node: usize) -> Self {
        Self { layer, node }
    }
}

/// The error metrics of the batch that produced a network generation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub rms_error: f64,
    pub avg_error: f64,
}

/// A dense layer of nodes.
///
/// Weights are stored as a `(nodes, prev_nodes)` matrix, row `n` holds the input weights of
/// node `n` and column `k` always denotes the link from previous-layer node `k`. The input
/// layer has a `(nodes, 0)` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub(crate) values: Array1<f64>,
    pub(crate) pre_activations: Array1<f64>,
    pub(crate) biases: Array1<f64>,
    pub(crate) weights: Array2<f64>,
}

impl Layer {
    /// Creates a layer from its parameters, with every activation zeroed.
    ///
    /// # Arguments
    /// * `biases` - One bias per node.
    /// * `weights` - A `(nodes, prev_nodes)` matrix.
    ///
    /// # Returns
    /// The layer, or an error if the bias and weight rows disagree on the node count.
    pub fn new(biases: Array1<f64>, weights: Array2<f64>) -> Result<Self> {
        if biases.len() != weights.nrows() {
            return Err(NetErr::InvalidTopology(format!(
                "layer has {} biases but {} weight rows",
                biases.len(),
                weights.nrows()
            )));
        }

        let n = biases.len();
        Ok(Self {
            values: Array1::zeros(n),
            pre_activations: Array1::zeros(n),
            biases,
            weights,
        })
    }

    /// Returns the amount of nodes in this layer.
    pub fn len(&self) -> usize {
        self.biases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biases.is_empty()
    }

    /// Returns the amount of input weights each node of this layer has.
    pub fn fan_in(&self) -> usize {
        self.weights.ncols()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn pre_activations(&self) -> ArrayView1<'_, f64> {
        self.pre_activations.view()
    }

    pub fn biases(&self) -> ArrayView1<'_, f64> {
        self.biases.view()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Gives a view over node `n` of this layer.
    pub fn node(&self, n: usize) -> Option<NodeView<'_>> {
        if n >= self.len() {
            return None;
        }

        Some(NodeView {
            value: self.values[n],
            value_before_activation: self.pre_activations[n],
            bias: self.biases[n],
            input_weights: self.weights.row(n),
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'_>> + '_ {
        (0..self.len()).filter_map(|n| self.node(n))
    }
}

/// A read-only view of a single node.
#[derive(Debug, Clone)]
pub struct NodeView<'a> {
    pub value: f64,
    pub value_before_activation: f64,
    pub bias: f64,
    pub input_weights: ArrayView1<'a, f64>,
}

/// A dense feed-forward network. Layer 0 is the input layer.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    pub(crate) layer_sizes: Vec<usize>,
    pub(crate) activation: ActFn,
    pub(crate) training_metadata: Option<TrainingMetadata>,
}

impl Network {
    /// Assembles a network from already built layers.
    ///
    /// # Arguments
    /// * `layers` - The layers, input layer first.
    /// * `activation` - The activation strategy shared by every node.
    ///
    /// # Returns
    /// The network or an error if the layers break an invariant.
    pub fn from_layers(layers: Vec<Layer>, activation: ActFn) -> Result<Self> {
        let layer_sizes = layers.iter().map(Layer::len).collect();
        let net = Self {
            layers,
            layer_sizes,
            activation,
            training_metadata: None,
        };

        net.validate()?;
        Ok(net)
    }

    /// Checks the structural invariants: no layer is empty, the input layer has no weights,
    /// every other node has exactly one weight per node of the previous layer and the declared
    /// sizes match the realized layers.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NetErr::InvalidTopology("network has no layers".into()));
        }

        if self.layer_sizes.len() != self.layers.len() {
            return Err(NetErr::InvalidTopology(format!(
                "{} layer sizes declared for {} layers",
                self.layer_sizes.len(),
                self.layers.len()
            )));
        }

        for (l, (layer, &size)) in self.layers.iter().zip(&self.layer_sizes).enumerate() {
            if size == 0 {
                return Err(NetErr::InvalidTopology(format!("layer {l} has no nodes")));
            }

            if layer.len() != size {
                return Err(NetErr::InvalidTopology(format!(
                    "layer {l} has {} nodes, expected {size}",
                    layer.len()
                )));
            }

            let expected = if l == 0 { 0 } else { self.layer_sizes[l - 1] };
            if layer.fan_in() != expected {
                return Err(NetErr::InvalidTopology(format!(
                    "nodes of layer {l} have {} input weights, expected {expected}",
                    layer.fan_in()
                )));
            }

            if layer.values.len() != size || layer.pre_activations.len() != size {
                return Err(NetErr::InvalidTopology(format!(
                    "activation buffers of layer {l} do not hold {size} nodes"
                )));
            }
        }

        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, l: usize) -> Option<&Layer> {
        self.layers.get(l)
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn node(&self, pos: NodePos) -> Option<NodeView<'_>> {
        self.layers.get(pos.layer)?.node(pos.node)
    }

    pub fn activation(&self) -> &ActFn {
        &self.activation
    }

    pub fn training_metadata(&self) -> Option<TrainingMetadata> {
        self.training_metadata
    }

    /// Returns the width of the input layer.
    pub fn input_len(&self) -> usize {
        self.layer_sizes[0]
    }

    /// Returns the width of the output layer.
    pub fn output_len(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Returns the activations of the output layer of the last evaluation.
    pub fn output(&self) -> Vec<f64> {
        self.layers[self.layers.len() - 1].values.to_vec()
    }

    /// Returns the total amount of biases and weights.
    pub fn size(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.biases.len() + layer.weights.len())
            .sum()
    }
}
