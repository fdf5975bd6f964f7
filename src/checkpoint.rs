use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::info;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{
    arch::{ActFn, Layer, Network, TrainingMetadata},
    NetErr, Result,
};

/// A single node as stored in a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub value: f64,
    #[serde(default)]
    pub value_before_activation: f64,
    pub bias: f64,
    #[serde(default)]
    pub input_weights: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub nodes: Vec<NodeRecord>,
}

/// One network generation as stored in a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub layers: Vec<LayerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_metadata: Option<TrainingMetadata>,
}

impl Network {
    /// Captures the parameters, activations and metadata of this network.
    pub fn snapshot(&self) -> Snapshot {
        let layers = self
            .layers()
            .iter()
            .map(|layer| LayerRecord {
                nodes: layer
                    .nodes()
                    .map(|node| NodeRecord {
                        value: node.value,
                        value_before_activation: node.value_before_activation,
                        bias: node.bias,
                        input_weights: node.input_weights.to_vec(),
                    })
                    .collect(),
            })
            .collect();

        Snapshot {
            layers,
            training_metadata: self.training_metadata(),
        }
    }

    /// Rebuilds a network from a snapshot. The layer sizes are taken from the stored layers.
    ///
    /// # Arguments
    /// * `snapshot` - The stored generation.
    /// * `activation` - The activation strategy, which checkpoints do not store.
    ///
    /// # Returns
    /// The network, or an error if the stored layers break an invariant.
    pub fn from_snapshot(snapshot: &Snapshot, activation: ActFn) -> Result<Self> {
        let mut layers = Vec::with_capacity(snapshot.layers.len());

        for (l, record) in snapshot.layers.iter().enumerate() {
            let nodes = record.nodes.len();
            let fan_in = record.nodes.first().map_or(0, |n| n.input_weights.len());

            if let Some(n) = record
                .nodes
                .iter()
                .position(|node| node.input_weights.len() != fan_in)
            {
                return Err(NetErr::InvalidTopology(format!(
                    "node {n} of layer {l} has {} input weights, expected {fan_in}",
                    record.nodes[n].input_weights.len()
                )));
            }

            let biases = Array1::from_iter(record.nodes.iter().map(|n| n.bias));
            let flat = record
                .nodes
                .iter()
                .flat_map(|n| n.input_weights.iter().copied())
                .collect();
            let weights = Array2::from_shape_vec((nodes, fan_in), flat)
                .map_err(|e| NetErr::InvalidTopology(format!("layer {l}: {e}")))?;

            let mut layer = Layer::new(biases, weights)?;
            layer.values = Array1::from_iter(record.nodes.iter().map(|n| n.value));
            layer.pre_activations =
                Array1::from_iter(record.nodes.iter().map(|n| n.value_before_activation));
            layers.push(layer);
        }

        let mut net = Network::from_layers(layers, activation)?;
        net.training_metadata = snapshot.training_metadata;
        Ok(net)
    }
}

/// A set of named network generations, stored as one JSON object mapping the iteration name
/// to its snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checkpoint {
    iterations: BTreeMap<String, Snapshot>,
}

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, net: &Network) {
        self.iterations.insert(name.into(), net.snapshot());
    }

    pub fn get(&self, name: &str) -> Option<&Snapshot> {
        self.iterations.get(name)
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iterations.keys().map(String::as_str)
    }

    /// Returns the snapshot with the greatest numeric iteration name.
    pub fn latest(&self) -> Option<(u64, &Snapshot)> {
        self.iterations
            .iter()
            .filter_map(|(name, snap)| Some((name.parse::<u64>().ok()?, snap)))
            .max_by_key(|(i, _)| *i)
    }

    /// Reads a checkpoint from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Writes the checkpoint to a JSON file, replacing any previous content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;

        info!("saved {} iteration(s) to {}", self.len(), path.display());
        Ok(())
    }
}
