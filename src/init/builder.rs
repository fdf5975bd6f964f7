use log::trace;
use ndarray::{Array1, Array2};
use rand::Rng;

use super::{NetDraft, ParamInit, ParamSite};
use crate::{
    arch::{ActFn, Layer, Network},
    NetErr, Result,
};

/// Builds a new network, drawing every parameter from `init`.
///
/// Parameters are produced in a single pass: layer by layer, node by node, the node's bias
/// first and then its weights in previous-layer order. `init` sees every fully built layer
/// before the current one.
///
/// # Arguments
/// * `layer_sizes` - The amount of nodes of each layer, input layer first.
/// * `activation` - The activation strategy.
/// * `init` - The parameter initialization strategy.
/// * `rng` - The random number generator handed to `init`.
///
/// # Returns
/// The new network, or an error if `layer_sizes` is empty or has an empty layer.
pub fn build_network<R, I>(
    layer_sizes: &[usize],
    activation: ActFn,
    init: &mut I,
    rng: &mut R,
) -> Result<Network>
where
    R: Rng,
    I: ParamInit<R>,
{
    if layer_sizes.is_empty() {
        return Err(NetErr::InvalidTopology("layer_sizes is empty".into()));
    }

    if let Some(l) = layer_sizes.iter().position(|&size| size == 0) {
        return Err(NetErr::InvalidTopology(format!("layer {l} has no nodes")));
    }

    let mut layers: Vec<Layer> = Vec::with_capacity(layer_sizes.len());

    for (layer, &nodes) in layer_sizes.iter().enumerate() {
        let fan_in = if layer == 0 { 0 } else { layers[layer - 1].len() };
        let mut biases = Array1::zeros(nodes);
        let mut weights = Array2::zeros((nodes, fan_in));

        let draft = NetDraft {
            layer_sizes,
            layers: &layers,
        };

        for node in 0..nodes {
            biases[node] = init.sample(rng, ParamSite::NodeBias { layer, node }, &draft);

            for weight in 0..fan_in {
                let site = ParamSite::Weight {
                    layer,
                    node,
                    weight,
                };
                weights[(node, weight)] = init.sample(rng, site, &draft);
            }
        }

        trace!("initialized layer {layer}: {nodes} nodes, {fan_in} weights each");
        layers.push(Layer::new(biases, weights)?);
    }

    Network::from_layers(layers, activation)
}
