use ndarray::{Array1, Array2};

use crate::{
    arch::{Network, TrainingMetadata},
    NetErr, Result,
};

/// The partial derivatives of a single node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGradient {
    /// ∂loss/∂output of this node.
    pub node_pd: f64,
    pub bias_pd: f64,
    /// Aligned with the node's input weights.
    pub weight_pd: Vec<f64>,
}

/// The partial derivatives of a layer, laid out exactly like `Layer`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradient {
    pub(crate) node_pd: Array1<f64>,
    pub(crate) bias_pd: Array1<f64>,
    pub(crate) weight_pd: Array2<f64>,
}

impl LayerGradient {
    /// Creates a zeroed gradient for a layer of `nodes` nodes with `fan_in` weights each.
    pub fn zeros(nodes: usize, fan_in: usize) -> Self {
        Self {
            node_pd: Array1::zeros(nodes),
            bias_pd: Array1::zeros(nodes),
            weight_pd: Array2::zeros((nodes, fan_in)),
        }
    }

    pub fn len(&self) -> usize {
        self.bias_pd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bias_pd.is_empty()
    }

    pub fn node_pd(&self) -> &Array1<f64> {
        &self.node_pd
    }

    pub fn bias_pd(&self) -> &Array1<f64> {
        &self.bias_pd
    }

    pub fn weight_pd(&self) -> &Array2<f64> {
        &self.weight_pd
    }

    pub fn node(&self, n: usize) -> Option<NodeGradient> {
        if n >= self.len() {
            return None;
        }

        Some(NodeGradient {
            node_pd: self.node_pd[n],
            bias_pd: self.bias_pd[n],
            weight_pd: self.weight_pd.row(n).to_vec(),
        })
    }
}

/// The gradient of a whole network, one `LayerGradient` per layer.
///
/// A batch-averaged gradient also carries the error metrics of the batch it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NetGradient {
    pub(crate) layers: Vec<LayerGradient>,
    pub(crate) metrics: Option<TrainingMetadata>,
}

impl NetGradient {
    /// Creates a zeroed gradient with the same topology as `net`.
    pub fn zeros_like(net: &Network) -> Self {
        let layers = net
            .layers()
            .iter()
            .map(|layer| LayerGradient::zeros(layer.len(), layer.fan_in()))
            .collect();

        Self {
            layers,
            metrics: None,
        }
    }

    pub fn layers(&self) -> &[LayerGradient] {
        &self.layers
    }

    pub fn metrics(&self) -> Option<TrainingMetadata> {
        self.metrics
    }

    /// Adds `other` into this gradient, entry by entry.
    ///
    /// # Returns
    /// An error if both gradients do not share the same topology.
    pub fn accumulate(&mut self, other: &NetGradient) -> Result<()> {
        self.check_same_shape(other)?;

        for (acc, g) in self.layers.iter_mut().zip(&other.layers) {
            acc.node_pd += &g.node_pd;
            acc.bias_pd += &g.bias_pd;
            acc.weight_pd += &g.weight_pd;
        }

        Ok(())
    }

    /// Divides every partial derivative by `n`, turning an accumulated sum of `n` gradients
    /// into their average.
    pub fn average_over(&mut self, n: usize) {
        let n = n as f64;
        for layer in &mut self.layers {
            layer.node_pd /= n;
            layer.bias_pd /= n;
            layer.weight_pd /= n;
        }
    }

    fn check_same_shape(&self, other: &NetGradient) -> Result<()> {
        if self.layers.len() != other.layers.len() {
            return Err(NetErr::GradientShape {
                what: "layers",
                layer: 0,
                got: other.layers.len(),
                expected: self.layers.len(),
            });
        }

        for (l, (a, b)) in self.layers.iter().zip(&other.layers).enumerate() {
            check_dims(l, a.weight_pd.dim(), b.weight_pd.dim())?;
        }

        Ok(())
    }

    /// Checks that this gradient is topologically isomorphic to `net`.
    pub fn check_matches(&self, net: &Network) -> Result<()> {
        if self.layers.len() != net.layers().len() {
            return Err(NetErr::GradientShape {
                what: "layers",
                layer: 0,
                got: self.layers.len(),
                expected: net.layers().len(),
            });
        }

        for (l, (g, layer)) in self.layers.iter().zip(net.layers()).enumerate() {
            check_dims(l, layer.weights().dim(), g.weight_pd.dim())?;

            if g.bias_pd.len() != layer.len() || g.node_pd.len() != layer.len() {
                return Err(NetErr::GradientShape {
                    what: "biases",
                    layer: l,
                    got: g.bias_pd.len(),
                    expected: layer.len(),
                });
            }
        }

        Ok(())
    }
}

fn check_dims(layer: usize, expected: (usize, usize), got: (usize, usize)) -> Result<()> {
    if got.0 != expected.0 {
        return Err(NetErr::GradientShape {
            what: "nodes",
            layer,
            got: got.0,
            expected: expected.0,
        });
    }

    if got.1 != expected.1 {
        return Err(NetErr::GradientShape {
            what: "weights",
            layer,
            got: got.1,
            expected: expected.1,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arch::ActFn,
        init::{build_network, seeded_rng, ConstInit},
    };
    use approx::assert_relative_eq;

    fn net(sizes: &[usize]) -> Network {
        build_network(
            sizes,
            ActFn::Identity,
            &mut ConstInit::new(0., 1.),
            &mut seeded_rng(None),
        )
        .unwrap()
    }

    #[test]
    fn zeros_like_mirrors_the_network() {
        let g = NetGradient::zeros_like(&net(&[3, 2, 4]));

        assert_eq!(g.layers().len(), 3);
        assert_eq!(g.layers()[0].weight_pd().dim(), (3, 0));
        assert_eq!(g.layers()[2].weight_pd().dim(), (4, 2));
        assert!(g.check_matches(&net(&[3, 2, 4])).is_ok());
        assert!(g.check_matches(&net(&[3, 3, 4])).is_err());
    }

    #[test]
    fn accumulate_then_average() {
        let n = net(&[1, 2]);
        let mut acc = NetGradient::zeros_like(&n);
        let mut g = NetGradient::zeros_like(&n);
        g.layers[1].bias_pd[0] = 3.;
        g.layers[1].weight_pd[(1, 0)] = -1.;

        acc.accumulate(&g).unwrap();
        acc.accumulate(&g).unwrap();
        acc.accumulate(&NetGradient::zeros_like(&n)).unwrap();
        acc.average_over(3);

        assert_relative_eq!(acc.layers()[1].node(0).unwrap().bias_pd, 2.);
        assert_relative_eq!(acc.layers()[1].node(1).unwrap().weight_pd[0], -2. / 3.);
    }

    #[test]
    fn accumulate_rejects_other_topologies() {
        let mut acc = NetGradient::zeros_like(&net(&[2, 2]));
        let err = acc.accumulate(&NetGradient::zeros_like(&net(&[2, 3]))).unwrap_err();

        assert!(matches!(err, NetErr::GradientShape { what: "nodes", layer: 1, .. }));
    }
}
