use rand::Rng;

use crate::arch::Layer;

/// The parameter an initializer is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSite {
    NodeBias {
        layer: usize,
        node: usize,
    },
    Weight {
        layer: usize,
        node: usize,
        weight: usize,
    },
}

impl ParamSite {
    pub fn layer(&self) -> usize {
        match *self {
            ParamSite::NodeBias { layer, .. } | ParamSite::Weight { layer, .. } => layer,
        }
    }
}

/// A read-only view of a network while it is being built.
///
/// Only the layers before the one currently being initialized are realized.
#[derive(Debug, Clone, Copy)]
pub struct NetDraft<'a> {
    pub(crate) layer_sizes: &'a [usize],
    pub(crate) layers: &'a [Layer],
}

impl<'a> NetDraft<'a> {
    pub fn layer_sizes(&self) -> &'a [usize] {
        self.layer_sizes
    }

    pub fn realized_layers(&self) -> &'a [Layer] {
        self.layers
    }

    /// Returns the width of the layer feeding `layer`, taken from the realized network when
    /// available. The input layer has a fan-in of 0.
    pub fn fan_in(&self, layer: usize) -> usize {
        if layer == 0 {
            return 0;
        }

        self.layers
            .get(layer - 1)
            .map(Layer::len)
            .unwrap_or(self.layer_sizes[layer - 1])
    }

    /// Returns the declared width of `layer`.
    pub fn fan_out(&self, layer: usize) -> usize {
        self.layer_sizes[layer]
    }
}

/// A strategy for the initial value of every bias and weight.
pub trait ParamInit<R: Rng> {
    /// Should produce the initial value for a single parameter.
    ///
    /// # Arguments
    /// * `rng` - The random number generator threaded through the whole build.
    /// * `site` - The parameter being initialized.
    /// * `draft` - The network built so far.
    fn sample(&mut self, rng: &mut R, site: ParamSite, draft: &NetDraft<'_>) -> f64;
}

impl<R, F> ParamInit<R> for F
where
    R: Rng,
    F: FnMut(&mut R, ParamSite, &NetDraft<'_>) -> f64,
{
    fn sample(&mut self, rng: &mut R, site: ParamSite, draft: &NetDraft<'_>) -> f64 {
        self(rng, site, draft)
    }
}
