use rand::Rng;

use super::{NetDraft, ParamInit, ParamSite};

/// An initializer that always generates the same bias and the same weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstInit {
    bias: f64,
    weight: f64,
}

impl ConstInit {
    /// Creates a new `ConstInit`.
    ///
    /// # Arguments
    /// * `bias` - The value every bias starts with.
    /// * `weight` - The value every weight starts with.
    pub fn new(bias: f64, weight: f64) -> Self {
        Self { bias, weight }
    }
}

impl<R: Rng> ParamInit<R> for ConstInit {
    fn sample(&mut self, _rng: &mut R, site: ParamSite, _draft: &NetDraft<'_>) -> f64 {
        match site {
            ParamSite::NodeBias { .. } => self.bias,
            ParamSite::Weight { .. } => self.weight,
        }
    }
}
