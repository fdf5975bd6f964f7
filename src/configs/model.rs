use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    arch::{ActFnConfig, Network},
    init::{build_network, InitFn},
    NetErr, Result,
};

/// The shape of the network and how it is initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub layer_sizes: Vec<usize>,
    pub activation: ActFnConfig,
    #[serde(default)]
    pub init_function: InitFn,
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.is_empty() {
            return Err(NetErr::InvalidConfig(
                "model must have at least one layer".into(),
            ));
        }

        if let Some(l) = self.layer_sizes.iter().position(|&size| size == 0) {
            return Err(NetErr::InvalidConfig(format!("layer {l} has no nodes")));
        }

        Ok(())
    }

    /// Builds a freshly initialized network with this configuration.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;

        let mut init = self.init_function;
        build_network(&self.layer_sizes, self.activation.into(), &mut init, rng)
    }

    pub fn input_len(&self) -> usize {
        self.layer_sizes.first().copied().unwrap_or_default()
    }

    pub fn output_len(&self) -> usize {
        self.layer_sizes.last().copied().unwrap_or_default()
    }
}
