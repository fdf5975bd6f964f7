use serde::{Deserialize, Serialize};

use crate::{NetErr, Result};

/// How the samples of each batch are picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOrder {
    /// Contiguous windows that wrap around the end of the dataset.
    #[default]
    Sequential,
    /// Samples drawn uniformly with replacement.
    Random,
}

/// The parameters of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    #[serde(default)]
    pub batch_order: BatchOrder,
    /// Insert a checkpoint entry every this many steps.
    #[serde(default)]
    pub save_every_n: Option<usize>,
    /// Stop as soon as a step's average rms error is at or below this value.
    #[serde(default)]
    pub until_rms_error: Option<f64>,
    /// Upper bound on the amount of steps, 0 for unbounded.
    #[serde(default)]
    pub max_iterations: usize,
    #[serde(default)]
    pub seed: Option<String>,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0. {
            return Err(NetErr::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }

        if self.batch_size == 0 {
            return Err(NetErr::InvalidConfig("batch_size must be at least 1".into()));
        }

        if self.save_every_n == Some(0) {
            return Err(NetErr::InvalidConfig("save_every_n must be at least 1".into()));
        }

        match self.until_rms_error {
            Some(target) if !target.is_finite() || target < 0. => {
                return Err(NetErr::InvalidConfig(format!(
                    "until_rms_error must be a non-negative number, got {target}"
                )));
            }
            None if self.max_iterations == 0 => {
                return Err(NetErr::InvalidConfig(
                    "either max_iterations or until_rms_error is required".into(),
                ));
            }
            _ => {}
        }

        Ok(())
    }
}
