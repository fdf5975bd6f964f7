use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::{ModelConfig, TrainingConfig};
use crate::{
    dataset::{Dataset, LabelledImages, Pairs, Sample},
    NetErr, Result,
};

/// Where the training pairs come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetConfig {
    Inline {
        pairs: Vec<Sample>,
    },
    Idx {
        images: PathBuf,
        labels: PathBuf,
        classes: usize,
    },
}

impl DatasetConfig {
    /// Opens the configured dataset.
    pub fn open(&self) -> Result<Box<dyn Dataset>> {
        match self {
            DatasetConfig::Inline { pairs } => Ok(Box::new(Pairs::new(pairs.clone()))),
            DatasetConfig::Idx {
                images,
                labels,
                classes,
            } => Ok(Box::new(LabelledImages::open(images, labels, *classes)?)),
        }
    }
}

/// Everything a training run needs, as read from a single JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub dataset: DatasetConfig,
    /// Where the checkpoint document is written.
    #[serde(default)]
    pub checkpoint: Option<PathBuf>,
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section, including the widths of inline samples against the model.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.training.validate()?;

        match &self.dataset {
            DatasetConfig::Inline { pairs } => {
                if pairs.is_empty() {
                    return Err(NetErr::InvalidConfig(
                        "dataset must have at least one sample".into(),
                    ));
                }

                let (input_len, output_len) = (self.model.input_len(), self.model.output_len());
                for (i, (x, y)) in pairs.iter().enumerate() {
                    if x.len() != input_len || y.len() != output_len {
                        return Err(NetErr::InvalidConfig(format!(
                            "sample {i} is {}->{} but the model is {input_len}->{output_len}",
                            x.len(),
                            y.len()
                        )));
                    }
                }
            }
            DatasetConfig::Idx { classes, .. } => {
                if *classes != self.model.output_len() {
                    return Err(NetErr::InvalidConfig(format!(
                        "{classes} classes but the output layer has {} nodes",
                        self.model.output_len()
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arch::ActFnConfig, configs::BatchOrder, init::InitFn};

    const TOY: &str = r#"{
        "model": {
            "layer_sizes": [7, 5, 6, 6],
            "activation": "relu",
            "init_function": "uniform_kaiming"
        },
        "training": {
            "learning_rate": 0.01,
            "batch_size": 2,
            "batch_order": "random",
            "save_every_n": 100,
            "until_rms_error": 0.05,
            "max_iterations": 1000,
            "seed": "toy"
        },
        "dataset": {
            "inline": {
                "pairs": [
                    [[1, 0, 0, 0, 0, 0, 0], [1, 0, 0, 0, 0, 0]],
                    [[0, 0, 0, 0, 0, 0, 5], [0, 1, 0, 0, 0, 0]]
                ]
            }
        },
        "checkpoint": "netfile.json"
    }"#;

    #[test]
    fn parses_a_full_run() {
        let config: RunConfig = serde_json::from_str(TOY).unwrap();

        assert_eq!(config.model.activation, ActFnConfig::Relu);
        assert_eq!(config.model.init_function, InitFn::UniformKaiming);
        assert_eq!(config.training.batch_order, BatchOrder::Random);
        assert_eq!(config.training.seed.as_deref(), Some("toy"));
        assert!(config.validate().is_ok());

        let mut dataset = config.dataset.open().unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.sample(1).unwrap().0[6], 5.);
    }

    #[test]
    fn inline_samples_must_fit_the_model() {
        let mut config: RunConfig = serde_json::from_str(TOY).unwrap();
        config.model.layer_sizes = vec![6, 5, 6, 6];

        assert!(matches!(config.validate(), Err(NetErr::InvalidConfig(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, TOY).unwrap();

        assert_eq!(RunConfig::load(&path).unwrap().model.layer_sizes, vec![7, 5, 6, 6]);
    }
}
