mod model;
mod run;
mod training;

pub use model::ModelConfig;
pub use run::{DatasetConfig, RunConfig};
pub use training::{BatchOrder, TrainingConfig};
