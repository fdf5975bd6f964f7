mod report;
mod trainer;

pub use report::{StepMetrics, TrainingReport};
pub use trainer::Trainer;
