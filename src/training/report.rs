use crate::arch::{Network, TrainingMetadata};

/// The metrics of a single training step, measured on the network the step started from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    pub rms_error: f64,
    pub avg_error: f64,
    /// Fraction of the batch whose largest output sits where the largest target value does.
    pub accuracy: f64,
}

impl StepMetrics {
    /// Returns the error part, as stored in the network's training metadata.
    pub fn error(&self) -> TrainingMetadata {
        TrainingMetadata {
            rms_error: self.rms_error,
            avg_error: self.avg_error,
        }
    }
}

/// The outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// The last network generation.
    pub network: Network,
    /// The metrics of every step, in order.
    pub history: Vec<StepMetrics>,
    pub iterations: usize,
    /// Whether the run stopped because the error target was reached.
    pub stopped_early: bool,
}

impl TrainingReport {
    /// Returns the metrics of the last step, if any step was taken.
    pub fn last(&self) -> Option<StepMetrics> {
        self.history.last().copied()
    }
}

/// Returns the position of the first largest value, `None` if there is none.
pub(crate) fn arg_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, &v) in values.iter().enumerate() {
        if !v.is_nan() && best.is_none_or(|(_, max)| v > max) {
            best = Some((i, v));
        }
    }

    best.map(|(i, _)| i)
}
