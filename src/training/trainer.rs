use log::{debug, info};
use rand::{rngs::StdRng, Rng};

use super::{report::arg_max, StepMetrics, TrainingReport};
use crate::{
    arch::Network,
    checkpoint::Checkpoint,
    configs::{BatchOrder, TrainingConfig},
    dataset::{Dataset, Sample},
    gradient::inspect_batch_gradient,
    init::derived_rng,
    optimization::{GradientStep, Optimizer},
    NetErr, Result,
};

/// Drives the step loop: pick a batch, average its gradient, take a step.
pub struct Trainer<O: Optimizer = GradientStep> {
    network: Network,
    optimizer: O,

    batch_size: usize,
    batch_order: BatchOrder,
    save_every_n: Option<usize>,
    until_rms_error: Option<f64>,
    max_iterations: usize,

    cursor: usize,
    rng: StdRng,
}

impl Trainer {
    /// Returns a new `Trainer` taking plain gradient steps.
    ///
    /// # Arguments
    /// * `network` - The untrained network.
    /// * `config` - The training parameters.
    ///
    /// # Returns
    /// The trainer, or an error if `config` is invalid.
    pub fn new(network: Network, config: &TrainingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            network,
            optimizer: GradientStep::new(config.learning_rate),
            batch_size: config.batch_size,
            batch_order: config.batch_order,
            save_every_n: config.save_every_n,
            until_rms_error: config.until_rms_error,
            max_iterations: config.max_iterations,
            cursor: 0,
            rng: derived_rng(config.seed.as_deref(), "batches"),
        })
    }
}

impl<O: Optimizer> Trainer<O> {
    /// Replaces the optimizer used for every step.
    pub fn with_optimizer<P: Optimizer>(self, optimizer: P) -> Trainer<P> {
        Trainer {
            network: self.network,
            optimizer,
            batch_size: self.batch_size,
            batch_order: self.batch_order,
            save_every_n: self.save_every_n,
            until_rms_error: self.until_rms_error,
            max_iterations: self.max_iterations,
            cursor: self.cursor,
            rng: self.rng,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Trains the network until one of the configured bounds is hit.
    ///
    /// When a checkpoint is given the untrained network is stored as iteration `0`, then every
    /// `save_every_n` steps and the final step are stored under their iteration number.
    ///
    /// # Arguments
    /// * `dataset` - The training pairs.
    /// * `checkpoint` - Where network generations are recorded, if anywhere.
    ///
    /// # Returns
    /// The trained network and the metrics of every step, or the first error hit.
    pub fn run<D>(
        mut self,
        dataset: &mut D,
        mut checkpoint: Option<&mut Checkpoint>,
    ) -> Result<TrainingReport>
    where
        D: Dataset + ?Sized,
    {
        if dataset.is_empty() {
            return Err(NetErr::EmptyBatch);
        }

        if let Some(ckpt) = checkpoint.as_deref_mut() {
            ckpt.insert("0", &self.network);
        }

        info!(
            "training {:?} on {} samples, batches of {}",
            self.network.layer_sizes(),
            dataset.len(),
            self.batch_size
        );

        let mut history = Vec::new();
        let mut iteration = 0;
        let mut stopped_early = false;

        while self.max_iterations == 0 || iteration < self.max_iterations {
            let batch = self.next_batch(dataset)?;

            let mut hits = 0;
            let (grad, rms, avg) =
                inspect_batch_gradient(&self.network, &batch, |realized, target| {
                    let chosen = arg_max(&realized.output());
                    if chosen.is_some() && chosen == arg_max(target) {
                        hits += 1;
                    }
                })?;
            self.network = self.optimizer.step(&self.network, &grad)?;

            iteration += 1;
            let accuracy = hits as f64 / batch.len() as f64;
            history.push(StepMetrics {
                rms_error: rms,
                avg_error: avg,
                accuracy,
            });
            debug!(
                iteration = iteration,
                rms = rms,
                avg = avg,
                accuracy = accuracy;
                "training step"
            );

            stopped_early = self.until_rms_error.is_some_and(|target| rms <= target);
            let last = stopped_early || iteration == self.max_iterations;

            if let Some(ckpt) = checkpoint.as_deref_mut() {
                if last || self.save_every_n.is_some_and(|n| iteration % n == 0) {
                    ckpt.insert(iteration.to_string(), &self.network);
                }
            }

            if stopped_early {
                info!("rms error {rms} reached the target after {iteration} step(s)");
                break;
            }
        }

        info!("finished training after {iteration} step(s)");

        Ok(TrainingReport {
            network: self.network,
            history,
            iterations: iteration,
            stopped_early,
        })
    }

    fn next_batch<D: Dataset + ?Sized>(&mut self, dataset: &mut D) -> Result<Vec<Sample>> {
        self.batch_indices(dataset.len())
            .into_iter()
            .map(|i| dataset.sample(i))
            .collect()
    }

    fn batch_indices(&mut self, len: usize) -> Vec<usize> {
        match self.batch_order {
            BatchOrder::Sequential => {
                let start = self.cursor;
                self.cursor = (start + self.batch_size) % len;
                (start..start + self.batch_size).map(|i| i % len).collect()
            }
            BatchOrder::Random => (0..self.batch_size)
                .map(|_| self.rng.random_range(0..len))
                .collect(),
        }
    }
}
