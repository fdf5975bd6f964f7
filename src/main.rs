use std::{env, process};

use anyhow::Context;
use log::{info, warn};

use mlp_engine::{
    arch::ActFn,
    checkpoint::Checkpoint,
    configs::RunConfig,
    init::seeded_rng,
    training::Trainer,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <run-config.json>", args[0]);
        process::exit(1);
    }

    let config = RunConfig::load(&args[1])
        .with_context(|| format!("failed to load run configuration from {}", args[1]))?;

    let mut rng = seeded_rng(config.training.seed.as_deref());
    let network = config.model.build(&mut rng).context("failed to build the network")?;
    let mut dataset = config.dataset.open().context("failed to open the dataset")?;
    info!(
        "built a network of {} parameters, activation {:?}",
        network.size(),
        ActFn::from(config.model.activation)
    );

    let mut checkpoint = config.checkpoint.as_ref().map(|_| Checkpoint::new());
    let report = Trainer::new(network, &config.training)?
        .run(dataset.as_mut(), checkpoint.as_mut())
        .context("training failed")?;

    match report.last() {
        Some(last) => info!(
            "{} step(s), rms error {}, avg error {}, accuracy {}",
            report.iterations, last.rms_error, last.avg_error, last.accuracy
        ),
        None => warn!("no training step was taken"),
    }

    if let (Some(path), Some(checkpoint)) = (&config.checkpoint, &checkpoint) {
        checkpoint
            .save(path)
            .with_context(|| format!("failed to write checkpoint to {}", path.display()))?;
    }

    Ok(())
}
