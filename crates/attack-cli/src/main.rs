use std::error::Error;
use std::path::PathBuf;

use attack_core::AttackError;
use attack_gen::{run, AttackConfig, RunPaths};
use clap::Parser;
use tracing::info;

mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "attack-gen",
    about = "Permute heldout alignments and replay lookup outputs to build adversarial sets"
)]
struct Cli {
    /// Training data to extract the atomic lookup tables from.
    #[arg(long)]
    train: PathBuf,
    /// Heldout data to be adapted by attacks.
    #[arg(long)]
    heldout: PathBuf,
    /// Directory receiving the derived corpora.
    #[arg(long = "output-dir", alias = "output_dir", default_value = ".")]
    output_dir: PathBuf,
    /// Tracing filter directive, e.g. `info` or `attack_gen=debug`.
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
    /// Include the input position in the swapping.
    #[arg(long = "swap-input", alias = "swap_input")]
    swap_input: bool,
    /// Drop the terminal marker from alignments before perturbing them.
    #[arg(long = "ignore-output-eos", alias = "ignore_output_eos")]
    ignore_output_eos: bool,
    /// Number of swaps per alignment (defaults to 1).
    #[arg(long)]
    level: Option<usize>,
    /// Master seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
    /// Perturbation attempts per record before the level is deemed infeasible.
    #[arg(long = "max-attempts")]
    max_attempts: Option<usize>,
    /// YAML file with default settings; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn attack_config(&self) -> Result<AttackConfig, AttackError> {
        let mut config = match &self.config {
            Some(path) => AttackConfig::from_yaml_file(path)?,
            None => AttackConfig::default(),
        };
        config.swap_input |= self.swap_input;
        config.ignore_output_eos |= self.ignore_output_eos;
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        Ok(config)
    }

    fn run_paths(&self) -> RunPaths {
        RunPaths {
            train: self.train.clone(),
            heldout: self.heldout.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);
    info!(?cli, "parsed arguments");

    let config = cli.attack_config()?;
    let summary = run(&config, &cli.run_paths())?;
    info!(
        seed = summary.master_seed,
        loaded = summary.records_loaded,
        dropped = summary.records_dropped,
        manifest = %summary.manifest.display(),
        "attack run finished"
    );
    Ok(())
}
