use std::path::{Path, PathBuf};

use attack_core::{AttackError, Dataset};
use tracing::info;

use crate::config::AttackConfig;
use crate::corpus::{load_corpus, write_corpus};
use crate::filter::filter_degenerate;
use crate::manifest::{file_sha256, RunManifest};
use crate::perturb::{perturb_dataset, PerturbOptions};
use crate::replay::replay_dataset;
use crate::tables::load_tables;

/// Input and output locations for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// Training corpus whose head encodes the lookup tables.
    pub train: PathBuf,
    /// Heldout corpus to attack.
    pub heldout: PathBuf,
    /// Directory receiving the derived corpora.
    pub output_dir: PathBuf,
}

/// Files derived from the heldout file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Original records with the terminal marker stripped.
    pub no_eos: PathBuf,
    /// Perturbed alignments, original outputs.
    pub attacks: PathBuf,
    /// Perturbed alignments with replayed outputs.
    pub attacks_outputs: PathBuf,
    /// Run manifest.
    pub manifest: PathBuf,
}

impl OutputPaths {
    /// Names the outputs after the heldout file stem (up to its first `.`).
    pub fn for_heldout(heldout: &Path, output_dir: &Path) -> Self {
        let name = heldout
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = match name.split('.').next() {
            Some(stem) if !stem.is_empty() => stem.to_owned(),
            _ => "heldout".to_owned(),
        };
        Self {
            no_eos: output_dir.join(format!("{stem}_no_eos.tsv")),
            attacks: output_dir.join(format!("{stem}_attacks.tsv")),
            attacks_outputs: output_dir.join(format!("{stem}_attacks_outputs.tsv")),
            manifest: output_dir.join(format!("{stem}_attacks_manifest.json")),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Seed the per-record substreams were derived from.
    pub master_seed: u64,
    /// Records parsed from the heldout corpus.
    pub records_loaded: usize,
    /// Records removed by the filter.
    pub records_dropped: usize,
    /// Corpora written, in emission order.
    pub outputs: Vec<PathBuf>,
    /// Location of the run manifest.
    pub manifest: PathBuf,
}

/// Removes the trailing terminal marker from every alignment.
pub fn strip_eos(dataset: &mut Dataset) {
    for record in dataset.iter_mut() {
        record.alignment.pop();
    }
}

/// Runs the full pipeline and writes the derived corpora.
///
/// Every stage is computed in memory before its file is written, so a fatal
/// error leaves no partial corpus for that stage.
pub fn run(config: &AttackConfig, paths: &RunPaths) -> Result<RunSummary, AttackError> {
    config.validate()?;
    let master_seed = config.seed.unwrap_or_else(rand::random);
    info!(
        seed = master_seed,
        level = config.level,
        swap_input = config.swap_input,
        ignore_output_eos = config.ignore_output_eos,
        "starting attack run"
    );

    let tables = load_tables(&paths.train, config.table_prefix_lines)?;
    info!(tables = tables.len(), path = %paths.train.display(), "loaded lookup tables");

    let dataset = load_corpus(&paths.heldout)?;
    let records_loaded = dataset.len();
    let (mut dataset, records_dropped) = filter_degenerate(dataset);
    info!(
        loaded = records_loaded,
        dropped = records_dropped,
        "filtered records with a constant interior input"
    );

    let targets = OutputPaths::for_heldout(&paths.heldout, &paths.output_dir);
    let mut outputs = Vec::new();

    if config.ignore_output_eos {
        strip_eos(&mut dataset);
        write_corpus(&targets.no_eos, &dataset)?;
        info!(path = %targets.no_eos.display(), "wrote eos-free heldout");
        outputs.push(targets.no_eos.clone());
    }

    let options = PerturbOptions::from_config(config);
    perturb_dataset(&mut dataset, &options, master_seed)?;
    write_corpus(&targets.attacks, &dataset)?;
    info!(path = %targets.attacks.display(), records = dataset.len(), "wrote perturbed alignments");
    outputs.push(targets.attacks.clone());

    // Outputs cannot be replayed once the source position has moved.
    if !config.swap_input {
        replay_dataset(&mut dataset, &tables)?;
        write_corpus(&targets.attacks_outputs, &dataset)?;
        info!(path = %targets.attacks_outputs.display(), "wrote replayed outputs");
        outputs.push(targets.attacks_outputs.clone());
    }

    let manifest = RunManifest {
        config: AttackConfig {
            seed: Some(master_seed),
            ..config.clone()
        },
        scope: options.scope,
        master_seed,
        train_sha256: file_sha256(&paths.train)?,
        heldout_sha256: file_sha256(&paths.heldout)?,
        records_loaded,
        records_dropped,
        records_written: dataset.len(),
        tables: tables.len(),
        outputs: outputs.clone(),
    };
    manifest.write(&targets.manifest)?;

    Ok(RunSummary {
        master_seed,
        records_loaded,
        records_dropped,
        outputs,
        manifest: targets.manifest,
    })
}
