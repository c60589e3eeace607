use std::fs;
use std::path::{Path, PathBuf};

use attack_core::errors::ErrorInfo;
use attack_core::AttackError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::AttackConfig;
use crate::corpus::write_atomic;
use crate::perturb::SwapScope;

/// Structured manifest describing a completed attack run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Configuration used for the run, with the effective seed filled in.
    pub config: AttackConfig,
    /// Alignment positions that took part in the permutation.
    pub scope: SwapScope,
    /// Master seed from which per-record substreams were derived.
    pub master_seed: u64,
    /// SHA-256 of the training corpus.
    pub train_sha256: String,
    /// SHA-256 of the heldout corpus.
    pub heldout_sha256: String,
    /// Records parsed from the heldout corpus.
    pub records_loaded: usize,
    /// Records removed by the degenerate-input filter.
    pub records_dropped: usize,
    /// Records present in every emitted corpus.
    pub records_written: usize,
    /// Number of lookup tables extracted.
    pub tables: usize,
    /// Corpora written by the run, in emission order.
    pub outputs: Vec<PathBuf>,
}

impl RunManifest {
    /// Writes the manifest to a JSON file through a temporary file.
    pub fn write(&self, path: &Path) -> Result<(), AttackError> {
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            AttackError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        write_atomic(path, json.as_bytes(), "manifest")
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, AttackError> {
        let contents =
            fs::read_to_string(path).map_err(|err| AttackError::io("manifest-read", path, err))?;
        serde_json::from_str(&contents).map_err(|err| {
            AttackError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Hex SHA-256 digest of the file at `path`.
pub fn file_sha256(path: &Path) -> Result<String, AttackError> {
    let bytes = fs::read(path).map_err(|err| AttackError::io("hash-read", path, err))?;
    Ok(format!("{:x}", Sha256::digest(bytes)))
}
