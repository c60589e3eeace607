use std::fs;
use std::path::Path;

use attack_core::errors::ErrorInfo;
use attack_core::AttackError;
use serde::{Deserialize, Serialize};

use crate::tables::TABLE_PREFIX_LINES;

/// Default cap on perturbation attempts per record.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// YAML-configurable parameters governing an attack run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackConfig {
    /// Include the source (input) position in the permutation.
    #[serde(default)]
    pub swap_input: bool,
    /// Strip the terminal marker from alignments before perturbing.
    #[serde(default)]
    pub ignore_output_eos: bool,
    /// Distortion level: number of transpositions per alignment.
    #[serde(default = "default_level")]
    pub level: usize,
    /// Master seed; drawn from OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Perturbation attempts per record before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Leading training lines that hold the table mappings.
    #[serde(default = "default_table_prefix_lines")]
    pub table_prefix_lines: usize,
}

fn default_level() -> usize {
    1
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_table_prefix_lines() -> usize {
    TABLE_PREFIX_LINES
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            swap_input: false,
            ignore_output_eos: false,
            level: default_level(),
            seed: None,
            max_attempts: default_max_attempts(),
            table_prefix_lines: default_table_prefix_lines(),
        }
    }
}

impl AttackConfig {
    /// Loads a configuration from a YAML file; missing keys take defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, AttackError> {
        let contents =
            fs::read_to_string(path).map_err(|err| AttackError::io("config-read", path, err))?;
        serde_yaml::from_str(&contents).map_err(|err| {
            AttackError::Serde(
                ErrorInfo::new("config-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Checks the numeric settings.
    pub fn validate(&self) -> Result<(), AttackError> {
        let checks = [
            ("level", self.level),
            ("max_attempts", self.max_attempts),
            ("table_prefix_lines", self.table_prefix_lines),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(AttackError::Config(
                    ErrorInfo::new("non-positive-setting", format!("{name} must be at least 1"))
                        .with_context(name, value.to_string()),
                ));
            }
        }
        Ok(())
    }
}
