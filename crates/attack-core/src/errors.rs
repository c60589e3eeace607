//! Structured error types shared across the attack crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`AttackError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (line numbers, paths, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for attack generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum AttackError {
    /// Structural problems in a training or heldout corpus.
    #[error("corpus error: {0}")]
    Corpus(ErrorInfo),
    /// Missing tables or keys during lookups.
    #[error("table error: {0}")]
    Table(ErrorInfo),
    /// Alignment perturbation could not reach the requested distortion.
    #[error("perturbation error: {0}")]
    Perturbation(ErrorInfo),
    /// Invalid run configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl AttackError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            AttackError::Corpus(info)
            | AttackError::Table(info)
            | AttackError::Perturbation(info)
            | AttackError::Config(info)
            | AttackError::Io(info)
            | AttackError::Serde(info) => info,
        }
    }

    /// Adds a context entry to the payload, keeping the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            AttackError::Corpus(info) => AttackError::Corpus(info.with_context(key, value)),
            AttackError::Table(info) => AttackError::Table(info.with_context(key, value)),
            AttackError::Perturbation(info) => {
                AttackError::Perturbation(info.with_context(key, value))
            }
            AttackError::Config(info) => AttackError::Config(info.with_context(key, value)),
            AttackError::Io(info) => AttackError::Io(info.with_context(key, value)),
            AttackError::Serde(info) => AttackError::Serde(info.with_context(key, value)),
        }
    }

    /// Wraps an I/O failure on `path` under the given code.
    pub fn io(code: &str, path: &Path, err: std::io::Error) -> Self {
        AttackError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
