#![deny(missing_docs)]

//! Adversarial heldout generation for iterated lookup-table tasks.
//!
//! The pipeline loads lookup tables from the head of a training corpus,
//! drops degenerate heldout records, permutes each alignment by an exact
//! edit distance and, when the input position stays fixed, replays the
//! lookup chain so the outputs agree with the new alignments.

/// Pipeline orchestration and output naming.
pub mod assemble;
/// Run configuration schema and defaults.
pub mod config;
/// Tab-separated corpus parsing and atomic writing.
pub mod corpus;
/// Character-level edit distance over token slices.
pub mod distance;
/// Removal of records with a constant interior input.
pub mod filter;
/// Run manifest serialization helpers.
pub mod manifest;
/// Exact-distance alignment permutation.
pub mod perturb;
/// Output regeneration through chained table lookups.
pub mod replay;
/// Lookup table extraction from a training corpus.
pub mod tables;

pub use assemble::{run, OutputPaths, RunPaths, RunSummary};
pub use config::AttackConfig;
pub use corpus::{load_corpus, parse_corpus, render_corpus, write_corpus};
pub use distance::{edit_distance, slice_distance};
pub use filter::{filter_degenerate, is_degenerate};
pub use manifest::RunManifest;
pub use perturb::{perturb_alignment, perturb_dataset, swap_slice, PerturbOptions, SwapScope};
pub use replay::{replay_dataset, replay_output};
pub use tables::{load_tables, parse_tables, LookupTables, TABLE_PREFIX_LINES};
