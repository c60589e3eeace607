#![deny(missing_docs)]

//! Core data types shared by the lookup-table attack crates.
//!
//! A [`Record`] is one symbolic example: an input sequence whose interior
//! tokens name lookup tables, an output sequence produced by chaining those
//! lookups, and an alignment mapping each output step to an input position.

pub mod errors;
pub mod record;
pub mod rng;

pub use errors::{AttackError, ErrorInfo};
pub use record::{Dataset, Record};
pub use rng::{derive_substream_seed, RngHandle};
