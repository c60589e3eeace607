use std::ops::Range;

use attack_core::errors::ErrorInfo;
use attack_core::{AttackError, Dataset, RngHandle};
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AttackConfig;
use crate::distance::slice_distance;

/// Which alignment positions take part in the permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapScope {
    /// Everything except the first (source) and last positions.
    Interior,
    /// Everything except the trailing terminal marker.
    WithInput,
    /// The whole alignment; used when the terminal marker has been stripped.
    Whole,
}

impl SwapScope {
    /// Picks the scope for the given switches.
    pub fn select(swap_input: bool, ignore_output_eos: bool) -> Self {
        match (swap_input, ignore_output_eos) {
            (false, _) => SwapScope::Interior,
            (true, false) => SwapScope::WithInput,
            (true, true) => SwapScope::Whole,
        }
    }

    /// Working slice of an alignment of length `len`.
    pub fn range(self, len: usize) -> Range<usize> {
        match self {
            SwapScope::Interior => {
                let start = len.min(1);
                start..len.saturating_sub(1).max(start)
            }
            SwapScope::WithInput => 0..len.saturating_sub(1),
            SwapScope::Whole => 0..len,
        }
    }
}

/// Parameters for perturbing a single alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerturbOptions {
    /// Positions eligible for swapping.
    pub scope: SwapScope,
    /// Number of transpositions; accepted results sit at distance `level + 1`.
    pub level: usize,
    /// Attempts before the level is declared infeasible for a slice.
    pub max_attempts: usize,
}

impl PerturbOptions {
    /// Derives the options from a run configuration.
    pub fn from_config(config: &AttackConfig) -> Self {
        Self {
            scope: SwapScope::select(config.swap_input, config.ignore_output_eos),
            level: config.level,
            max_attempts: config.max_attempts,
        }
    }
}

fn infeasible(level: usize, len: usize, attempts: usize) -> AttackError {
    AttackError::Perturbation(
        ErrorInfo::new(
            "infeasible-level",
            "no permutation reached the requested edit distance",
        )
        .with_context("level", level.to_string())
        .with_context("slice_len", len.to_string())
        .with_context("attempts", attempts.to_string())
        .with_hint("lower --level or raise --max-attempts"),
    )
}

/// Permutes `slice` with `level` random transpositions whose combined effect
/// is an edit distance of exactly `level + 1` from the original.
///
/// Each attempt starts again from the untouched slice. Attempts in which swaps
/// cancel or overlap land at a different distance and are rejected.
pub fn swap_slice(
    slice: &[String],
    level: usize,
    max_attempts: usize,
    rng: &mut RngHandle,
) -> Result<Vec<String>, AttackError> {
    let len = slice.len();
    if len < 2 {
        return Err(infeasible(level, len, 0));
    }
    if level >= len {
        warn!(level, slice_len = len, "number of swaps >= the alignment length");
    }

    // Two strings of equal length are never further apart than that length.
    let chars: usize = slice.iter().map(|token| token.chars().count()).sum();
    let target = match level.checked_add(1) {
        Some(target) if target <= chars => target,
        _ => return Err(infeasible(level, len, 0)),
    };
    for attempt in 1..=max_attempts {
        let mut candidate = slice.to_vec();
        for _ in 0..level {
            let picks = index::sample(rng, len, 2);
            candidate.swap(picks.index(0), picks.index(1));
        }
        if slice_distance(slice, &candidate) == target {
            debug!(attempt, level, "accepted perturbation");
            return Ok(candidate);
        }
    }
    Err(infeasible(level, len, max_attempts))
}

/// Returns a copy of `alignment` with its working slice permuted.
pub fn perturb_alignment(
    alignment: &[String],
    options: &PerturbOptions,
    rng: &mut RngHandle,
) -> Result<Vec<String>, AttackError> {
    let range = options.scope.range(alignment.len());
    let swapped = swap_slice(
        &alignment[range.clone()],
        options.level,
        options.max_attempts,
        rng,
    )?;
    let mut perturbed = alignment.to_vec();
    perturbed[range].clone_from_slice(&swapped);
    Ok(perturbed)
}

/// Perturbs every record's alignment in place.
///
/// Record `i` draws from substream `i` of `master_seed`.
pub fn perturb_dataset(
    dataset: &mut Dataset,
    options: &PerturbOptions,
    master_seed: u64,
) -> Result<(), AttackError> {
    for (idx, record) in dataset.iter_mut().enumerate() {
        let mut rng = RngHandle::substream(master_seed, idx as u64);
        record.alignment = perturb_alignment(&record.alignment, options, &mut rng)
            .map_err(|err| err.with_context("record", (idx + 1).to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_selection() {
        assert_eq!(SwapScope::select(false, false), SwapScope::Interior);
        assert_eq!(SwapScope::select(false, true), SwapScope::Interior);
        assert_eq!(SwapScope::select(true, false), SwapScope::WithInput);
        assert_eq!(SwapScope::select(true, true), SwapScope::Whole);
    }

    #[test]
    fn scope_ranges() {
        assert_eq!(SwapScope::Interior.range(4), 1..3);
        assert_eq!(SwapScope::WithInput.range(4), 0..3);
        assert_eq!(SwapScope::Whole.range(4), 0..4);
        assert_eq!(SwapScope::Interior.range(1), 1..1);
        assert_eq!(SwapScope::Interior.range(0), 0..0);
        assert_eq!(SwapScope::WithInput.range(0), 0..0);
    }
}
