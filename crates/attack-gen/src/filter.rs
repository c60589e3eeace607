use std::collections::BTreeSet;

use attack_core::{Dataset, Record};

/// Returns `true` when every interior input token is the same table name.
pub fn is_degenerate(record: &Record) -> bool {
    let distinct: BTreeSet<&str> = record.interior_input().iter().map(String::as_str).collect();
    distinct.len() == 1
}

/// Drops degenerate records, keeping the survivors in their original order.
///
/// Returns the retained dataset and the number of records removed.
pub fn filter_degenerate(dataset: Dataset) -> (Dataset, usize) {
    let before = dataset.len();
    let kept: Dataset = dataset
        .into_iter()
        .filter(|record| !is_degenerate(record))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
