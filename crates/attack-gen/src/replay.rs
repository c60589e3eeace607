use attack_core::errors::ErrorInfo;
use attack_core::{AttackError, Dataset, Record};

use crate::tables::LookupTables;

fn bad_index(step: usize, token: &str, message: &str) -> AttackError {
    AttackError::Corpus(
        ErrorInfo::new("bad-alignment-index", message)
            .with_context("step", step.to_string())
            .with_context("index", token),
    )
}

/// Regenerates the output of `record` from its (possibly perturbed) alignment.
///
/// The first output word seeds the chain; step `j` applies the table named by
/// `input[alignment[j]]` to the word produced at step `j - 1`. The result has
/// the same length as the original output.
pub fn replay_output(record: &Record, tables: &LookupTables) -> Result<Vec<String>, AttackError> {
    let Some(seed) = record.output.first() else {
        return Ok(Vec::new());
    };

    let mut replayed = Vec::with_capacity(record.output.len());
    replayed.push(seed.clone());
    for step in 1..record.output.len() {
        let token = record
            .alignment
            .get(step)
            .ok_or_else(|| bad_index(step, "", "alignment is shorter than the output"))?;
        let position: usize = token
            .parse()
            .map_err(|_| bad_index(step, token, "alignment index is not a number"))?;
        let table = record
            .input
            .get(position)
            .ok_or_else(|| bad_index(step, token, "alignment index is outside the input"))?;
        let next = tables.lookup(table, &replayed[step - 1])?.to_owned();
        replayed.push(next);
    }
    Ok(replayed)
}

/// Replaces every record's output with its replayed chain, preserving order.
pub fn replay_dataset(dataset: &mut Dataset, tables: &LookupTables) -> Result<(), AttackError> {
    for (idx, record) in dataset.iter_mut().enumerate() {
        record.output = replay_output(record, tables)
            .map_err(|err| err.with_context("record", (idx + 1).to_string()))?;
    }
    Ok(())
}
