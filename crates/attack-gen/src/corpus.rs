use std::fs;
use std::io::Write;
use std::path::Path;

use attack_core::errors::ErrorInfo;
use attack_core::{AttackError, Dataset, Record};
use tempfile::NamedTempFile;

/// Reads a tab-separated heldout corpus.
pub fn load_corpus(path: &Path) -> Result<Dataset, AttackError> {
    let contents =
        fs::read_to_string(path).map_err(|err| AttackError::io("corpus-read", path, err))?;
    parse_corpus(&contents).map_err(|err| err.with_context("path", path.display().to_string()))
}

/// Parses one record per line: input, output and alignment separated by tabs.
///
/// Line terminators, including a stray `\r`, are stripped before splitting
/// so they never end up in the alignment field. Fields past the third are ignored.
pub fn parse_corpus(contents: &str) -> Result<Dataset, AttackError> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            let line = line.trim_end_matches('\r');
            let mut fields = line.split('\t');
            match (fields.next(), fields.next(), fields.next()) {
                (Some(input), Some(output), Some(alignment)) => {
                    Ok(Record::from_fields(input, output, alignment))
                }
                _ => Err(AttackError::Corpus(
                    ErrorInfo::new("malformed-record", "expected 3 tab-separated fields")
                        .with_context("line", (idx + 1).to_string())
                        .with_context("fields", line.split('\t').count().to_string()),
                )),
            }
        })
        .collect()
}

/// Renders records as corpus text, one per line, without a trailing newline.
pub fn render_corpus(dataset: &Dataset) -> String {
    dataset
        .iter()
        .map(Record::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes `dataset` to `path` through a temporary file in the same directory.
pub fn write_corpus(path: &Path, dataset: &Dataset) -> Result<(), AttackError> {
    write_atomic(path, render_corpus(dataset).as_bytes(), "corpus")
}

/// Writes `contents` to a temporary file beside `path`, then renames it into
/// place. Error codes are prefixed with `kind`.
pub(crate) fn write_atomic(path: &Path, contents: &[u8], kind: &str) -> Result<(), AttackError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .map_err(|err| AttackError::io(&format!("{kind}-mkdir"), parent, err))?;

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|err| AttackError::io(&format!("{kind}-temp"), parent, err))?;
    temp.write_all(contents)
        .map_err(|err| AttackError::io(&format!("{kind}-write"), path, err))?;
    temp.persist(path)
        .map_err(|err| AttackError::io(&format!("{kind}-persist"), path, err.error))?;
    Ok(())
}
