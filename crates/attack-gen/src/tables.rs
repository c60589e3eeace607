use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use attack_core::errors::ErrorInfo;
use attack_core::AttackError;
use tracing::debug;

/// Number of leading training lines that encode the atomic table mappings.
pub const TABLE_PREFIX_LINES: usize = 64;

const KEY_FIELD: usize = 0;
const TABLE_FIELD: usize = 1;
const VALUE_FIELD: usize = 4;

/// Word-to-word lookup tables keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTables {
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl LookupTables {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a single mapping; a repeated key overwrites the earlier value.
    pub fn insert(
        &mut self,
        table: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.tables
            .entry(table.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Returns the table with the given name.
    pub fn table(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.tables.get(name)
    }

    /// Iterates over table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tables.keys().map(String::as_str)
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` when no table has been loaded.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Applies `table` to `key`.
    pub fn lookup(&self, table: &str, key: &str) -> Result<&str, AttackError> {
        let entries = self.tables.get(table).ok_or_else(|| {
            AttackError::Table(
                ErrorInfo::new("missing-table", "alignment points at an unknown table")
                    .with_context("table", table),
            )
        })?;
        entries.get(key).map(String::as_str).ok_or_else(|| {
            AttackError::Table(
                ErrorInfo::new("missing-key", "table has no entry for the chained word")
                    .with_context("table", table)
                    .with_context("key", key),
            )
        })
    }
}

/// Reads the lookup tables from the first `prefix_lines` lines of `path`.
pub fn load_tables(path: &Path, prefix_lines: usize) -> Result<LookupTables, AttackError> {
    let contents =
        fs::read_to_string(path).map_err(|err| AttackError::io("tables-read", path, err))?;
    parse_tables(&contents, prefix_lines)
        .map_err(|err| err.with_context("path", path.display().to_string()))
}

/// Parses table mappings from in-memory training data.
///
/// Each line is split on whitespace: field 0 is the key, field 1 the table
/// name and field 4 the value. Lines past `prefix_lines` are ignored.
pub fn parse_tables(contents: &str, prefix_lines: usize) -> Result<LookupTables, AttackError> {
    let mut tables = LookupTables::new();
    for (idx, line) in contents.lines().take(prefix_lines).enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() <= VALUE_FIELD {
            return Err(AttackError::Corpus(
                ErrorInfo::new("short-table-line", "training line has fewer than 5 fields")
                    .with_context("line", (idx + 1).to_string())
                    .with_context("fields", fields.len().to_string()),
            ));
        }
        tables.insert(fields[TABLE_FIELD], fields[KEY_FIELD], fields[VALUE_FIELD]);
    }
    debug!(tables = tables.len(), "parsed lookup tables");
    Ok(tables)
}
