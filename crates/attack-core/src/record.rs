//! Symbolic lookup examples and their tab-separated line format.

use serde::{Deserialize, Serialize};

/// One example of the lookup-table task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Input tokens. The first and last are boundary markers; interior tokens
    /// name the table applied at each lookup step.
    pub input: Vec<String>,
    /// Output tokens. The first token seeds the lookup chain.
    pub output: Vec<String>,
    /// Alignment indices (as written in the corpus), one per output step plus
    /// an optional trailing terminal marker.
    pub alignment: Vec<String>,
}

/// Ordered collection of records sharing one corpus file.
pub type Dataset = Vec<Record>;

fn tokens(field: &str) -> Vec<String> {
    field.split_whitespace().map(str::to_owned).collect()
}

impl Record {
    /// Builds a record from the three raw tab-separated fields.
    pub fn from_fields(input: &str, output: &str, alignment: &str) -> Self {
        Self {
            input: tokens(input),
            output: tokens(output),
            alignment: tokens(alignment),
        }
    }

    /// Input tokens without the first and last boundary markers.
    pub fn interior_input(&self) -> &[String] {
        if self.input.len() < 2 {
            return &[];
        }
        &self.input[1..self.input.len() - 1]
    }

    /// Renders the record as a single corpus line without a terminator.
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.input.join(" "),
            self.output.join(" "),
            self.alignment.join(" ")
        )
    }
}
