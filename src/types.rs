use crate::constants::{FLAG_FALSE, FLAG_TRUE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One `<tr>` of a submission table, holding the text of each cell in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }
}

/// A label/value pair extracted from a single table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFieldPair {
    pub label: String,
    pub value: String,
}

impl RawFieldPair {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A single cell of an applicant record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Flag(bool),
    Text(String),
}

impl ColumnValue {
    pub fn text(value: impl Into<String>) -> Self {
        ColumnValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(s) => Some(s),
            ColumnValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ColumnValue::Flag(b) => Some(*b),
            ColumnValue::Text(_) => None,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Text(s) => f.write_str(s),
            ColumnValue::Flag(true) => f.write_str(FLAG_TRUE),
            ColumnValue::Flag(false) => f.write_str(FLAG_FALSE),
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Flag(value)
    }
}

/// A finalized applicant record, keyed by export column header.
///
/// Records are only built by the record builder (or read back from an export) and
/// expose no mutation, so a record stays as it was when its submission finished.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ApplicantRecord {
    values: HashMap<String, ColumnValue>,
}

impl ApplicantRecord {
    pub(crate) fn from_values(values: HashMap<String, ColumnValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, header: &str) -> Option<&ColumnValue> {
        self.values.get(header)
    }

    pub fn text(&self, header: &str) -> Option<&str> {
        self.get(header).and_then(ColumnValue::as_str)
    }

    pub fn flag(&self, header: &str) -> Option<bool> {
        self.get(header).and_then(ColumnValue::as_flag)
    }

    pub fn contains(&self, header: &str) -> bool {
        self.values.contains_key(header)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered, append-only collection of finalized records for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    records: Vec<ApplicantRecord>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ApplicantRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ApplicantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
