use crate::constants::*;
use crate::error::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One export column: the field label (or internal key) that rules write to, and
/// the header it is exported under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub field: String,
    pub header: String,
}

impl SchemaColumn {
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
        }
    }
}

/// Ordered set of export columns, fixed for the lifetime of a run.
///
/// The order is the export column order. Every write performed by a rule or a
/// post-processing default is resolved through [`CanonicalSchema::header_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSchema {
    columns: Vec<SchemaColumn>,
    by_field: HashMap<String, usize>,
}

impl CanonicalSchema {
    pub fn new(columns: Vec<SchemaColumn>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ImportError::Config("schema has no columns".to_string()));
        }

        let mut by_field = HashMap::with_capacity(columns.len());
        let mut headers = HashSet::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if by_field.insert(column.field.clone(), idx).is_some() {
                return Err(ImportError::Config(format!(
                    "schema field '{}' is listed more than once",
                    column.field
                )));
            }
            if !headers.insert(column.header.as_str()) {
                return Err(ImportError::Config(format!(
                    "schema header '{}' is listed more than once",
                    column.header
                )));
            }
        }

        Ok(Self { columns, by_field })
    }

    /// Resolve a field label to its export header; unknown labels are fatal
    pub fn header_for(&self, field: &str) -> Result<&str> {
        self.by_field
            .get(field)
            .map(|&idx| self.columns[idx].header.as_str())
            .ok_or_else(|| ImportError::SchemaMismatch {
                field: field.to_string(),
            })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.header.as_str())
    }

    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    /// Whether the header belongs to one of the boolean columns
    pub fn is_flag_header(&self, header: &str) -> bool {
        FLAG_FIELDS
            .iter()
            .filter_map(|field| self.header_for(field).ok())
            .any(|h| h == header)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for CanonicalSchema {
    /// Session Manager import layout covering every form field the rules know about
    fn default() -> Self {
        let columns = vec![
            SchemaColumn::new(FIRST_NAME, "FIRST_NAME"),
            SchemaColumn::new(MIDDLE_INITIAL, "MIDDLE_INITIAL"),
            SchemaColumn::new(LAST_NAME, "LAST_NAME"),
            SchemaColumn::new(SUFFIX, "SUFFIX"),
            SchemaColumn::new(STREET_ADDRESS, "STREET_ADDRESS"),
            SchemaColumn::new(PO_BOX, "PO_BOX"),
            SchemaColumn::new(CITY, "CITY"),
            SchemaColumn::new(STATE, "STATE"),
            SchemaColumn::new(ZIP_CODE, "ZIP_CODE"),
            SchemaColumn::new(EMAIL, "EMAIL"),
            SchemaColumn::new(PHONE, "PHONE"),
            SchemaColumn::new(DATE_OF_BIRTH, "DATE_OF_BIRTH"),
            SchemaColumn::new(FRN, "FRN"),
            SchemaColumn::new(CALLSIGN, "CALLSIGN"),
            SchemaColumn::new(UPGRADE_LICENSE, "UPGRADE_LICENSE"),
            SchemaColumn::new(REQUESTED_ELEMENT_3, "REQUESTED_ELEMENT_3"),
            SchemaColumn::new(REQUESTED_ELEMENT_4, "REQUESTED_ELEMENT_4"),
            SchemaColumn::new(PREVIOUS_APPLICATION, "PREVIOUS_APPLICATION"),
            SchemaColumn::new(EXAMS, "NOTES"),
            SchemaColumn::new(CERTIFYING_VES, "CERTIFYING_VES"),
        ];
        let by_field = columns
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.field.clone(), idx))
            .collect();
        Self { columns, by_field }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_and_mismatch() {
        let schema = CanonicalSchema::default();
        assert_eq!(schema.header_for(CALLSIGN).unwrap(), "CALLSIGN");
        assert_eq!(schema.header_for(EXAMS).unwrap(), "NOTES");

        let err = schema.header_for("Favorite Color").unwrap_err();
        assert!(matches!(err, ImportError::SchemaMismatch { field } if field == "Favorite Color"));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let result = CanonicalSchema::new(vec![
            SchemaColumn::new(CITY, "CITY"),
            SchemaColumn::new(CITY, "TOWN"),
        ]);
        assert!(matches!(result, Err(ImportError::Config(_))));
    }

    #[test]
    fn test_duplicate_header_is_rejected() {
        let result = CanonicalSchema::new(vec![
            SchemaColumn::new(CITY, "PLACE"),
            SchemaColumn::new(STATE, "PLACE"),
        ]);
        assert!(matches!(result, Err(ImportError::Config(_))));
    }

    #[test]
    fn test_headers_keep_declared_order() {
        let schema = CanonicalSchema::new(vec![
            SchemaColumn::new(STATE, "B"),
            SchemaColumn::new(CITY, "A"),
        ])
        .unwrap();
        assert_eq!(schema.headers().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn test_flag_headers() {
        let schema = CanonicalSchema::default();
        assert!(schema.is_flag_header("UPGRADE_LICENSE"));
        assert!(schema.is_flag_header("REQUESTED_ELEMENT_4"));
        assert!(!schema.is_flag_header("CALLSIGN"));
    }

    #[test]
    fn test_default_layout_is_valid() {
        let default = CanonicalSchema::default();
        let rebuilt = CanonicalSchema::new(default.columns().to_vec()).unwrap();
        assert_eq!(rebuilt, default);
    }
}
