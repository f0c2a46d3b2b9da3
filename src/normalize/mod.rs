pub mod exams;
pub mod rules;

use std::collections::HashMap;

use crate::constants::*;
use crate::types::{ColumnValue, RawFieldPair};

pub use rules::FieldRule;

/// A value destined for the column registered under `field` in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWrite {
    pub field: String,
    pub value: ColumnValue,
}

impl ColumnWrite {
    pub fn new(field: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

static PASSTHROUGH: FieldRule = FieldRule::Passthrough;

/// Field rules keyed by form label; labels without a rule pass through unchanged
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: HashMap<String, FieldRule>,
}

impl RuleTable {
    /// The registration form's rule set
    pub fn new(exam_separator: &str) -> Self {
        let mut table = Self::empty();
        table.register(MIDDLE_INITIAL, FieldRule::NoneToEmpty);
        table.register(SUFFIX, FieldRule::NoneToEmpty);
        table.register(STREET_ADDRESS, FieldRule::StreetAddress);
        table.register(CALLSIGN, FieldRule::Callsign);
        table.register(
            EXAMS,
            FieldRule::Exams {
                separator: exam_separator.to_string(),
            },
        );
        table.register(CITY, FieldRule::Capitalize);
        table.register(STATE, FieldRule::Uppercase);
        table
    }

    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn register(&mut self, label: impl Into<String>, rule: FieldRule) {
        self.rules.insert(label.into(), rule);
    }

    pub fn rule_for(&self, label: &str) -> &FieldRule {
        self.rules.get(label).unwrap_or(&PASSTHROUGH)
    }

    /// Turn one raw pair into the column writes its rule produces
    pub fn normalize(&self, pair: &RawFieldPair) -> Vec<ColumnWrite> {
        self.rule_for(&pair.label).apply(&pair.label, &pair.value)
    }

    #[cfg(test)]
    fn labels(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new(DEFAULT_EXAM_SEPARATOR)
    }
}
