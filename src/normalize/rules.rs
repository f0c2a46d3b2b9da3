use crate::constants::*;
use tracing::{debug, warn};

use super::exams;
use super::ColumnWrite;

/// How a single form field turns into column writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// "NONE" in any case becomes an empty string
    NoneToEmpty,
    /// Splits PO boxes out of the street address
    StreetAddress,
    /// Upper-cases call signs and derives the upgrade flag
    Callsign,
    /// Keeps the raw selection and derives the element request flags
    Exams { separator: String },
    /// First character upper-cased, the rest lower-cased
    Capitalize,
    Uppercase,
    Passthrough,
}

impl FieldRule {
    pub fn apply(&self, label: &str, value: &str) -> Vec<ColumnWrite> {
        match self {
            FieldRule::NoneToEmpty => {
                if value.eq_ignore_ascii_case(NONE_VALUE) {
                    debug!(field = label, "Blanking NONE value");
                    vec![ColumnWrite::new(label, "")]
                } else {
                    vec![ColumnWrite::new(label, value)]
                }
            }
            FieldRule::StreetAddress => {
                if value.contains(PO_BOX_MARKER) {
                    debug!(field = label, "Moving PO box out of street address");
                    vec![
                        ColumnWrite::new(label, ""),
                        ColumnWrite::new(PO_BOX, value),
                    ]
                } else {
                    vec![
                        ColumnWrite::new(label, value),
                        ColumnWrite::new(PO_BOX, ""),
                    ]
                }
            }
            FieldRule::Callsign => callsign(label, value),
            FieldRule::Exams { separator } => {
                let election = exams::resolve(value, separator);
                debug!(
                    element_3 = election.requested_element_3,
                    element_4 = election.requested_element_4,
                    "Resolved exam election"
                );
                vec![
                    ColumnWrite::new(label, value),
                    ColumnWrite::new(REQUESTED_ELEMENT_3, election.requested_element_3),
                    ColumnWrite::new(REQUESTED_ELEMENT_4, election.requested_element_4),
                ]
            }
            FieldRule::Capitalize => {
                let capitalized = capitalize(value);
                if capitalized != value {
                    debug!(field = label, from = value, to = %capitalized, "Capitalized value");
                }
                vec![ColumnWrite::new(label, capitalized)]
            }
            FieldRule::Uppercase => {
                let upper = value.to_uppercase();
                if upper != value {
                    debug!(field = label, from = value, to = %upper, "Upper-cased value");
                }
                vec![ColumnWrite::new(label, upper)]
            }
            FieldRule::Passthrough => vec![ColumnWrite::new(label, value)],
        }
    }
}

fn callsign(label: &str, value: &str) -> Vec<ColumnWrite> {
    if value.eq_ignore_ascii_case(NO_CALLSIGN) {
        debug!("Applicant has no call sign");
        return vec![
            ColumnWrite::new(label, ""),
            ColumnWrite::new(UPGRADE_LICENSE, false),
        ];
    }

    if !value.is_empty() && value.chars().all(char::is_alphanumeric) {
        let upper = value.to_uppercase();
        if upper != value {
            debug!(field = label, from = value, to = %upper, "Upper-cased call sign");
        }
        return vec![
            ColumnWrite::new(label, upper),
            ColumnWrite::new(UPGRADE_LICENSE, true),
        ];
    }

    warn!(callsign = value, "Invalid call sign, writing sentinel for review");
    vec![
        ColumnWrite::new(label, CALLSIGN_ERROR),
        ColumnWrite::new(UPGRADE_LICENSE, false),
    ]
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
