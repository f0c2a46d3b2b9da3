use crate::constants::{ELEMENT_2, ELEMENT_3, ELEMENT_4};
use tracing::warn;

/// Exams the registration form offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exam {
    Element2,
    Element3,
    Element4,
}

impl Exam {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            ELEMENT_2 => Some(Exam::Element2),
            ELEMENT_3 => Some(Exam::Element3),
            ELEMENT_4 => Some(Exam::Element4),
            _ => None,
        }
    }
}

/// Outcome of resolving an applicant's exam selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExamElection {
    pub requested_element_3: bool,
    pub requested_element_4: bool,
    /// Selected names outside the form's vocabulary; they never change a flag
    pub unrecognized: Vec<String>,
}

/// Resolve a multi-select exam value into the two upgrade-request flags.
///
/// Element 3 sets the Element 3 flag, Element 4 sets the Element 4 flag, and an
/// Element 2 selection on its own leaves both unset. Choosing Element 4 alongside
/// other exams never clears the Element 3 flag.
pub fn resolve(value: &str, separator: &str) -> ExamElection {
    let mut election = ExamElection::default();

    for name in value.split(separator).map(str::trim) {
        if name.is_empty() {
            continue;
        }
        match Exam::from_label(name) {
            Some(Exam::Element2) => {}
            Some(Exam::Element3) => election.requested_element_3 = true,
            Some(Exam::Element4) => election.requested_element_4 = true,
            None => {
                warn!(exam = name, "Ignoring unrecognized exam selection");
                election.unrecognized.push(name.to_string());
            }
        }
    }

    election
}
