/// Field labels and internal keys shared by the rules, the schema and the record builder.
/// Labels match the text of the registration form; internal keys name derived columns
/// that no form row carries directly.

// Form labels with dedicated rules
pub const MIDDLE_INITIAL: &str = "Middle Initial";
pub const SUFFIX: &str = "Suffix";
pub const STREET_ADDRESS: &str = "Street Address";
pub const CALLSIGN: &str = "Callsign";
pub const EXAMS: &str = "Exams";
pub const CITY: &str = "City";
pub const STATE: &str = "State";

// Form labels passed through unchanged
pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const ZIP_CODE: &str = "Zip Code";
pub const EMAIL: &str = "Email";
pub const PHONE: &str = "Phone";
pub const FRN: &str = "FRN";
pub const DATE_OF_BIRTH: &str = "Date of Birth";

// Derived columns
pub const PO_BOX: &str = "PO Box";
pub const UPGRADE_LICENSE: &str = "UPGRADE_LICENSE";
pub const REQUESTED_ELEMENT_3: &str = "REQUESTED_ELEMENT_3";
pub const REQUESTED_ELEMENT_4: &str = "REQUESTED_ELEMENT_4";
pub const PREVIOUS_APPLICATION: &str = "Previous Application";
pub const CERTIFYING_VES: &str = "CERTIFYING_VES";

/// Columns holding booleans rather than text.
pub const FLAG_FIELDS: [&str; 3] = [UPGRADE_LICENSE, REQUESTED_ELEMENT_3, REQUESTED_ELEMENT_4];

// Exam vocabulary offered by the form
pub const ELEMENT_2: &str = "Element 2 (Technician)";
pub const ELEMENT_3: &str = "Element 3 (General)";
pub const ELEMENT_4: &str = "Element 4 (Amateur Extra)";

pub const NO_CALLSIGN: &str = "NOCALL";
pub const NONE_VALUE: &str = "NONE";
pub const PO_BOX_MARKER: &str = "PO";
pub const CALLSIGN_ERROR: &str = "ERROR";

pub const DEFAULT_LABEL_MARKER: &str = "*:";
pub const DEFAULT_EXAM_SEPARATOR: &str = ", ";
pub const DEFAULT_PREVIOUS_APPLICATION: &str = "No";
pub const CERTIFYING_VES_DELIMITER: &str = "~";

pub const EXPORT_TIMESTAMP_FORMAT: &str = "%m%d%Y_%H%M%S";
pub const EXPORT_FILE_SUFFIX: &str = "_session_import.csv";

pub const FLAG_TRUE: &str = "True";
pub const FLAG_FALSE: &str = "False";
