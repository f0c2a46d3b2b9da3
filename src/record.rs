use crate::config::CertifyingVes;
use crate::constants::{CERTIFYING_VES, PREVIOUS_APPLICATION};
use crate::error::Result;
use crate::normalize::ColumnWrite;
use crate::schema::CanonicalSchema;
use crate::types::{ApplicantRecord, ColumnValue};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Values every record receives after its form rows are applied
#[derive(Debug, Clone)]
pub struct RecordDefaults {
    pub previous_application: String,
    pub certifying_ves: CertifyingVes,
}

/// Owns the record under construction for the current submission.
///
/// Column writes are resolved through the schema as they arrive. `finalize`
/// applies the post-processing defaults, hands back an immutable record and
/// leaves the builder empty for the next submission.
pub struct RecordBuilder {
    schema: CanonicalSchema,
    defaults: RecordDefaults,
    draft: HashMap<String, ColumnValue>,
}

impl RecordBuilder {
    pub fn new(schema: CanonicalSchema, defaults: RecordDefaults) -> Self {
        Self {
            schema,
            defaults,
            draft: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    pub fn is_empty(&self) -> bool {
        self.draft.is_empty()
    }

    /// Record the writes produced by one form row
    pub fn apply<I>(&mut self, writes: I) -> Result<()>
    where
        I: IntoIterator<Item = ColumnWrite>,
    {
        for write in writes {
            let header = self.schema.header_for(&write.field)?.to_string();
            if let Some(previous) = self.draft.insert(header, write.value) {
                warn!(
                    field = %write.field,
                    previous = %previous,
                    "Field written twice in one submission, keeping the later value"
                );
            }
        }
        Ok(())
    }

    /// Apply defaults and take the finished record, resetting the builder
    pub fn finalize(&mut self) -> Result<ApplicantRecord> {
        self.apply_defaults()?;
        let record = ApplicantRecord::from_values(std::mem::take(&mut self.draft));
        info!(
            columns = record.len(),
            record = %serde_json::to_string(&record)?,
            "Finalized applicant record"
        );
        Ok(record)
    }

    /// Drop the record under construction without finalizing it
    pub fn reset(&mut self) {
        self.draft.clear();
    }

    fn apply_defaults(&mut self) -> Result<()> {
        let previous_header = self.schema.header_for(PREVIOUS_APPLICATION)?;
        if !self.draft.contains_key(previous_header) {
            debug!(
                value = %self.defaults.previous_application,
                "Defaulting previous application"
            );
            self.draft.insert(
                previous_header.to_string(),
                ColumnValue::text(self.defaults.previous_application.clone()),
            );
        }

        let ves_header = self.schema.header_for(CERTIFYING_VES)?;
        let composite = self.defaults.certifying_ves.composite();
        debug!(certifying_ves = %composite, "Setting certifying examiners");
        self.draft
            .insert(ves_header.to_string(), ColumnValue::text(composite));
        Ok(())
    }
}
