use crate::config::Config;
use crate::error::Result;
use crate::export::BatchExporter;
use crate::extract::FieldPairs;
use crate::html::parse_table_rows;
use crate::normalize::RuleTable;
use crate::record::{RecordBuilder, RecordDefaults};
use crate::schema::CanonicalSchema;
use crate::source::{Submission, SubmissionSource};
use crate::types::{ApplicantRecord, Batch, TableRow};
use chrono::Local;
use metrics::counter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Turns submissions into finalized records, one at a time
pub struct SubmissionProcessor {
    rules: RuleTable,
    builder: RecordBuilder,
    label_marker: String,
    skipped_rows: usize,
}

impl SubmissionProcessor {
    pub fn new(
        schema: CanonicalSchema,
        rules: RuleTable,
        defaults: RecordDefaults,
        label_marker: impl Into<String>,
    ) -> Self {
        Self {
            rules,
            builder: RecordBuilder::new(schema, defaults),
            label_marker: label_marker.into(),
            skipped_rows: 0,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.schema()?,
            RuleTable::new(&config.form.exam_separator),
            RecordDefaults {
                previous_application: config.form.previous_application_default.clone(),
                certifying_ves: config.certifying_ves.clone(),
            },
            config.form.label_marker.clone(),
        ))
    }

    pub fn schema(&self) -> &CanonicalSchema {
        self.builder.schema()
    }

    /// Malformed rows skipped across every submission processed so far
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    #[instrument(skip(self, submission), fields(submission = %submission.id))]
    pub fn process(&mut self, submission: &Submission) -> Result<ApplicantRecord> {
        let rows = parse_table_rows(&submission.id, &submission.html)?;
        self.process_rows(rows)
    }

    /// Build one record from an already parsed table
    pub fn process_rows(&mut self, rows: Vec<TableRow>) -> Result<ApplicantRecord> {
        let result = self.apply_rows(rows).and_then(|()| self.builder.finalize());
        if result.is_err() {
            self.builder.reset();
        }
        result
    }

    fn apply_rows(&mut self, rows: Vec<TableRow>) -> Result<()> {
        let mut pairs = FieldPairs::new(rows, self.label_marker.as_str());
        for pair in pairs.by_ref() {
            debug!(field = %pair.label, value = %pair.value, "Normalizing field");
            self.builder.apply(self.rules.normalize(&pair))?;
        }
        self.skipped_rows += pairs.skipped();
        counter!("ve_session_import_rows_skipped_total").increment(pairs.skipped() as u64);
        Ok(())
    }
}

/// Outcome of a complete run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub total_submissions: usize,
    pub exported_records: usize,
    pub skipped_rows: usize,
    pub marked_processed: usize,
    pub mark_failures: usize,
    pub output_file: PathBuf,
}

pub struct Pipeline;

impl Pipeline {
    /// Process submissions strictly in order; the first failure aborts the batch
    pub fn build_batch(
        processor: &mut SubmissionProcessor,
        submissions: &[Submission],
    ) -> Result<Batch> {
        let mut batch = Batch::new();
        for submission in submissions {
            let record = processor.process(submission)?;
            batch.push(record);
            counter!("ve_session_import_submissions_processed_total").increment(1);
        }
        Ok(batch)
    }

    /// Fetch, normalize and export one batch, then mark its submissions if asked to
    #[instrument(skip(config, source))]
    pub async fn run(
        config: &Config,
        source: &dyn SubmissionSource,
        output_dir: &Path,
        mark_processed: bool,
    ) -> Result<PipelineResult> {
        let started = Local::now();
        let mut processor = SubmissionProcessor::from_config(config)?;

        info!("Fetching registration submissions");
        let submissions = source.fetch().await?;

        let batch = Self::build_batch(&mut processor, &submissions)?;
        info!(
            records = batch.len(),
            skipped_rows = processor.skipped_rows(),
            "Built batch"
        );

        let output_file =
            BatchExporter::new(processor.schema()).export_to_dir(&batch, output_dir, started)?;

        // Export is in place; a submission that fails to mark stays in the inbox
        let mut marked = 0;
        let mut mark_failures = 0;
        if mark_processed {
            for submission in &submissions {
                match source.mark_processed(&submission.id).await {
                    Ok(()) => marked += 1,
                    Err(e) => {
                        mark_failures += 1;
                        warn!(submission = %submission.id, error = %e, "Failed to mark submission processed");
                    }
                }
            }
            info!(marked, mark_failures, "Marked submissions processed");
        }

        Ok(PipelineResult {
            total_submissions: submissions.len(),
            exported_records: batch.len(),
            skipped_rows: processor.skipped_rows(),
            marked_processed: marked,
            mark_failures,
            output_file,
        })
    }
}
