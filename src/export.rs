use crate::constants::{EXPORT_FILE_SUFFIX, EXPORT_TIMESTAMP_FORMAT, FLAG_FALSE, FLAG_TRUE};
use crate::error::{ImportError, Result};
use crate::schema::CanonicalSchema;
use crate::types::{ApplicantRecord, Batch, ColumnValue};
use chrono::{DateTime, Local};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Name of the export file for a run started at `started`
pub fn export_file_name(started: DateTime<Local>) -> String {
    format!("{}{}", started.format(EXPORT_TIMESTAMP_FORMAT), EXPORT_FILE_SUFFIX)
}

/// Writes a batch as a comma-delimited file in schema column order
pub struct BatchExporter<'a> {
    schema: &'a CanonicalSchema,
}

impl<'a> BatchExporter<'a> {
    pub fn new(schema: &'a CanonicalSchema) -> Self {
        Self { schema }
    }

    /// Header row, then one row per record; absent columns are written empty
    pub fn write<W: Write>(&self, batch: &Batch, writer: W) -> Result<()> {
        let mut csv = WriterBuilder::new().from_writer(writer);
        csv.write_record(self.schema.headers())?;
        for record in batch.records() {
            csv.write_record(self.project(record))?;
        }
        csv.flush()?;
        Ok(())
    }

    fn project(&self, record: &ApplicantRecord) -> Vec<String> {
        self.schema
            .headers()
            .map(|header| record.get(header).map(ColumnValue::to_string).unwrap_or_default())
            .collect()
    }

    /// Write the batch to a new timestamped file in `output_dir`.
    ///
    /// The rows go to a `.partial` sibling first and are renamed into place once
    /// complete, so a failed export leaves nothing behind. An existing file with the
    /// same name is never appended to or replaced.
    #[instrument(skip(self, batch), fields(records = batch.len()))]
    pub fn export_to_dir(
        &self,
        batch: &Batch,
        output_dir: &Path,
        started: DateTime<Local>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(export_file_name(started));
        if path.exists() {
            return Err(export_error(&path, "file already exists"));
        }

        let partial = path.with_extension("csv.partial");
        let written = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&partial)
            .map_err(ImportError::from)
            .and_then(|file| self.write(batch, file))
            .and_then(|()| fs::rename(&partial, &path).map_err(ImportError::from));

        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(export_error(&path, &e.to_string()));
        }

        metrics::counter!("ve_session_import_records_exported_total").increment(batch.len() as u64);
        info!(path = %path.display(), records = batch.len(), "Exported batch");
        Ok(path)
    }
}

fn export_error(path: &Path, reason: &str) -> ImportError {
    ImportError::Export {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an export back into records.
///
/// Flag columns holding `True`/`False` become booleans; every other cell, empty
/// cells included, is read as text.
pub fn read_batch<R: Read>(reader: R, schema: &CanonicalSchema) -> Result<Batch> {
    let mut csv = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();

    let expected: Vec<&str> = schema.headers().collect();
    if headers != expected {
        return Err(ImportError::Config(format!(
            "export header {:?} does not match schema {:?}",
            headers, expected
        )));
    }

    let mut batch = Batch::new();
    for row in csv.records() {
        let row = row?;
        let values: HashMap<String, ColumnValue> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| {
                let value = match cell {
                    FLAG_TRUE if schema.is_flag_header(header) => ColumnValue::Flag(true),
                    FLAG_FALSE if schema.is_flag_header(header) => ColumnValue::Flag(false),
                    _ => ColumnValue::text(cell),
                };
                (header.clone(), value)
            })
            .collect();
        batch.push(ApplicantRecord::from_values(values));
    }
    Ok(batch)
}
