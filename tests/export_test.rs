use anyhow::Result;
use std::fs;
use tempfile::tempdir;
use ve_session_import::config::CertifyingVes;
use ve_session_import::export::{read_batch, BatchExporter};
use ve_session_import::normalize::RuleTable;
use ve_session_import::pipeline::SubmissionProcessor;
use ve_session_import::record::RecordDefaults;
use ve_session_import::schema::CanonicalSchema;
use ve_session_import::types::{Batch, TableRow};

fn processor() -> SubmissionProcessor {
    SubmissionProcessor::new(
        CanonicalSchema::default(),
        RuleTable::default(),
        RecordDefaults {
            previous_application: "No".to_string(),
            certifying_ves: CertifyingVes::new("k1abc", "w2def", "n3ghi"),
        },
        "*:",
    )
}

fn full_form(first: &str, callsign: &str, exams: &str) -> Vec<TableRow> {
    vec![
        TableRow::new(["First Name*:", first]),
        TableRow::new(["Middle Initial*:", "none"]),
        TableRow::new(["Last Name*:", "Hopper, Jr."]),
        TableRow::new(["Suffix*:", "None"]),
        TableRow::new(["Street Address*:", "1 \"Navy\" Way"]),
        TableRow::new(["City*:", "arlington"]),
        TableRow::new(["State*:", "va"]),
        TableRow::new(["Zip Code*:", "22201"]),
        TableRow::new(["Email*:", "grace@example.com"]),
        TableRow::new(["Phone*:", "555-0100"]),
        TableRow::new(["Date of Birth*:", "12/09/1906"]),
        TableRow::new(["FRN*:", "0012345678"]),
        TableRow::new(["Callsign*:", callsign]),
        TableRow::new(["Exams*:", exams]),
        TableRow::new(["Previous Application*:", "Yes"]),
    ]
}

#[test]
fn test_export_has_one_row_per_record_and_schema_width() -> Result<()> {
    let mut processor = processor();
    let mut batch = Batch::new();
    batch.push(processor.process_rows(full_form("Grace", "w1aw", "Element 3 (General)"))?);
    batch.push(processor.process_rows(full_form(
        "Ada",
        "NoCall",
        "Element 2 (Technician), Element 4 (Amateur Extra)",
    ))?);
    batch.push(processor.process_rows(full_form("Edsger", "n0/p", "Element 2 (Technician)"))?);

    let schema = CanonicalSchema::default();
    let mut out = Vec::new();
    BatchExporter::new(&schema).write(&batch, &mut out)?;

    let mut reader = csv::Reader::from_reader(out.as_slice());
    assert_eq!(reader.headers()?.len(), schema.len());
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), batch.len());
    assert!(rows.iter().all(|row| row.len() == schema.len()));

    // Every column is populated by a full form, so the export round-trips exactly
    let read = read_batch(out.as_slice(), &schema)?;
    assert_eq!(read, batch);

    let third = &read.records()[2];
    assert_eq!(third.text("CALLSIGN"), Some("ERROR"));
    assert_eq!(third.flag("UPGRADE_LICENSE"), Some(false));
    assert_eq!(third.flag("REQUESTED_ELEMENT_3"), Some(false));
    assert_eq!(third.flag("REQUESTED_ELEMENT_4"), Some(false));
    assert_eq!(third.text("PREVIOUS_APPLICATION"), Some("Yes"));
    Ok(())
}

#[test]
fn test_export_to_dir_writes_timestamped_file() -> Result<()> {
    let dir = tempdir()?;
    let mut processor = processor();
    let mut batch = Batch::new();
    batch.push(processor.process_rows(full_form("Grace", "w1aw", "Element 3 (General)"))?);

    let schema = CanonicalSchema::default();
    let started = chrono::Local::now();
    let path = BatchExporter::new(&schema).export_to_dir(&batch, dir.path(), started)?;

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with("_session_import.csv"));
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    assert_eq!(fs::read_to_string(&path)?.lines().count(), 2);
    Ok(())
}
