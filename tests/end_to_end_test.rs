use anyhow::Result;
use std::fs;
use tempfile::tempdir;
use ve_session_import::config::Config;
use ve_session_import::export::read_batch;
use ve_session_import::pipeline::Pipeline;
use ve_session_import::source::DirectorySource;

const CONFIG: &str = r#"
    [certifying_ves]
    one = "k1abc"
    two = "w2def"
    three = "n3ghi"
"#;

fn form(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(label, value)| format!("<tr><td>{label}*:</td><td>{value}</td></tr>\n"))
        .collect();
    format!("<html><body><h3>Exam Registration</h3><table>\n{body}</table></body></html>")
}

#[tokio::test]
async fn test_two_submission_run() -> Result<()> {
    let dir = tempdir()?;
    let inbox = dir.path().join("inbox");
    let output = dir.path().join("output");
    fs::create_dir_all(&inbox)?;

    fs::write(
        inbox.join("001.html"),
        form(&[
            ("Middle Initial", "NONE"),
            ("Street Address", "PO Box 9"),
            ("Callsign", "NOCALL"),
            ("Exams", "Element 3 (General)"),
        ]),
    )?;
    fs::write(
        inbox.join("002.html"),
        form(&[
            ("Middle Initial", "B"),
            ("Street Address", "12 Oak Rd"),
            ("Callsign", "ab3cd"),
            ("Exams", "Element 4 (Amateur Extra)"),
        ]),
    )?;

    let config = Config::from_toml_str(CONFIG)?;
    let schema = config.schema()?;
    let source = DirectorySource::new(&inbox, inbox.join("processed"));
    let result = Pipeline::run(&config, &source, &output, false).await?;

    assert_eq!(result.total_submissions, 2);
    assert_eq!(result.exported_records, 2);
    assert_eq!(result.marked_processed, 0);

    let text = fs::read_to_string(&result.output_file)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], schema.headers().collect::<Vec<_>>().join(","));

    let batch = read_batch(text.as_bytes(), &schema)?;
    let first = &batch.records()[0];
    assert_eq!(first.text("MIDDLE_INITIAL"), Some(""));
    assert_eq!(first.text("PO_BOX"), Some("PO Box 9"));
    assert_eq!(first.text("STREET_ADDRESS"), Some(""));
    assert_eq!(first.text("CALLSIGN"), Some(""));
    assert_eq!(first.flag("UPGRADE_LICENSE"), Some(false));
    assert_eq!(first.flag("REQUESTED_ELEMENT_3"), Some(true));
    assert_eq!(first.flag("REQUESTED_ELEMENT_4"), Some(false));
    assert_eq!(first.text("PREVIOUS_APPLICATION"), Some("No"));
    assert_eq!(first.text("CERTIFYING_VES"), Some("K1ABC~W2DEF~N3GHI"));

    let second = &batch.records()[1];
    assert_eq!(second.text("MIDDLE_INITIAL"), Some("B"));
    assert_eq!(second.text("STREET_ADDRESS"), Some("12 Oak Rd"));
    assert_eq!(second.text("PO_BOX"), Some(""));
    assert_eq!(second.text("CALLSIGN"), Some("AB3CD"));
    assert_eq!(second.flag("UPGRADE_LICENSE"), Some(true));
    assert_eq!(second.flag("REQUESTED_ELEMENT_3"), Some(false));
    assert_eq!(second.flag("REQUESTED_ELEMENT_4"), Some(true));

    // Submissions stay in the inbox unless marking is enabled
    assert!(inbox.join("001.html").exists());
    Ok(())
}

#[tokio::test]
async fn test_mark_processed_after_export() -> Result<()> {
    let dir = tempdir()?;
    let inbox = dir.path().join("inbox");
    fs::create_dir_all(&inbox)?;
    fs::write(
        inbox.join("a.html"),
        form(&[("First Name", "Ada"), ("City", "LONDON"), ("State", "ky")]),
    )?;

    let config = Config::from_toml_str(CONFIG)?;
    let source = DirectorySource::new(&inbox, dir.path().join("done"));
    let result = Pipeline::run(&config, &source, &dir.path().join("out"), true).await?;

    assert_eq!(result.marked_processed, 1);
    assert!(!inbox.join("a.html").exists());
    assert!(dir.path().join("done").join("a.html").exists());

    let text = fs::read_to_string(&result.output_file)?;
    let batch = read_batch(text.as_bytes(), &config.schema()?)?;
    let record = &batch.records()[0];
    assert_eq!(record.text("CITY"), Some("London"));
    assert_eq!(record.text("STATE"), Some("KY"));
    // Columns no rule wrote are exported empty
    assert_eq!(record.text("CALLSIGN"), Some(""));
    Ok(())
}

#[tokio::test]
async fn test_unknown_field_aborts_without_export() -> Result<()> {
    let dir = tempdir()?;
    let inbox = dir.path().join("inbox");
    let output = dir.path().join("output");
    fs::create_dir_all(&inbox)?;
    fs::write(inbox.join("a.html"), form(&[("First Name", "Ada")]))?;
    fs::write(inbox.join("b.html"), form(&[("Favorite Band", "Rush")]))?;

    let config = Config::from_toml_str(CONFIG)?;
    let source = DirectorySource::new(&inbox, inbox.join("processed"));
    let result = Pipeline::run(&config, &source, &output, true).await;

    assert!(result.is_err());
    assert!(!output.exists() || fs::read_dir(&output)?.next().is_none());
    assert!(inbox.join("a.html").exists());
    Ok(())
}

#[tokio::test]
async fn test_mark_failure_keeps_completed_export() -> Result<()> {
    let dir = tempdir()?;
    let inbox = dir.path().join("inbox");
    let output = dir.path().join("output");
    fs::create_dir_all(&inbox)?;
    fs::write(inbox.join("a.html"), form(&[("First Name", "Ada")]))?;
    fs::write(inbox.join("b.html"), form(&[("First Name", "Grace")]))?;

    // A regular file where the processed directory should be makes every move fail
    let processed = dir.path().join("processed");
    fs::write(&processed, "not a directory")?;

    let config = Config::from_toml_str(CONFIG)?;
    let source = DirectorySource::new(&inbox, &processed);
    let result = Pipeline::run(&config, &source, &output, true).await?;

    assert_eq!(result.exported_records, 2);
    assert_eq!(result.marked_processed, 0);
    assert_eq!(result.mark_failures, 2);
    assert!(result.output_file.exists());
    assert_eq!(fs::read_dir(&output)?.count(), 1);
    assert!(inbox.join("a.html").exists());
    assert!(inbox.join("b.html").exists());
    Ok(())
}
