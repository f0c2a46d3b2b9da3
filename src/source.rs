use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// One registration form submission: an identifier and its HTML body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub html: String,
}

impl Submission {
    pub fn new(id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: html.into(),
        }
    }
}

/// Where submissions come from.
///
/// `fetch` returns pending submissions in retrieval order. `mark_processed` is only
/// called after the batch containing the submission has been exported.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Submission>>;
    async fn mark_processed(&self, id: &str) -> Result<()>;
}

/// Inbox directory of saved submission bodies (`*.html` / `*.htm`), read in file-name order.
/// Marking a submission processed moves its file into the processed directory.
pub struct DirectorySource {
    inbox: PathBuf,
    processed_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(inbox: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            inbox: inbox.into(),
            processed_dir: processed_dir.into(),
        }
    }

    fn is_submission(path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
            .unwrap_or(false)
    }
}

#[async_trait]
impl SubmissionSource for DirectorySource {
    async fn fetch(&self) -> Result<Vec<Submission>> {
        debug!(inbox = %self.inbox.display(), "Scanning inbox");
        let mut paths = Vec::new();
        let mut entries = fs::read_dir(&self.inbox).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && Self::is_submission(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut submissions = Vec::with_capacity(paths.len());
        for path in paths {
            let id = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let html = fs::read_to_string(&path).await?;
            submissions.push(Submission::new(id, html));
        }

        info!(count = submissions.len(), "Fetched submissions");
        Ok(submissions)
    }

    async fn mark_processed(&self, id: &str) -> Result<()> {
        fs::create_dir_all(&self.processed_dir).await?;
        fs::rename(self.inbox.join(id), self.processed_dir.join(id)).await?;
        debug!(submission = id, "Marked submission processed");
        Ok(())
    }
}
