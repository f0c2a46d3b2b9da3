use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No schema column for field '{field}'")]
    SchemaMismatch { field: String },

    #[error("Submission '{submission}' has no registration table")]
    MissingTable { submission: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export to '{path}' failed: {reason}")]
    Export { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
