use crate::constants::{
    CERTIFYING_VES_DELIMITER, DEFAULT_EXAM_SEPARATOR, DEFAULT_LABEL_MARKER,
    DEFAULT_PREVIOUS_APPLICATION,
};
use crate::error::{ImportError, Result};
use crate::schema::{CanonicalSchema, SchemaColumn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "VE_SESSION_IMPORT_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schema: SchemaConfig,
    pub certifying_ves: CertifyingVes,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Export columns in order
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    #[serde(rename = "column")]
    pub columns: Vec<SchemaColumn>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            columns: CanonicalSchema::default().columns().to_vec(),
        }
    }
}

/// The three volunteer examiners certifying the session
#[derive(Debug, Clone, Deserialize)]
pub struct CertifyingVes {
    pub one: String,
    pub two: String,
    pub three: String,
}

impl CertifyingVes {
    pub fn new(one: impl Into<String>, two: impl Into<String>, three: impl Into<String>) -> Self {
        Self {
            one: one.into(),
            two: two.into(),
            three: three.into(),
        }
    }

    /// Upper-cased identifiers joined with `~`
    pub fn composite(&self) -> String {
        [&self.one, &self.two, &self.three]
            .iter()
            .map(|ve| ve.trim().to_uppercase())
            .collect::<Vec<_>>()
            .join(CERTIFYING_VES_DELIMITER)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub label_marker: String,
    pub exam_separator: String,
    pub previous_application_default: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            label_marker: DEFAULT_LABEL_MARKER.to_string(),
            exam_separator: DEFAULT_EXAM_SEPARATOR.to_string(),
            previous_application_default: DEFAULT_PREVIOUS_APPLICATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub inbox: PathBuf,
    /// Move submissions out of the inbox once their batch has been exported
    pub mark_processed: bool,
    pub processed_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            inbox: PathBuf::from("inbox"),
            mark_processed: false,
            processed_dir: None,
        }
    }
}

impl SourceConfig {
    pub fn processed_dir(&self) -> PathBuf {
        self.processed_dir
            .clone()
            .unwrap_or_else(|| self.inbox.join("processed"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Load from the path in `VE_SESSION_IMPORT_CONFIG`, falling back to `config.toml`
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, ve) in [
            ("one", &self.certifying_ves.one),
            ("two", &self.certifying_ves.two),
            ("three", &self.certifying_ves.three),
        ] {
            if ve.trim().is_empty() {
                return Err(ImportError::Config(format!(
                    "certifying_ves.{name} must not be empty"
                )));
            }
        }
        if self.form.label_marker.is_empty() {
            return Err(ImportError::Config("form.label_marker must not be empty".to_string()));
        }
        if self.form.exam_separator.is_empty() {
            return Err(ImportError::Config("form.exam_separator must not be empty".to_string()));
        }
        self.schema()?;
        Ok(())
    }

    pub fn schema(&self) -> Result<CanonicalSchema> {
        CanonicalSchema::new(self.schema.columns.clone())
    }
}
