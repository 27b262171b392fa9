use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::FolioError;

/// Literal prefix and extension around the series/number/identity part of an
/// archive name, e.g. `FACTURA` + `zip` for `FACTURAE001-120501234567.zip`.
///
/// Both are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilenamePattern {
    pub prefix: String,
    /// Extension without the leading dot.
    pub extension: String,
}

impl Default for FilenamePattern {
    fn default() -> Self {
        Self {
            prefix: "FACTURA".into(),
            extension: "zip".into(),
        }
    }
}

/// Configuration for one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory holding the archive bundles.
    pub archive_directory: PathBuf,
    /// Directory the report tables are written to.
    pub output_directory: PathBuf,
    /// Target document count. Only used for the "expected minus unique" column.
    pub expected_total: i64,
    pub filename_pattern: FilenamePattern,
    /// Also extract line items of credit notes.
    pub credit_note_lines: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            archive_directory: PathBuf::from("archives"),
            output_directory: PathBuf::from("reports"),
            expected_total: 0,
            filename_pattern: FilenamePattern::default(),
            credit_note_lines: false,
        }
    }
}

impl RunConfig {
    /// Load a configuration from a JSON file. Absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, FolioError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            FolioError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, FolioError> {
        serde_json::from_str(text).map_err(|e| FolioError::Config(format!("invalid JSON: {e}")))
    }
}

/// Builder for [`RunConfig`].
///
/// # Example
///
/// ```
/// use folio::core::RunConfigBuilder;
///
/// let config = RunConfigBuilder::new("inbox", "out")
///     .expected_total(1128)
///     .prefix("FACTURA")
///     .build();
/// assert_eq!(config.expected_total, 1128);
/// ```
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Create a builder with the input and output directories.
    pub fn new(archive_directory: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            config: RunConfig {
                archive_directory: archive_directory.into(),
                output_directory: output_directory.into(),
                ..Default::default()
            },
        }
    }

    pub fn expected_total(mut self, total: i64) -> Self {
        self.config.expected_total = total;
        self
    }

    /// Set the literal archive name prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.filename_pattern.prefix = prefix.into();
        self
    }

    /// Set the archive extension (without the dot).
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.config.filename_pattern.extension = extension.into();
        self
    }

    pub fn credit_note_lines(mut self, enabled: bool) -> Self {
        self.config.credit_note_lines = enabled;
        self
    }

    pub fn build(self) -> RunConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_defaults() {
        let config = RunConfig::from_json_str(r#"{"expected_total": 1128}"#).unwrap();
        assert_eq!(config.expected_total, 1128);
        assert_eq!(config.archive_directory, PathBuf::from("archives"));
        assert_eq!(config.filename_pattern, FilenamePattern::default());
        assert!(!config.credit_note_lines);
    }

    #[test]
    fn json_nested_pattern() {
        let config = RunConfig::from_json_str(
            r#"{"filename_pattern": {"prefix": "BOLETA", "extension": "ZIP"}}"#,
        )
        .unwrap();
        assert_eq!(config.filename_pattern.prefix, "BOLETA");
        assert_eq!(config.filename_pattern.extension, "ZIP");
    }

    #[test]
    fn invalid_json_is_config_error() {
        let err = RunConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
    }

    #[test]
    fn builder_overrides() {
        let config = RunConfigBuilder::new("in", "out")
            .expected_total(10)
            .extension("7z")
            .credit_note_lines(true)
            .build();
        assert_eq!(config.output_directory, PathBuf::from("out"));
        assert_eq!(config.filename_pattern.extension, "7z");
        assert_eq!(config.filename_pattern.prefix, "FACTURA");
        assert!(config.credit_note_lines);
    }
}
