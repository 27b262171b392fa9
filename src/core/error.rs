use thiserror::Error;

/// Errors that can occur while reading bundles, extracting documents or
/// writing reports.
///
/// Malformed archive names and missing optional fields are never errors:
/// the first is a classified outcome of the decoder, the second defaults
/// to an empty string.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FolioError {
    /// The archive could not be opened or one of its entries could not be read.
    #[error("archive error: {0}")]
    Archive(String),

    /// The document payload is not well-formed structured data.
    #[error("XML error: {0}")]
    Xml(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A report table could not be written.
    #[error("report error: {0}")]
    Report(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A failure contained at one unit of work (an archive or a document inside it).
///
/// These never abort a run; they are exported as rows of the error table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Name of the archive the failure belongs to.
    pub source_archive: String,
    /// Document file inside the archive, empty for archive-level failures.
    pub document_file: String,
    /// Human-readable cause.
    pub message: String,
}

impl ErrorRecord {
    /// An archive-level failure (no document file).
    pub fn archive(source_archive: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_archive: source_archive.into(),
            document_file: String::new(),
            message: message.into(),
        }
    }

    /// A failure of a single document inside an archive.
    pub fn document(
        source_archive: impl Into<String>,
        document_file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_archive: source_archive.into(),
            document_file: document_file.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.document_file.is_empty() {
            write!(f, "{}: {}", self.source_archive, self.message)
        } else {
            write!(
                f,
                "{}/{}: {}",
                self.source_archive, self.document_file, self.message
            )
        }
    }
}
