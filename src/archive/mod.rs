//! Reading document bundles.
//!
//! A bundle is identified by name and yields the structured documents it
//! contains. [`ZipDirectory`] serves bundles from a directory of ZIP files;
//! tests and other callers can plug in their own [`ArchiveSource`].

mod zip_dir;

pub use zip_dir::{ZipDirectory, read_zip_documents};

use crate::core::FolioError;

/// One document payload taken out of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// File name of the entry, without directories.
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A provider of named bundles.
pub trait ArchiveSource {
    /// Names of every bundle in the source, sorted ascending.
    fn list(&self) -> Result<Vec<String>, FolioError>;

    /// Document entries of one bundle in archive order. An empty vector means
    /// the bundle holds no document.
    fn open(&self, name: &str) -> Result<Vec<ArchiveEntry>, FolioError>;
}

/// Whether an entry path names an XML document (case-insensitive).
pub(crate) fn is_document_name(path: &str) -> bool {
    path.to_ascii_lowercase().ends_with(".xml")
}

/// The last path component of an entry name.
pub(crate) fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
