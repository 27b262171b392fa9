use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::{ArchiveEntry, ArchiveSource, base_name, is_document_name};
use crate::core::FolioError;

/// Bundles stored as ZIP files in one directory.
///
/// Only files whose extension matches (case-insensitively) are listed.
#[derive(Debug, Clone)]
pub struct ZipDirectory {
    directory: PathBuf,
    extension: String,
}

impl ZipDirectory {
    /// `extension` is given without the leading dot.
    pub fn new(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn has_extension(&self, name: &str) -> bool {
        let suffix = format!(".{}", self.extension.to_ascii_lowercase());
        name.to_ascii_lowercase().ends_with(&suffix)
    }
}

impl ArchiveSource for ZipDirectory {
    /// A missing directory is created and lists as empty.
    fn list(&self) -> Result<Vec<String>, FolioError> {
        std::fs::create_dir_all(&self.directory)?;
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.has_extension(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn open(&self, name: &str) -> Result<Vec<ArchiveEntry>, FolioError> {
        let path = self.directory.join(name);
        let file = File::open(&path)
            .map_err(|e| FolioError::Archive(format!("cannot open {}: {e}", path.display())))?;
        read_zip_documents(file)
    }
}

const MAX_PREALLOCATION: u64 = 1 << 20;

/// Read every XML entry of a ZIP archive, in archive order.
pub fn read_zip_documents<R: Read + Seek>(reader: R) -> Result<Vec<ArchiveEntry>, FolioError> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| FolioError::Archive(e.to_string()))?;

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| FolioError::Archive(e.to_string()))?;
        if file.is_dir() || !is_document_name(file.name()) {
            continue;
        }
        let name = base_name(file.name()).to_string();
        // the declared size is untrusted
        let mut bytes = Vec::with_capacity(file.size().min(MAX_PREALLOCATION) as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| FolioError::Archive(format!("cannot read {name}: {e}")))?;
        entries.push(ArchiveEntry { name, bytes });
    }
    Ok(entries)
}
