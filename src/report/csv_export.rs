//! CSV output of a [`ReportSet`].
//!
//! Files are UTF-8, comma separated, with a header line even when a table is
//! empty. Absent numbers are written as empty fields.

use std::path::{Path, PathBuf};

use super::assemble::{ReportRow, ReportSet};
use crate::core::FolioError;

/// Paths of the files written by [`write_csv_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub control_summary: PathBuf,
    pub missing: PathBuf,
    pub duplicates: PathBuf,
    pub invalidations: PathBuf,
    pub documents: PathBuf,
    pub line_items: PathBuf,
    pub errors: PathBuf,
}

impl ReportPaths {
    fn in_dir(dir: &Path) -> Self {
        Self {
            control_summary: dir.join("control_summary.csv"),
            missing: dir.join("missing.csv"),
            duplicates: dir.join("duplicates.csv"),
            invalidations: dir.join("invalidations.csv"),
            documents: dir.join("documents.csv"),
            line_items: dir.join("line_items.csv"),
            errors: dir.join("errors.csv"),
        }
    }
}

/// Write every table of `reports` into `dir`, creating it if needed.
pub fn write_csv_reports(reports: &ReportSet, dir: &Path) -> Result<ReportPaths, FolioError> {
    std::fs::create_dir_all(dir)?;
    let paths = ReportPaths::in_dir(dir);

    write_table(&paths.control_summary, &reports.control_summary)?;
    write_table(&paths.missing, &reports.missing)?;
    write_table(&paths.duplicates, &reports.duplicates)?;
    write_table(&paths.invalidations, &reports.invalidations)?;
    write_table(&paths.documents, &reports.documents)?;
    write_table(&paths.line_items, &reports.line_items)?;
    write_table(&paths.errors, &reports.errors)?;

    Ok(paths)
}

fn write_table<R: ReportRow>(path: &Path, rows: &[R]) -> Result<(), FolioError> {
    let report_err = |e: csv::Error| FolioError::Report(format!("{}: {e}", path.display()));

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(report_err)?;
    writer.write_record(R::HEADERS).map_err(report_err)?;
    for row in rows {
        writer.serialize(row).map_err(report_err)?;
    }
    writer.flush()?;
    Ok(())
}
