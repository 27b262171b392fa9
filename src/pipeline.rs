//! One reconciliation run: list bundles, reconcile their names, extract every
//! document, link cancellations and assemble the report tables.
//!
//! Failures of a single bundle or document are recorded as error rows and the
//! run carries on. The linker only runs once every bundle has been processed.

use tracing::{debug, info, warn};

use crate::archive::{ArchiveSource, ZipDirectory};
use crate::core::*;
use crate::report::{ReportPaths, ReportSet, assemble, write_csv_reports};
use crate::ubl::{ExtractOptions, extract_document_bytes};

/// Everything a run produced, before or after writing.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Archive names seen in the run.
    pub archives: Vec<String>,
    pub reconciliation: Reconciliation,
    /// Extracted documents with `is_voided` already resolved.
    pub documents: Vec<ExtractedDocument>,
    pub links: Vec<InvalidationLink>,
    pub errors: Vec<ErrorRecord>,
    pub reports: ReportSet,
}

impl RunOutcome {
    /// Invoices voided by a full-cancellation credit note.
    pub fn voided_invoices(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.header.is_invoice() && d.header.is_voided)
            .count()
    }
}

/// Process every bundle of `source` in memory.
pub fn process<S: ArchiveSource>(source: &S, config: &RunConfig) -> Result<RunOutcome, FolioError> {
    let archives = source.list()?;
    info!(archives = archives.len(), "starting run");

    let decoder = FilenameDecoder::new(&config.filename_pattern)?;
    let decoded = decoder.decode_all(&archives);
    let reconciliation = reconcile(&decoded, config.expected_total);
    for s in &reconciliation.summaries {
        debug!(
            series = %s.series,
            unique = s.unique_count,
            missing = s.missing_count,
            duplicates = s.duplicate_count,
            "series reconciled"
        );
    }

    let options = ExtractOptions {
        credit_note_lines: config.credit_note_lines,
    };
    let mut documents = Vec::new();
    let mut errors = Vec::new();
    for archive in &archives {
        extract_archive(source, archive, &options, &mut documents, &mut errors);
    }

    let (headers, lines): (Vec<_>, Vec<_>) =
        documents.into_iter().map(|d| (d.header, d.lines)).unzip();
    let linked = link_invalidations(headers);
    info!(
        documents = linked.headers.len(),
        cancellations = linked.links.len(),
        voided = linked.voided_count(),
        errors = errors.len(),
        "documents linked"
    );

    let documents: Vec<ExtractedDocument> = linked
        .headers
        .into_iter()
        .zip(lines)
        .map(|(header, lines)| ExtractedDocument { header, lines })
        .collect();
    let reports = assemble(&reconciliation, &documents, &errors);

    Ok(RunOutcome {
        archives,
        reconciliation,
        documents,
        links: linked.links,
        errors,
        reports,
    })
}

fn extract_archive<S: ArchiveSource>(
    source: &S,
    archive: &str,
    options: &ExtractOptions,
    documents: &mut Vec<ExtractedDocument>,
    errors: &mut Vec<ErrorRecord>,
) {
    let entries = match source.open(archive) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(archive, error = %e, "cannot extract archive");
            errors.push(ErrorRecord::archive(
                archive,
                format!("could not extract archive: {e}"),
            ));
            return;
        }
    };

    if entries.is_empty() {
        warn!(archive, "archive contained no document");
        errors.push(ErrorRecord::archive(archive, "archive contained no document"));
        return;
    }

    for entry in entries {
        match extract_document_bytes(&entry.bytes, options) {
            Ok(doc) => documents.push(doc.with_source(archive, &entry.name)),
            Err(e) => {
                warn!(archive, document = %entry.name, error = %e, "cannot extract document");
                errors.push(ErrorRecord::document(archive, &entry.name, e.to_string()));
            }
        }
    }
}

/// Run over the configured archive directory and write the reports to the
/// configured output directory.
pub fn run(config: &RunConfig) -> Result<(RunOutcome, ReportPaths), FolioError> {
    let source = ZipDirectory::new(
        &config.archive_directory,
        &config.filename_pattern.extension,
    );
    let outcome = process(&source, config)?;
    let paths = write_csv_reports(&outcome.reports, &config.output_directory)?;
    info!(output = %config.output_directory.display(), "reports written");
    Ok((outcome, paths))
}
