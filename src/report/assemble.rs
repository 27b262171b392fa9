use serde::Serialize;

use crate::core::*;

/// A row type with a fixed column order.
///
/// `HEADERS` lists the column names in the order the row serializes its
/// fields, so a table can carry a header line even when it has no rows.
pub trait ReportRow: Serialize {
    const HEADERS: &'static [&'static str];
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlSummaryRow {
    pub series: String,
    pub identity: String,
    pub total_archives: usize,
    pub valid_archives: usize,
    pub unparseable: usize,
    pub min_number: Option<u64>,
    pub max_number: Option<u64>,
    pub unique_count: usize,
    pub duplicate_count: usize,
    pub missing_in_range: usize,
    pub expected_total: i64,
    pub expected_minus_unique: i64,
}

impl ReportRow for ControlSummaryRow {
    const HEADERS: &'static [&'static str] = &[
        "Series",
        "Identity",
        "TotalArchives",
        "ValidArchives",
        "Unparseable",
        "MinNumber",
        "MaxNumber",
        "UniqueCount",
        "DuplicateCount",
        "MissingInRange",
        "ExpectedTotal",
        "ExpectedMinusUnique",
    ];
}

impl From<&SequenceSummary> for ControlSummaryRow {
    fn from(s: &SequenceSummary) -> Self {
        Self {
            series: s.series.clone(),
            identity: s.identity.clone(),
            total_archives: s.total_archives,
            valid_archives: s.valid_archives,
            unparseable: s.unparseable,
            min_number: s.min_number,
            max_number: s.max_number,
            unique_count: s.unique_count,
            duplicate_count: s.duplicate_count,
            missing_in_range: s.missing_count,
            expected_total: s.expected_total,
            expected_minus_unique: s.expected_minus_unique,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MissingRow {
    pub series: String,
    pub identity: String,
    pub missing_number: u64,
}

impl ReportRow for MissingRow {
    const HEADERS: &'static [&'static str] = &["Series", "Identity", "MissingNumber"];
}

impl From<&MissingEntry> for MissingRow {
    fn from(m: &MissingEntry) -> Self {
        Self {
            series: m.series.clone(),
            identity: m.identity.clone(),
            missing_number: m.number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DuplicateRow {
    pub series: String,
    pub identity: String,
    pub number: Option<u64>,
    pub source_name: String,
    pub kind: &'static str,
}

impl ReportRow for DuplicateRow {
    const HEADERS: &'static [&'static str] = &["Series", "Identity", "Number", "SourceName", "Kind"];
}

impl From<&DuplicateEntry> for DuplicateRow {
    fn from(d: &DuplicateEntry) -> Self {
        Self {
            series: d.series.clone(),
            identity: d.identity.clone(),
            number: d.number,
            source_name: d.source_name.clone(),
            kind: d.kind.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvalidationDetailRow {
    pub source_name: String,
    pub document_file: String,
    pub credit_note_number: String,
    pub credit_note_date: String,
    /// Reference as written on the credit note; the normalized form is in
    /// the documents table.
    pub referenced_invoice_number: String,
    pub cancellation_code: String,
    pub cancellation_reason: String,
    pub supplier_identity: String,
    pub customer_identity: String,
    pub total: String,
    pub currency: String,
}

impl ReportRow for InvalidationDetailRow {
    const HEADERS: &'static [&'static str] = &[
        "SourceName",
        "DocumentFile",
        "CreditNoteNumber",
        "CreditNoteDate",
        "ReferencedInvoiceNumber",
        "CancellationCode",
        "CancellationReason",
        "SupplierIdentity",
        "CustomerIdentity",
        "Total",
        "Currency",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentRow {
    pub document_key: String,
    pub source_archive: String,
    pub document_file: String,
    pub document_type: String,
    pub document_number: String,
    pub issue_date: String,
    pub issue_time: String,
    pub currency: String,
    pub supplier_identity: String,
    pub supplier_name: String,
    pub customer_identity: String,
    pub customer_name: String,
    pub payment_means: String,
    pub taxable_amount: String,
    pub tax_amount: String,
    pub subtotal: String,
    pub total: String,
    pub reference_id: String,
    pub reference_id_normalized: String,
    pub cancellation_code: String,
    pub cancellation_reason: String,
    pub is_full_cancellation: &'static str,
    pub is_voided: &'static str,
}

impl ReportRow for DocumentRow {
    const HEADERS: &'static [&'static str] = &[
        "DocumentKey",
        "SourceArchive",
        "DocumentFile",
        "DocumentType",
        "DocumentNumber",
        "IssueDate",
        "IssueTime",
        "Currency",
        "SupplierIdentity",
        "SupplierName",
        "CustomerIdentity",
        "CustomerName",
        "PaymentMeans",
        "TaxableAmount",
        "TaxAmount",
        "Subtotal",
        "Total",
        "ReferenceId",
        "ReferenceIdNormalized",
        "CancellationCode",
        "CancellationReason",
        "IsFullCancellation",
        "IsVoided",
    ];
}

impl From<&DocumentHeader> for DocumentRow {
    fn from(h: &DocumentHeader) -> Self {
        Self {
            document_key: h.document_key(),
            source_archive: h.source_archive.clone(),
            document_file: h.document_file.clone(),
            document_type: h.document_type.to_string(),
            document_number: h.document_number.clone(),
            issue_date: h.issue_date.clone(),
            issue_time: h.issue_time.clone(),
            currency: h.currency.clone(),
            supplier_identity: h.supplier_identity.clone(),
            supplier_name: h.supplier_name.clone(),
            customer_identity: h.customer_identity.clone(),
            customer_name: h.customer_name.clone(),
            payment_means: h.payment_means.clone(),
            taxable_amount: h.taxable_amount.clone(),
            tax_amount: h.tax_amount.clone(),
            subtotal: h.subtotal.clone(),
            total: h.total.clone(),
            reference_id: h.reference_id_raw.clone(),
            reference_id_normalized: h.reference_id.clone(),
            cancellation_code: h.cancellation_code.clone(),
            cancellation_reason: h.cancellation_reason.clone(),
            is_full_cancellation: yes_no(h.is_full_cancellation),
            is_voided: yes_no(h.is_voided),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItemRow {
    pub document_key: String,
    pub document_type: String,
    pub document_number: String,
    pub issue_date: String,
    pub line_id: String,
    pub description: String,
    pub quantity: String,
    pub unit: String,
    pub unit_price: String,
    pub line_amount: String,
    pub line_tax: String,
    pub customer_identity: String,
    pub customer_name: String,
}

impl ReportRow for LineItemRow {
    const HEADERS: &'static [&'static str] = &[
        "DocumentKey",
        "DocumentType",
        "DocumentNumber",
        "IssueDate",
        "LineId",
        "Description",
        "Quantity",
        "Unit",
        "UnitPrice",
        "LineAmount",
        "LineTax",
        "CustomerIdentity",
        "CustomerName",
    ];
}

impl LineItemRow {
    fn new(header: &DocumentHeader, line: &LineItem) -> Self {
        Self {
            document_key: header.document_key(),
            document_type: header.document_type.to_string(),
            document_number: header.document_number.clone(),
            issue_date: header.issue_date.clone(),
            line_id: line.line_id.clone(),
            description: line.description.clone(),
            quantity: line.quantity.clone(),
            unit: line.unit.clone(),
            unit_price: line.unit_price.clone(),
            line_amount: line.line_amount.clone(),
            line_tax: line.line_tax.clone(),
            customer_identity: header.customer_identity.clone(),
            customer_name: header.customer_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorRow {
    pub source_archive: String,
    pub document_file: String,
    pub error_message: String,
}

impl ReportRow for ErrorRow {
    const HEADERS: &'static [&'static str] = &["SourceArchive", "DocumentFile", "ErrorMessage"];
}

impl From<&ErrorRecord> for ErrorRow {
    fn from(e: &ErrorRecord) -> Self {
        Self {
            source_archive: e.source_archive.clone(),
            document_file: e.document_file.clone(),
            error_message: e.message.clone(),
        }
    }
}

/// All report tables of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSet {
    pub control_summary: Vec<ControlSummaryRow>,
    pub missing: Vec<MissingRow>,
    pub duplicates: Vec<DuplicateRow>,
    pub invalidations: Vec<InvalidationDetailRow>,
    pub documents: Vec<DocumentRow>,
    pub line_items: Vec<LineItemRow>,
    pub errors: Vec<ErrorRow>,
}

/// Project one run into report rows.
///
/// `documents` must already have gone through the invalidation linker; this
/// only reshapes data.
pub fn assemble(
    reconciliation: &Reconciliation,
    documents: &[ExtractedDocument],
    errors: &[ErrorRecord],
) -> ReportSet {
    let headers = || documents.iter().map(|d| &d.header);

    ReportSet {
        control_summary: reconciliation.summaries.iter().map(Into::into).collect(),
        missing: reconciliation.missing.iter().map(Into::into).collect(),
        duplicates: reconciliation.duplicates.iter().map(Into::into).collect(),
        invalidations: headers()
            .filter(|h| h.is_credit_note() && h.is_full_cancellation)
            .map(|h| InvalidationDetailRow {
                source_name: h.source_archive.clone(),
                document_file: h.document_file.clone(),
                credit_note_number: h.document_number.clone(),
                credit_note_date: h.issue_date.clone(),
                referenced_invoice_number: h.reference_id_raw.clone(),
                cancellation_code: h.cancellation_code.clone(),
                cancellation_reason: h.cancellation_reason.clone(),
                supplier_identity: h.supplier_identity.clone(),
                customer_identity: h.customer_identity.clone(),
                total: h.total.clone(),
                currency: h.currency.clone(),
            })
            .collect(),
        documents: headers().map(Into::into).collect(),
        line_items: documents
            .iter()
            .flat_map(|d| d.lines.iter().map(|l| LineItemRow::new(&d.header, l)))
            .collect(),
        errors: errors.iter().map(Into::into).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(kind: DocumentType, number: &str) -> DocumentHeader {
        let mut h = DocumentHeader::new(kind);
        h.document_number = number.into();
        h.supplier_identity = "20501234567".into();
        h.issue_date = "2024-05-02".into();
        h
    }

    #[test]
    fn documents_and_lines_are_projected() {
        let mut inv = header(DocumentType::Invoice, "E001-1");
        inv.is_voided = true;
        let docs = vec![ExtractedDocument {
            header: inv,
            lines: vec![
                LineItem {
                    line_id: "1".into(),
                    ..Default::default()
                },
                LineItem {
                    line_id: "2".into(),
                    ..Default::default()
                },
            ],
        }];
        let set = assemble(&Reconciliation::default(), &docs, &[]);
        assert_eq!(set.documents.len(), 1);
        assert_eq!(set.documents[0].is_voided, "YES");
        assert_eq!(set.documents[0].is_full_cancellation, "NO");
        assert_eq!(set.documents[0].document_type, "Invoice");
        assert_eq!(set.line_items.len(), 2);
        assert_eq!(
            set.line_items[1].document_key,
            "20501234567-Invoice-E001-1-2024-05-02"
        );
        assert!(set.invalidations.is_empty());
    }

    #[test]
    fn only_full_cancellations_become_invalidation_rows() {
        let mut full = header(DocumentType::CreditNote, "FC01-1");
        full.is_full_cancellation = true;
        full.cancellation_code = "01".into();
        full.reference_id_raw = "e001 - 1".into();
        full.reference_id = "E001-1".into();
        full.source_archive = "NC.zip".into();
        let mut partial = header(DocumentType::CreditNote, "FC01-2");
        partial.cancellation_code = "07".into();
        let docs: Vec<_> = [full, partial]
            .into_iter()
            .map(|header| ExtractedDocument {
                header,
                lines: vec![],
            })
            .collect();
        let set = assemble(&Reconciliation::default(), &docs, &[]);
        assert_eq!(set.invalidations.len(), 1);
        let row = &set.invalidations[0];
        assert_eq!(row.source_name, "NC.zip");
        assert_eq!(row.credit_note_number, "FC01-1");
        assert_eq!(row.referenced_invoice_number, "e001 - 1");
    }

    #[test]
    fn reconciliation_and_errors_are_projected() {
        let r = reconcile(&[decode_archive_name("x")], 5);
        let set = assemble(&r, &[], &[ErrorRecord::archive("x", "archive contained no document")]);
        assert_eq!(set.control_summary.len(), 1);
        assert_eq!(set.control_summary[0].unparseable, 1);
        assert_eq!(set.control_summary[0].min_number, None);
        assert_eq!(set.duplicates[0].kind, "UNPARSEABLE");
        assert_eq!(set.errors[0].document_file, "");
    }

    #[test]
    fn header_constants_match_columns() {
        assert_eq!(ControlSummaryRow::HEADERS.len(), 12);
        assert_eq!(MissingRow::HEADERS.len(), 3);
        assert_eq!(DuplicateRow::HEADERS.len(), 5);
        assert_eq!(InvalidationDetailRow::HEADERS.len(), 11);
        assert_eq!(DocumentRow::HEADERS.len(), 23);
        assert_eq!(LineItemRow::HEADERS.len(), 13);
        assert_eq!(ErrorRow::HEADERS.len(), 3);
    }
}
