use serde::{Deserialize, Serialize};

/// Series, number and issuer identity decoded from one archive name.
///
/// Uniqueness is not assumed: the same key may appear in several archives,
/// which the reconciler reports as duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchiveKey {
    /// One letter plus three digits, uppercased (e.g. "E001").
    pub series: String,
    /// Issued sequence number; leading zeros in the name are insignificant.
    pub number: u64,
    /// 11-digit tax-registration code of the issuer.
    pub identity: String,
    /// The archive name the key was decoded from.
    pub source_name: String,
}

/// Result of decoding one archive name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedName {
    /// The name follows the naming grammar.
    Parsed(ArchiveKey),
    /// The name does not follow the grammar; carries the original name.
    Unparseable(String),
}

impl DecodedName {
    /// The decoded key, if the name was parseable.
    pub fn key(&self) -> Option<&ArchiveKey> {
        match self {
            Self::Parsed(key) => Some(key),
            Self::Unparseable(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// Per-series control figures for one run.
///
/// In the degenerate case (no parseable names at all) a single summary is
/// produced with empty series/identity and no range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub series: String,
    /// Identity of the series; a comma-joined sorted list when several
    /// identities share the series.
    pub identity: String,
    /// All archive names in the run, parseable or not.
    pub total_archives: usize,
    /// Parseable archive names belonging to this series.
    pub valid_archives: usize,
    /// Unparseable names in the whole run.
    pub unparseable: usize,
    pub min_number: Option<u64>,
    pub max_number: Option<u64>,
    pub unique_count: usize,
    /// Sum of `occurrences - 1` over every repeated `(series, identity, number)`.
    pub duplicate_count: usize,
    pub missing_count: usize,
    pub expected_total: i64,
    pub expected_minus_unique: i64,
}

/// Why an archive name shows up in the duplicate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicateKind {
    /// One occurrence of a repeated `(series, identity, number)`.
    Duplicate,
    /// The name did not follow the naming grammar.
    Unparseable,
}

impl DuplicateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Duplicate => "DUPLICATE",
            Self::Unparseable => "UNPARSEABLE",
        }
    }
}

impl std::fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    /// Empty for unparseable names.
    pub series: String,
    /// Empty for unparseable names.
    pub identity: String,
    /// `None` for unparseable names.
    pub number: Option<u64>,
    pub source_name: String,
    pub kind: DuplicateKind,
}

/// A number inside `[min, max]` of a series that no archive carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub series: String,
    pub identity: String,
    pub number: u64,
}

/// Document type, taken from the root element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Invoice,
    CreditNote,
    /// Any other root element (e.g. "DebitNote"); keeps the element name.
    Other(String),
}

impl DocumentType {
    /// Classify a root element local name.
    pub fn from_root(local_name: &str) -> Self {
        match local_name {
            "Invoice" => Self::Invoice,
            "CreditNote" => Self::CreditNote,
            other => Self::Other(other.to_string()),
        }
    }

    /// The root element name this type was read from.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Invoice => "Invoice",
            Self::CreditNote => "CreditNote",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header of one extracted document.
///
/// Every text field defaults to an empty string when the document does not
/// carry it. `is_voided` is only ever changed by [`mark_voided`](crate::core::mark_voided).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub document_type: DocumentType,
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

    /// Referenced document as written in the credit note.
    pub reference_id_raw: String,
    /// `reference_id_raw` after [`normalize_document_id`](crate::core::normalize_document_id).
    pub reference_id: String,
    pub cancellation_code: String,
    pub cancellation_reason: String,
    pub is_full_cancellation: bool,
    pub is_voided: bool,

    /// Archive the document was read from.
    pub source_archive: String,
    /// File name of the document inside its archive.
    pub document_file: String,
}

impl DocumentHeader {
    /// Empty header of the given type.
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            document_number: String::new(),
            issue_date: String::new(),
            issue_time: String::new(),
            currency: String::new(),
            supplier_identity: String::new(),
            supplier_name: String::new(),
            customer_identity: String::new(),
            customer_name: String::new(),
            payment_means: String::new(),
            taxable_amount: String::new(),
            tax_amount: String::new(),
            subtotal: String::new(),
            total: String::new(),
            reference_id_raw: String::new(),
            reference_id: String::new(),
            cancellation_code: String::new(),
            cancellation_reason: String::new(),
            is_full_cancellation: false,
            is_voided: false,
            source_archive: String::new(),
            document_file: String::new(),
        }
    }

    /// Composite key `supplier-type-number-date`, unique within one run.
    pub fn document_key(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.supplier_identity, self.document_type, self.document_number, self.issue_date
        )
    }

    pub fn is_invoice(&self) -> bool {
        self.document_type == DocumentType::Invoice
    }

    pub fn is_credit_note(&self) -> bool {
        self.document_type == DocumentType::CreditNote
    }
}

/// One line of a document. Owned by its [`ExtractedDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub line_id: String,
    pub description: String,
    pub quantity: String,
    /// `unitCode` attribute of the quantity element.
    pub unit: String,
    pub unit_price: String,
    pub line_amount: String,
    pub line_tax: String,
}

/// A document header together with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub header: DocumentHeader,
    pub lines: Vec<LineItem>,
}

impl ExtractedDocument {
    /// Attach the archive and file the document was read from.
    pub fn with_source(
        mut self,
        source_archive: impl Into<String>,
        document_file: impl Into<String>,
    ) -> Self {
        self.header.source_archive = source_archive.into();
        self.header.document_file = document_file.into();
        self
    }
}

/// A full-cancellation credit note and the document it voids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationLink {
    pub credit_note_key: String,
    /// Normalized reference id.
    pub referenced_invoice_number: String,
    pub cancellation_code: String,
    pub cancellation_reason: String,
}
