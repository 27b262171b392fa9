//! Linking full-cancellation credit notes to the invoices they void.
//!
//! Matching is exact string equality after [`normalize_document_id`]. Supplier
//! identity and dates are not compared, so two suppliers issuing the same
//! document number in one run can void each other's invoices.

use std::collections::BTreeSet;

use super::types::{DocumentHeader, InvalidationLink};

/// Response code of a credit note that cancels the whole referenced document.
pub const FULL_CANCELLATION_CODE: &str = "01";

/// Normalize a hand-typed document id: trim, uppercase, drop spaces and
/// turn en/em dashes into a plain hyphen (`"e001 – 1093"` → `"E001-1093"`).
pub fn normalize_document_id(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .flat_map(char::to_uppercase)
        .collect()
}

/// Whether a response code signals full cancellation.
pub fn is_full_cancellation_code(code: &str) -> bool {
    code.trim() == FULL_CANCELLATION_CODE
}

/// Normalized ids referenced by full-cancellation credit notes.
pub type CancellationReferences = BTreeSet<String>;

fn cancelling_credit_notes(headers: &[DocumentHeader]) -> impl Iterator<Item = &DocumentHeader> {
    headers
        .iter()
        .filter(|h| h.is_credit_note() && h.is_full_cancellation)
}

/// Collect the references of every full-cancellation credit note.
/// Empty references are skipped.
pub fn cancellation_references(headers: &[DocumentHeader]) -> CancellationReferences {
    cancelling_credit_notes(headers)
        .map(|h| normalize_document_id(&h.reference_id))
        .filter(|r| !r.is_empty())
        .collect()
}

/// One link per full-cancellation credit note, in input order.
pub fn invalidation_links(headers: &[DocumentHeader]) -> Vec<InvalidationLink> {
    cancelling_credit_notes(headers)
        .map(|h| InvalidationLink {
            credit_note_key: h.document_key(),
            referenced_invoice_number: normalize_document_id(&h.reference_id),
            cancellation_code: h.cancellation_code.clone(),
            cancellation_reason: h.cancellation_reason.clone(),
        })
        .collect()
}

/// Return the headers with `is_voided` recomputed for every invoice.
///
/// An invoice is voided iff its normalized number is in `references`. Any
/// previous value of the flag is overwritten, so applying this twice gives
/// the same result. Non-invoice headers pass through untouched.
pub fn mark_voided(
    headers: Vec<DocumentHeader>,
    references: &CancellationReferences,
) -> Vec<DocumentHeader> {
    headers
        .into_iter()
        .map(|mut h| {
            if h.is_invoice() {
                let number = normalize_document_id(&h.document_number);
                h.is_voided = !number.is_empty() && references.contains(&number);
            }
            h
        })
        .collect()
}

/// Result of linking one run of headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOutcome {
    pub headers: Vec<DocumentHeader>,
    pub links: Vec<InvalidationLink>,
}

impl LinkOutcome {
    /// Number of invoices marked voided.
    pub fn voided_count(&self) -> usize {
        self.headers
            .iter()
            .filter(|h| h.is_invoice() && h.is_voided)
            .count()
    }
}

/// Build the reference set from the complete header list and mark invoices.
pub fn link_invalidations(headers: Vec<DocumentHeader>) -> LinkOutcome {
    let references = cancellation_references(&headers);
    let links = invalidation_links(&headers);
    LinkOutcome {
        headers: mark_voided(headers, &references),
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DocumentType;

    fn invoice(number: &str) -> DocumentHeader {
        let mut h = DocumentHeader::new(DocumentType::Invoice);
        h.document_number = number.into();
        h
    }

    fn credit_note(number: &str, code: &str, reference: &str) -> DocumentHeader {
        let mut h = DocumentHeader::new(DocumentType::CreditNote);
        h.document_number = number.into();
        h.cancellation_code = code.into();
        h.is_full_cancellation = is_full_cancellation_code(code);
        h.reference_id_raw = reference.into();
        h.reference_id = normalize_document_id(reference);
        h
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_document_id(" e001 - 1093 "), "E001-1093");
        assert_eq!(normalize_document_id("E001\u{2013}1093"), "E001-1093");
        assert_eq!(normalize_document_id("E001 \u{2014} 1093"), "E001-1093");
        assert_eq!(normalize_document_id("E001-1093"), "E001-1093");
        assert_eq!(normalize_document_id("E001\t-\n1093"), "E001-1093");
        assert_eq!(normalize_document_id(""), "");
    }

    #[test]
    fn full_cancellation_voids_invoice() {
        let out = link_invalidations(vec![
            invoice("E001-1074"),
            credit_note("FC01-1", "01", "E001-1074"),
        ]);
        assert!(out.headers[0].is_voided);
        assert_eq!(out.voided_count(), 1);
        assert_eq!(out.links.len(), 1);
        assert_eq!(out.links[0].referenced_invoice_number, "E001-1074");
    }

    #[test]
    fn other_reason_codes_do_not_void() {
        let out = link_invalidations(vec![
            invoice("E001-1074"),
            credit_note("FC01-1", "02", "E001-1074"),
        ]);
        assert!(!out.headers[0].is_voided);
        assert!(out.links.is_empty());
    }

    #[test]
    fn sloppy_reference_still_matches() {
        let out = link_invalidations(vec![
            invoice("E001-1074"),
            credit_note("FC01-1", "01", "e001 \u{2013} 1074"),
        ]);
        assert!(out.headers[0].is_voided);
    }

    #[test]
    fn credit_notes_are_never_voided() {
        let out = link_invalidations(vec![
            credit_note("FC01-1", "01", "FC01-2"),
            credit_note("FC01-2", "01", "E001-5"),
        ]);
        assert!(out.headers.iter().all(|h| !h.is_voided));
    }

    #[test]
    fn empty_reference_is_ignored() {
        let refs = cancellation_references(&[credit_note("FC01-1", "01", "  ")]);
        assert!(refs.is_empty());
        let out = mark_voided(vec![invoice("")], &refs);
        assert!(!out[0].is_voided);
    }

    #[test]
    fn stale_flag_is_reset() {
        let mut stale = invoice("E001-9");
        stale.is_voided = true;
        let out = mark_voided(vec![stale], &CancellationReferences::new());
        assert!(!out[0].is_voided);
    }

    #[test]
    fn linking_twice_is_stable() {
        let headers = vec![
            invoice("E001-1074"),
            invoice("E001-1075"),
            credit_note("FC01-1", "01", "E001 - 1074"),
        ];
        let once = link_invalidations(headers);
        let twice = link_invalidations(once.headers.clone());
        assert_eq!(once, twice);
    }
}
