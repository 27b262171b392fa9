use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::core::*;

/// Options for [`extract_document_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Also collect `CreditNoteLine` items of credit notes.
    pub credit_note_lines: bool,
}

/// Extract header and line items from a UBL document with default options.
pub fn extract_document(xml: &str) -> Result<ExtractedDocument, FolioError> {
    extract_document_with(xml, &ExtractOptions::default())
}

/// Extract from raw bytes. The payload must be UTF-8; a leading BOM is ignored.
pub fn extract_document_bytes(
    bytes: &[u8],
    options: &ExtractOptions,
) -> Result<ExtractedDocument, FolioError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| FolioError::Xml(format!("document is not valid UTF-8: {e}")))?;
    extract_document_with(text.trim_start_matches('\u{feff}'), options)
}

/// Extract header and line items from a UBL document.
///
/// The document type comes from the root element. Every field that is not
/// present is left empty; only malformed XML is an error.
pub fn extract_document_with(
    xml: &str,
    options: &ExtractOptions,
) -> Result<ExtractedDocument, FolioError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = ParsedDocument::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut root_closed = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if root_closed {
                    return Err(FolioError::Xml("multiple root elements".into()));
                }
                let name = local_name(e);
                doc.handle_start(&path, &name, e);
                path.push(name);
                text.clear();
            }
            Ok(Event::Empty(ref e)) => {
                if root_closed {
                    return Err(FolioError::Xml("multiple root elements".into()));
                }
                let name = local_name(e);
                doc.handle_start(&path, &name, e);
                path.push(name);
                doc.handle_end(&path, "");
                path.pop();
                root_closed = path.is_empty();
            }
            Ok(Event::Text(ref e)) => {
                let unescaped = e
                    .unescape()
                    .map_err(|e| FolioError::Xml(format!("invalid text content: {e}")))?;
                if path.is_empty() && !is_blank(&unescaped) {
                    return Err(FolioError::Xml("text outside the root element".into()));
                }
                text.push_str(&unescaped);
            }
            Ok(Event::CData(ref e)) => {
                text.push_str(&String::from_utf8_lossy(e));
            }
            Ok(Event::End(_)) => {
                doc.handle_end(&path, text.trim());
                text.clear();
                path.pop();
                root_closed = path.is_empty();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FolioError::Xml(format!(
                    "XML parse error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    if let Some(open) = path.last() {
        return Err(FolioError::Xml(format!(
            "unexpected end of document inside <{open}>"
        )));
    }

    doc.into_document(options)
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == '\u{feff}')
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

// ---------------------------------------------------------------------------
// Parsing state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ParsedDocument {
    root: Option<String>,

    number: Option<String>,
    issue_date: Option<String>,
    issue_time: Option<String>,
    currency: Option<String>,

    supplier_id: Option<String>,
    supplier_registration_name: Option<String>,
    supplier_party_name: Option<String>,
    customer_id: Option<String>,
    customer_registration_name: Option<String>,
    customer_party_name: Option<String>,
    payment_means: Option<String>,

    taxable_amount: Option<String>,
    tax_amount: Option<String>,
    subtotal: Option<String>,
    total: Option<String>,

    // Only the first DiscrepancyResponse block counts
    discrepancy_done: bool,
    discrepancy_reference: Option<String>,
    discrepancy_code: Option<String>,
    discrepancy_description: Option<String>,
    billing_reference: Option<String>,

    lines: Vec<LineItem>,
    current_line: Option<ParsedLine>,
}

#[derive(Default)]
struct ParsedLine {
    id: Option<String>,
    quantity: Option<String>,
    unit: Option<String>,
    description: Option<String>,
    unit_price: Option<String>,
    line_amount: Option<String>,
    line_tax: Option<String>,
}

/// Keep the first non-empty value seen for a field.
fn set_once(slot: &mut Option<String>, text: &str) {
    if slot.is_none() && !text.is_empty() {
        *slot = Some(text.to_string());
    }
}

fn is_line_element(name: &str) -> bool {
    name == "InvoiceLine" || name == "CreditNoteLine"
}

impl ParsedDocument {
    fn handle_start(&mut self, path: &[String], name: &str, e: &BytesStart<'_>) {
        if path.is_empty() {
            self.root = Some(name.to_string());
            return;
        }

        // Lines are direct children of the root
        if path.len() == 1 && is_line_element(name) {
            self.current_line = Some(ParsedLine::default());
            return;
        }

        if name == "InvoicedQuantity" || name == "CreditedQuantity" {
            if let Some(line) = self.current_line.as_mut() {
                for attr in e.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"unitCode" {
                        line.unit = Some(String::from_utf8_lossy(&attr.value).into_owned());
                    }
                }
            }
        }
    }

    fn handle_end(&mut self, path: &[String], text: &str) {
        let leaf = path.last().map(|s| s.as_str()).unwrap_or("");
        let parent = if path.len() >= 2 {
            path[path.len() - 2].as_str()
        } else {
            ""
        };
        let grandparent = if path.len() >= 3 {
            path[path.len() - 3].as_str()
        } else {
            ""
        };
        let within = |name: &str| path.iter().any(|p| p == name);

        if path.len() == 2 && is_line_element(leaf) {
            if let Some(line) = self.current_line.take() {
                self.lines.push(line.into_item());
            }
            return;
        }

        if path.len() == 2 && leaf == "DiscrepancyResponse" {
            self.discrepancy_done = true;
            return;
        }

        if within("InvoiceLine") || within("CreditNoteLine") {
            if let Some(line) = self.current_line.as_mut() {
                line.handle_text(path, leaf, parent, text);
            }
            return;
        }

        // Document-level fields: direct children of the root
        if path.len() == 2 {
            match leaf {
                "ID" => set_once(&mut self.number, text),
                "IssueDate" => set_once(&mut self.issue_date, text),
                "IssueTime" => set_once(&mut self.issue_time, text),
                "DocumentCurrencyCode" => set_once(&mut self.currency, text),
                _ => {}
            }
            return;
        }

        if within("AccountingSupplierParty") {
            match (leaf, parent) {
                ("ID", "PartyIdentification") => set_once(&mut self.supplier_id, text),
                ("RegistrationName", "PartyLegalEntity") => {
                    set_once(&mut self.supplier_registration_name, text)
                }
                ("Name", "PartyName") => set_once(&mut self.supplier_party_name, text),
                _ => {}
            }
            return;
        }

        if within("AccountingCustomerParty") {
            match (leaf, parent) {
                ("ID", "PartyIdentification") => set_once(&mut self.customer_id, text),
                ("RegistrationName", "PartyLegalEntity") => {
                    set_once(&mut self.customer_registration_name, text)
                }
                ("Name", "PartyName") => set_once(&mut self.customer_party_name, text),
                _ => {}
            }
            return;
        }

        if within("DiscrepancyResponse") {
            if !self.discrepancy_done {
                match leaf {
                    "ReferenceID" => set_once(&mut self.discrepancy_reference, text),
                    "ResponseCode" => set_once(&mut self.discrepancy_code, text),
                    "Description" => set_once(&mut self.discrepancy_description, text),
                    _ => {}
                }
            }
            return;
        }

        if within("BillingReference") && leaf == "ID" && parent == "InvoiceDocumentReference" {
            set_once(&mut self.billing_reference, text);
            return;
        }

        match (leaf, parent, grandparent) {
            ("PaymentMeansID", "PaymentTerms", _) => set_once(&mut self.payment_means, text),
            ("TaxAmount", "TaxTotal", _) => set_once(&mut self.tax_amount, text),
            ("TaxableAmount", "TaxSubtotal", "TaxTotal") => {
                set_once(&mut self.taxable_amount, text)
            }
            ("LineExtensionAmount", "LegalMonetaryTotal" | "RequestedMonetaryTotal", _) => {
                set_once(&mut self.subtotal, text)
            }
            ("PayableAmount", "LegalMonetaryTotal" | "RequestedMonetaryTotal", _) => {
                set_once(&mut self.total, text)
            }
            _ => {}
        }
    }

    fn into_document(self, options: &ExtractOptions) -> Result<ExtractedDocument, FolioError> {
        let root = self
            .root
            .ok_or_else(|| FolioError::Xml("document has no root element".into()))?;
        let document_type = DocumentType::from_root(&root);

        let mut header = DocumentHeader::new(document_type);
        header.document_number = self.number.unwrap_or_default();
        header.issue_date = self.issue_date.unwrap_or_default();
        header.issue_time = self.issue_time.unwrap_or_default();
        header.currency = self.currency.unwrap_or_default();
        header.supplier_identity = self.supplier_id.unwrap_or_default();
        header.supplier_name = self
            .supplier_registration_name
            .or(self.supplier_party_name)
            .unwrap_or_default();
        header.customer_identity = self.customer_id.unwrap_or_default();
        header.customer_name = self
            .customer_registration_name
            .or(self.customer_party_name)
            .unwrap_or_default();
        header.payment_means = self.payment_means.unwrap_or_default();
        header.taxable_amount = self.taxable_amount.unwrap_or_default();
        header.tax_amount = self.tax_amount.unwrap_or_default();
        header.subtotal = self.subtotal.unwrap_or_default();
        header.total = self.total.unwrap_or_default();

        if header.is_credit_note() {
            header.reference_id_raw = self
                .discrepancy_reference
                .or(self.billing_reference)
                .unwrap_or_default();
            header.reference_id = normalize_document_id(&header.reference_id_raw);
            header.cancellation_code = self.discrepancy_code.unwrap_or_default();
            header.cancellation_reason = self.discrepancy_description.unwrap_or_default();
            header.is_full_cancellation = is_full_cancellation_code(&header.cancellation_code);
        }

        let keep_lines = header.is_invoice() || (header.is_credit_note() && options.credit_note_lines);
        let lines = if keep_lines { self.lines } else { Vec::new() };

        Ok(ExtractedDocument { header, lines })
    }
}

impl ParsedLine {
    fn handle_text(&mut self, path: &[String], leaf: &str, parent: &str, text: &str) {
        let direct = path.len() == 3;
        let within = |name: &str| path.iter().any(|p| p == name);
        match leaf {
            "ID" if direct => set_once(&mut self.id, text),
            "InvoicedQuantity" | "CreditedQuantity" if direct => set_once(&mut self.quantity, text),
            "LineExtensionAmount" if direct => set_once(&mut self.line_amount, text),
            "Description" if within("Item") => set_once(&mut self.description, text),
            "PriceAmount" if parent == "Price" => set_once(&mut self.unit_price, text),
            "TaxAmount" if within("TaxTotal") => set_once(&mut self.line_tax, text),
            _ => {}
        }
    }

    fn into_item(self) -> LineItem {
        LineItem {
            line_id: self.id.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            unit: self.unit.unwrap_or_default(),
            unit_price: self.unit_price.unwrap_or_default(),
            line_amount: self.line_amount.unwrap_or_default(),
            line_tax: self.line_tax.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVOICE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
         xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
         xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
  <cbc:UBLVersionID>2.1</cbc:UBLVersionID>
  <cbc:ID>E001-1074</cbc:ID>
  <cbc:IssueDate>2024-05-02</cbc:IssueDate>
  <cbc:DocumentCurrencyCode>PEN</cbc:DocumentCurrencyCode>
  <cac:Signature><cbc:ID>SIGN-1</cbc:ID></cac:Signature>
  <cac:AccountingSupplierParty><cac:Party>
    <cac:PartyIdentification><cbc:ID schemeID="6">20501234567</cbc:ID></cac:PartyIdentification>
    <cac:PartyName><cbc:Name>ACME</cbc:Name></cac:PartyName>
  </cac:Party></cac:AccountingSupplierParty>
  <cac:InvoiceLine>
    <cbc:ID>1</cbc:ID>
    <cbc:InvoicedQuantity unitCode="NIU">2</cbc:InvoicedQuantity>
    <cbc:LineExtensionAmount currencyID="PEN">20.00</cbc:LineExtensionAmount>
    <cac:TaxTotal><cbc:TaxAmount currencyID="PEN">3.60</cbc:TaxAmount></cac:TaxTotal>
    <cac:Item><cbc:Description><![CDATA[Cable & plug]]></cbc:Description></cac:Item>
    <cac:Price><cbc:PriceAmount currencyID="PEN">10.00</cbc:PriceAmount></cac:Price>
  </cac:InvoiceLine>
</Invoice>"#;

    #[test]
    fn invoice_header_and_line() {
        let doc = extract_document(INVOICE).unwrap();
        let h = &doc.header;
        assert_eq!(h.document_type, DocumentType::Invoice);
        assert_eq!(h.document_number, "E001-1074");
        assert_eq!(h.issue_date, "2024-05-02");
        assert_eq!(h.supplier_identity, "20501234567");
        assert_eq!(h.supplier_name, "ACME");
        assert_eq!(h.customer_identity, "");
        assert_eq!(h.total, "");
        assert!(!h.is_voided);

        assert_eq!(doc.lines.len(), 1);
        let line = &doc.lines[0];
        assert_eq!(line.line_id, "1");
        assert_eq!(line.quantity, "2");
        assert_eq!(line.unit, "NIU");
        assert_eq!(line.description, "Cable & plug");
        assert_eq!(line.unit_price, "10.00");
        assert_eq!(line.line_amount, "20.00");
        assert_eq!(line.line_tax, "3.60");
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = r#"<Invoice xmlns:cbc="x"><cbc:ID>A&amp;B-1</cbc:ID></Invoice>"#;
        assert_eq!(extract_document(xml).unwrap().header.document_number, "A&B-1");
    }

    #[test]
    fn empty_root_is_a_document() {
        let doc = extract_document("<CreditNote/>").unwrap();
        assert!(doc.header.is_credit_note());
        assert_eq!(doc.header.reference_id, "");
        assert!(!doc.header.is_full_cancellation);
    }

    #[test]
    fn malformed_documents_fail() {
        for xml in [
            "",
            "just text",
            "<Invoice><cbc:ID>1</cbc:ID>",
            "<Invoice></CreditNote>",
            "<Invoice/><Invoice/>",
            "<Invoice/>junk",
            "<Invoice><ID>1</ID></Invoice>trailing",
        ] {
            assert!(
                matches!(extract_document(xml), Err(FolioError::Xml(_))),
                "{xml:?}"
            );
        }
    }

    #[test]
    fn whitespace_around_root_is_accepted() {
        let doc = extract_document("\n  <Invoice><ID>7</ID></Invoice>\n\n").unwrap();
        assert_eq!(doc.header.document_number, "7");
    }

    #[test]
    fn bytes_with_bom() {
        let mut bytes = "\u{feff}".as_bytes().to_vec();
        bytes.extend_from_slice(b"<Invoice><ID>7</ID></Invoice>");
        let doc = extract_document_bytes(&bytes, &ExtractOptions::default()).unwrap();
        assert_eq!(doc.header.document_number, "7");
    }

    #[test]
    fn invalid_utf8_fails() {
        let err = extract_document_bytes(&[0x3c, 0xff, 0xfe], &ExtractOptions::default());
        assert!(matches!(err, Err(FolioError::Xml(_))));
    }
}
