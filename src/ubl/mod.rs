//! UBL 2.1 document extraction (Invoice, CreditNote and other roots).
//!
//! Elements are matched by local name, so documents parse the same with or
//! without namespace prefixes.
//!
//! # Example
//!
//! ```
//! use folio::ubl::extract_document;
//!
//! let xml = r#"<CreditNote xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
//!                          xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
//!   <cbc:ID>FC01-12</cbc:ID>
//!   <cac:DiscrepancyResponse>
//!     <cbc:ReferenceID>E001 - 1074</cbc:ReferenceID>
//!     <cbc:ResponseCode>01</cbc:ResponseCode>
//!   </cac:DiscrepancyResponse>
//! </CreditNote>"#;
//!
//! let doc = extract_document(xml).unwrap();
//! assert!(doc.header.is_full_cancellation);
//! assert_eq!(doc.header.reference_id, "E001-1074");
//! ```

mod extract;

pub use extract::{ExtractOptions, extract_document, extract_document_bytes, extract_document_with};

