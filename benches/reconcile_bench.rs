use criterion::{Criterion, black_box, criterion_group, criterion_main};

use folio::core::*;
use folio::ubl::extract_document;

fn archive_names(count: u64) -> Vec<String> {
    (1..=count)
        // every 50th number is skipped, every 97th archived twice
        .filter(|n| n % 50 != 0)
        .flat_map(|n| {
            let name = format!("FACTURAE001-{n}20501234567.zip");
            let copies = if n % 97 == 0 { 2 } else { 1 };
            std::iter::repeat_n(name, copies)
        })
        .collect()
}

fn invoice_with_lines(lines: usize) -> String {
    let mut xml = String::from(
        r#"<Invoice xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
                    xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
  <cbc:ID>E001-1</cbc:ID>
  <cbc:IssueDate>2024-05-02</cbc:IssueDate>
  <cac:AccountingSupplierParty><cac:Party>
    <cac:PartyIdentification><cbc:ID>20501234567</cbc:ID></cac:PartyIdentification>
  </cac:Party></cac:AccountingSupplierParty>
"#,
    );
    for i in 1..=lines {
        xml.push_str(&format!(
            r#"  <cac:InvoiceLine>
    <cbc:ID>{i}</cbc:ID>
    <cbc:InvoicedQuantity unitCode="NIU">2</cbc:InvoicedQuantity>
    <cbc:LineExtensionAmount>19.98</cbc:LineExtensionAmount>
    <cac:Item><cbc:Description>Item {i}</cbc:Description></cac:Item>
    <cac:Price><cbc:PriceAmount>9.99</cbc:PriceAmount></cac:Price>
  </cac:InvoiceLine>
"#
        ));
    }
    xml.push_str("</Invoice>");
    xml
}

fn bench_decode_names(c: &mut Criterion) {
    let names = archive_names(10_000);
    let decoder = FilenameDecoder::new(&FilenamePattern::default()).unwrap();
    c.bench_function("decode_10k_names", |b| {
        b.iter(|| black_box(decoder.decode_all(black_box(&names))));
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let names = archive_names(10_000);
    let decoded: Vec<_> = names.iter().map(|n| decode_archive_name(n)).collect();
    c.bench_function("reconcile_10k_names", |b| {
        b.iter(|| black_box(reconcile(black_box(&decoded), 10_000)));
    });
}

fn bench_extract(c: &mut Criterion) {
    let small = invoice_with_lines(10);
    c.bench_function("extract_10_lines", |b| {
        b.iter(|| black_box(extract_document(black_box(&small))));
    });

    let large = invoice_with_lines(1000);
    c.bench_function("extract_1000_lines", |b| {
        b.iter(|| black_box(extract_document(black_box(&large))));
    });
}

fn bench_link(c: &mut Criterion) {
    let headers: Vec<DocumentHeader> = (1..=5_000)
        .map(|n| {
            if n % 10 == 0 {
                let mut h = DocumentHeader::new(DocumentType::CreditNote);
                h.document_number = format!("FC01-{n}");
                h.cancellation_code = FULL_CANCELLATION_CODE.into();
                h.is_full_cancellation = true;
                h.reference_id = format!("E001-{}", n - 1);
                h
            } else {
                let mut h = DocumentHeader::new(DocumentType::Invoice);
                h.document_number = format!("E001-{n}");
                h
            }
        })
        .collect();

    c.bench_function("link_5000_headers", |b| {
        b.iter(|| black_box(link_invalidations(black_box(headers.clone()))));
    });
}

criterion_group!(
    benches,
    bench_decode_names,
    bench_reconcile,
    bench_extract,
    bench_link
);
criterion_main!(benches);
