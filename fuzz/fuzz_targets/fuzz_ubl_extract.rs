#![no_main]

use folio::ubl::{ExtractOptions, extract_document_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    let _ = extract_document_bytes(
        data,
        &ExtractOptions {
            credit_note_lines: true,
        },
    );
});
