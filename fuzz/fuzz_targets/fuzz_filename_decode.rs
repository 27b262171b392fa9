#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let folio::DecodedName::Parsed(key) = folio::decode_archive_name(s) {
            assert_eq!(key.source_name, s);
            assert_eq!(key.identity.len(), 11);
        }
    }
});
