#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = folio::archive::read_zip_documents(std::io::Cursor::new(data));
});
