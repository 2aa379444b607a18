#![no_main]

use libfuzzer_sys::fuzz_target;
use ponytown_client::{decode_status, decode_status_base64, ProtocolScope};

fuzz_target!(|data: &[u8]| {
    // Raw-byte path under both recovered revisions.
    let _ = decode_status(data, &ProtocolScope::current());
    let _ = decode_status(data, &ProtocolScope::legacy());

    // Text path, as the client sees a response body.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = decode_status_base64(s, &ProtocolScope::current());
    }
});
