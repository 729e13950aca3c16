#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary frames must never panic; garbage in, truncated garbage out.
    if data.len() > 64 * 1024 {
        return;
    }

    let _ = polypress::decompress(data);
});
