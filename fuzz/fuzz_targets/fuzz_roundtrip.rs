#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap the input so slow candidate pipelines stay tractable per case.
    if data.len() > 64 * 1024 {
        return;
    }

    let frame = polypress::compress(data);
    assert!(frame.len() <= data.len() + 1);
    assert_eq!(polypress::decompress(&frame), data);
});
