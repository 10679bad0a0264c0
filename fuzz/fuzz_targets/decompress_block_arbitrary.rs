#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary block payloads must be rejected or decoded, never panic.
    // The first byte picks how much synthetic history precedes the block.
    let Some((&h, block)) = data.split_first() else {
        return;
    };
    let mut out: Vec<u8> = (0..usize::from(h) * 256).map(|i| i as u8).collect();
    let before = out.len();
    if let Ok(n) = lz4c::frame::block::decompress_block(block, &mut out, 64 * 1024) {
        assert_eq!(out.len(), before + n);
    }
});
