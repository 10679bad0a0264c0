#![no_main]
use libfuzzer_sys::fuzz_target;

use lz4c::{ByteCounter, FrameDecoder, StreamDecoder};

fuzz_target!(|data: &[u8]| {
    // Arbitrary streams through a reused session: errors are fine, panics are
    // not, and the observer total must always match the bytes written.
    let counter = ByteCounter::new();
    let mut d = FrameDecoder::with_source(data);
    d.set_observer(Some(counter.observer()));
    let mut out: Vec<u8> = Vec::new();
    let _ = d.decode_all(&mut out);
    assert_eq!(counter.get(), out.len() as u64);

    d.reset(data);
    let _ = d.decode_all(&mut std::io::sink());
});
