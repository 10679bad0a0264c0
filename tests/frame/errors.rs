// Malformed input is reported, never panics.

use lz4c::{DecodeError, FrameDecoder, StreamDecoder};

use crate::common::{make_checked_linked_frame, make_frame_stream, text};

fn decode_err(stream: &[u8]) -> DecodeError {
    let mut d = FrameDecoder::with_source(stream);
    d.decode_all(&mut Vec::<u8>::new()).expect_err("decode should fail")
}

#[test]
fn garbage_is_unknown_magic() {
    assert!(matches!(decode_err(b"garbage!"), DecodeError::UnknownMagic(_)));
}

#[test]
fn truncated_frame_at_every_cut() {
    let frame = make_frame_stream(&text(3000));
    for cut in 1..frame.len() {
        let e = decode_err(&frame[..cut]);
        assert!(
            matches!(e, DecodeError::Truncated(_)),
            "cut at {cut}: unexpected {e:?}"
        );
    }
}

#[test]
fn header_checksum_mismatch() {
    let mut frame = make_frame_stream(b"abc");
    frame[6] ^= 0x5A; // HC byte after magic + FLG + BD
    assert!(matches!(decode_err(&frame), DecodeError::HeaderChecksum { .. }));
}

#[test]
fn content_checksum_mismatch() {
    let mut frame = make_checked_linked_frame(&text(1000));
    let n = frame.len();
    frame[n - 1] ^= 0x01;
    assert!(matches!(decode_err(&frame), DecodeError::ContentChecksum));
}

#[test]
fn block_checksum_mismatch() {
    let mut frame = make_checked_linked_frame(&text(1000));
    // magic(4) + FLG + BD + HC, block header(4), then the payload.
    frame[11] ^= 0x40;
    assert!(matches!(decode_err(&frame), DecodeError::BlockChecksum));
}

#[test]
fn every_single_byte_flip_is_rejected_or_decoded_safely() {
    let data = text(20_000);
    let frame = make_checked_linked_frame(&data);
    for i in 0..frame.len() {
        let mut f = frame.clone();
        f[i] ^= 0x80;
        let mut d = FrameDecoder::with_source(f.as_slice());
        let mut out: Vec<u8> = Vec::new();
        if d.decode_all(&mut out).is_ok() {
            // Checksums cover every byte of the payload.
            assert_eq!(out, data, "flip at {i} decoded to different data");
        }
    }
}
