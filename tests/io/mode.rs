// Destination files inherit the permission bits of their source.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;

use lz4c::io::{decompress_to, DispatchOptions, ProgressTarget};
use lz4c::{FrameDecoder, Source};

use crate::common::{make_frame_stream, text};

fn mode_of(p: &std::path::Path) -> u32 {
    fs::metadata(p).unwrap().permissions().mode() & 0o7777
}

fn decompress_with_mode(mode: u32) -> u32 {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("m.lz4");
    fs::write(&src, make_frame_stream(&text(5000))).unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(mode)).unwrap();

    let opts = DispatchOptions {
        progress: ProgressTarget::Hidden,
        ..DispatchOptions::default()
    };
    let mut decoder = FrameDecoder::<Source>::new();
    let outcome = decompress_to(
        &mut decoder,
        &[src.to_str().unwrap().to_owned()],
        &opts,
        &mut Vec::<u8>::new(),
    );
    assert!(outcome.is_success(), "{:?}", outcome.error);
    mode_of(&dir.path().join("m"))
}

#[test]
fn destination_mode_matches_source_0640() {
    assert_eq!(decompress_with_mode(0o640), 0o640);
}

#[test]
fn destination_mode_matches_source_0600() {
    assert_eq!(decompress_with_mode(0o600), 0o600);
}

#[test]
fn group_writable_bits_survive_umask() {
    // The usual 022 umask would strip these on creation.
    assert_eq!(decompress_with_mode(0o664), 0o664);
}
