// e2e/error_handling.rs — exit codes and diagnostics of the `lz4c` binary

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use lz4_flex::frame::FrameEncoder;
use tempfile::TempDir;

fn lz4c_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lz4c"))
}

fn compress(data: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut enc = FrameEncoder::new(&mut out);
    enc.write_all(data).unwrap();
    enc.finish().unwrap();
    out
}

fn run(args: &[&str]) -> Output {
    Command::new(lz4c_bin()).args(args).output().unwrap()
}

#[test]
fn missing_file_reports_index_and_name() {
    let dir = TempDir::new().unwrap();
    let ok = dir.path().join("ok.lz4");
    fs::write(&ok, compress(b"ok")).unwrap();
    let missing = dir.path().join("missing.lz4");

    let out = run(&[ok.to_str().unwrap(), missing.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains(&format!("lz4c: file #1 {}: cannot open", missing.display())),
        "stderr: {stderr}"
    );
    assert!(dir.path().join("ok").exists());
}

#[test]
fn corrupted_input_fails_and_stops_the_batch() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.lz4");
    fs::write(&bad, b"definitely not lz4").unwrap();
    let later = dir.path().join("later.lz4");
    fs::write(&later, compress(b"later")).unwrap();

    let out = run(&[bad.to_str().unwrap(), later.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("file #0"));
    assert!(!dir.path().join("later").exists());
}

#[test]
fn wrong_suffix_is_rejected() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("data.bin");
    fs::write(&f, compress(b"x")).unwrap();

    let out = run(&[f.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("extension"));
}

#[test]
fn corrupted_stdin_reports_stdin() {
    let mut child = Command::new(lz4c_bin())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"nope nope").unwrap();
    let out = child.wait_with_output().unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("lz4c: stdin: "));
}

#[test]
fn double_quiet_silences_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone.lz4");

    let out = run(&["-qq", missing.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stderr.is_empty());
}

#[test]
fn unknown_option_is_a_usage_error() {
    let out = run(&["--definitely-not-an-option"]);
    assert_eq!(out.status.code(), Some(2));
}
