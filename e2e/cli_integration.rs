// e2e/cli_integration.rs — black-box tests of the `lz4c` binary
//
// Drives the compiled binary with std::process::Command: batch decompression,
// pass-through mode, benchmark mode and exit codes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

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

fn sample() -> Vec<u8> {
    "Hello, LZ4!\n".repeat(20_000).into_bytes()
}

fn write_lz4(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, compress(data)).unwrap();
    p
}

// ── Batch mode ────────────────────────────────────────────────────────────────

#[test]
fn batch_decompresses_every_file_and_prints_summaries() {
    let dir = TempDir::new().unwrap();
    let data = sample();
    let a = write_lz4(dir.path(), "a.txt.lz4", &data);
    let b = write_lz4(dir.path(), "b.txt.lz4", b"second file");

    let out = Command::new(lz4c_bin())
        .args([a.to_str().unwrap(), b.to_str().unwrap()])
        .output()
        .expect("failed to run lz4c");

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), data);
    assert_eq!(fs::read(dir.path().join("b.txt")).unwrap(), b"second file");
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(
        stdout,
        format!("{} {}\n{} 11\n", a.display(), data.len(), b.display())
    );
}

#[test]
fn pass_through_matches_batch_output() {
    let dir = TempDir::new().unwrap();
    let data = sample();
    let input = write_lz4(dir.path(), "p.lz4", &data);

    let status = Command::new(lz4c_bin())
        .arg(&input)
        .stdout(Stdio::null())
        .status()
        .unwrap();
    assert!(status.success());
    let batch = fs::read(dir.path().join("p")).unwrap();

    let mut child = Command::new(lz4c_bin())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    let compressed = fs::read(&input).unwrap();
    let mut stdin = child.stdin.take().unwrap();
    let writer = std::thread::spawn(move || stdin.write_all(&compressed));
    let out = child.wait_with_output().unwrap();
    writer.join().unwrap().unwrap();

    assert!(out.status.success());
    assert_eq!(out.stdout, batch);
    assert_eq!(out.stdout, data);
}

// ── Benchmark mode ────────────────────────────────────────────────────────────

#[test]
fn bench_runs_requested_iterations_without_writing_files() {
    let dir = TempDir::new().unwrap();
    let data = sample();
    let input = write_lz4(dir.path(), "bench.lz4", &data);

    let out = Command::new(lz4c_bin())
        .args(["-b", "3", input.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with(&format!("Reading {}...", input.display())));
    assert_eq!(stdout.matches("Decompressing...").count(), 3);
    assert_eq!(stdout.matches(&format!("-> {} [", data.len())).count(), 3);
    assert!(!dir.path().join("bench").exists());
}

#[test]
fn bench_without_files_falls_back_to_pass_through() {
    let mut child = Command::new(lz4c_bin())
        .args(["--bench", "2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&compress(b"piped")).unwrap();
    let out = child.wait_with_output().unwrap();

    assert!(out.status.success());
    assert_eq!(out.stdout, b"piped");
    assert!(String::from_utf8_lossy(&out.stderr).contains("Warning"));
}

// ── Flags ─────────────────────────────────────────────────────────────────────

#[test]
fn version_flag() {
    let out = Command::new(lz4c_bin()).arg("--version").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_bench_option() {
    let out = Command::new(lz4c_bin()).arg("--help").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("--bench"));
}
