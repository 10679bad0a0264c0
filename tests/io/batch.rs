// Batch dispatcher driven by the real frame decoder.
//
// Public API under test:
//   `lz4c::io::decompress_to`
//   `lz4c::io::{BatchOutcome, BatchError, DispatchOptions}`

use std::fs;
use std::path::{Path, PathBuf};

use lz4c::io::{decompress_to, BatchError, BatchOutcome, DispatchOptions, ProgressTarget};
use lz4c::{FrameDecoder, Source};

use crate::common::{make_checked_linked_frame, make_frame_stream, make_legacy_stream, text};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn quiet_opts() -> DispatchOptions<'static> {
    DispatchOptions {
        progress: ProgressTarget::Hidden,
        ..DispatchOptions::default()
    }
}

fn write_input(dir: &Path, name: &str, bytes: &[u8]) -> String {
    let p = dir.join(name);
    fs::write(&p, bytes).unwrap();
    p.to_str().unwrap().to_owned()
}

fn run(inputs: &[String], opts: &DispatchOptions<'_>) -> (BatchOutcome, String) {
    let mut decoder = FrameDecoder::<Source>::new();
    let mut report: Vec<u8> = Vec::new();
    let outcome = decompress_to(&mut decoder, inputs, opts, &mut report);
    (outcome, String::from_utf8(report).unwrap())
}

fn stripped(p: &str) -> PathBuf {
    PathBuf::from(p.strip_suffix(".lz4").unwrap())
}

// ─────────────────────────────────────────────────────────────────────────────
// Success paths
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn single_file_round_trip_and_summary_line() {
    let dir = tempfile::tempdir().unwrap();
    let original = text(200_000);
    let input = write_input(dir.path(), "a.txt.lz4", &make_frame_stream(&original));

    let (outcome, report) = run(std::slice::from_ref(&input), &quiet_opts());

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert_eq!(outcome.index, 1);
    assert_eq!(fs::read(stripped(&input)).unwrap(), original);
    // Summary line carries the exact decoded length, as summed from block events.
    assert_eq!(report, format!("{} {}\n", input, original.len()));
}

#[test]
fn several_formats_in_one_batch_reuse_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let a = text(70_000);
    let b = crate::common::noise(150_000, 7);
    let c = text(10);
    let inputs = vec![
        write_input(dir.path(), "a.lz4", &make_checked_linked_frame(&a)),
        write_input(dir.path(), "b.lz4", &make_frame_stream(&b)),
        write_input(dir.path(), "c.lz4", &make_legacy_stream(&c)),
    ];

    let (outcome, report) = run(&inputs, &quiet_opts());

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert_eq!(outcome.index, 3);
    assert_eq!(fs::read(stripped(&inputs[0])).unwrap(), a);
    assert_eq!(fs::read(stripped(&inputs[1])).unwrap(), b);
    assert_eq!(fs::read(stripped(&inputs[2])).unwrap(), c);
    assert_eq!(report.lines().count(), 3);
}

#[test]
fn zero_size_input_skips_instrumentation() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "empty.lz4", b"");

    let (outcome, report) = run(std::slice::from_ref(&input), &quiet_opts());

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert!(report.is_empty(), "no summary line without a progress bar");
    assert_eq!(fs::read(stripped(&input)).unwrap().len(), 0);
}

#[test]
fn existing_destination_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "t.lz4", &make_frame_stream(b"short"));
    fs::write(stripped(&input), vec![b'x'; 4096]).unwrap();

    let (outcome, _) = run(std::slice::from_ref(&input), &quiet_opts());

    assert!(outcome.is_success());
    assert_eq!(fs::read(stripped(&input)).unwrap(), b"short");
}

// ─────────────────────────────────────────────────────────────────────────────
// Failure paths
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn corrupted_second_of_three_stops_at_index_one() {
    let dir = tempfile::tempdir().unwrap();
    let data = text(100_000);
    let mut bad = make_checked_linked_frame(&data);
    let mid = bad.len() / 2;
    bad[mid] ^= 0xFF;

    let inputs = vec![
        write_input(dir.path(), "one.lz4", &make_frame_stream(&data)),
        write_input(dir.path(), "two.lz4", &bad),
        write_input(dir.path(), "three.lz4", &make_frame_stream(&data)),
    ];

    let (outcome, _) = run(&inputs, &quiet_opts());

    assert_eq!(outcome.index, 1);
    let err = outcome.error.expect("batch should fail");
    assert!(err.decode_error().is_some(), "expected a decode error, got {err:?}");
    assert_eq!(fs::read(stripped(&inputs[0])).unwrap(), data);
    assert!(!stripped(&inputs[2]).exists(), "third file must not be processed");
}

#[test]
fn truncated_input_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let full = make_frame_stream(&text(50_000));
    let input = write_input(dir.path(), "cut.lz4", &full[..full.len() / 2]);

    let (outcome, _) = run(std::slice::from_ref(&input), &quiet_opts());

    assert_eq!(outcome.index, 0);
    assert!(matches!(outcome.error, Some(BatchError::Decode(_))));
}

#[test]
fn missing_input_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_input(dir.path(), "ok.lz4", &make_frame_stream(b"fine"));
    let missing = dir.path().join("nope.lz4").to_str().unwrap().to_owned();

    let (outcome, _) = run(&[good.clone(), missing], &quiet_opts());

    assert_eq!(outcome.index, 1);
    assert!(matches!(outcome.error, Some(BatchError::Open { .. })));
    assert!(stripped(&good).exists());
}

#[test]
fn input_without_suffix_is_rejected_before_creating_anything() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "plain.bin", &make_frame_stream(b"data"));
    let before: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();

    let (outcome, _) = run(std::slice::from_ref(&input), &quiet_opts());

    assert_eq!(outcome.index, 0);
    assert!(matches!(outcome.error, Some(BatchError::Suffix { .. })));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), before.len());
}

#[test]
fn uncreatable_destination_fails_before_decoding() {
    let dir = tempfile::tempdir().unwrap();
    let compressed = make_frame_stream(&text(1000));
    let input = write_input(dir.path(), "blocked.lz4", &compressed);
    // A directory squatting on the destination name cannot be opened for writing.
    fs::create_dir(stripped(&input)).unwrap();

    let (outcome, report) = run(std::slice::from_ref(&input), &quiet_opts());

    assert_eq!(outcome.index, 0);
    assert!(matches!(outcome.error, Some(BatchError::Create { .. })));
    assert!(report.is_empty());
    assert_eq!(fs::read(&input).unwrap(), compressed, "source must be untouched");
}

/// Whether this process still holds a descriptor on `path`.
#[cfg(target_os = "linux")]
fn is_open(path: &std::path::Path) -> bool {
    let target = fs::canonicalize(path).unwrap();
    fs::read_dir("/proc/self/fd")
        .unwrap()
        .filter_map(Result::ok)
        .any(|fd| fs::read_link(fd.path()).is_ok_and(|p| p == target))
}

#[cfg(unix)]
#[test]
fn read_only_directory_fails_create_and_releases_source() {
    use std::os::unix::fs::PermissionsExt;

    // Permission bits do not bind root.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    let compressed = make_frame_stream(&text(1000));
    let input = write_input(&locked, "data.lz4", &compressed);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let (outcome, report) = run(std::slice::from_ref(&input), &quiet_opts());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(outcome.index, 0);
    match &outcome.error {
        Some(BatchError::Create { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied)
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(report.is_empty());
    assert!(!stripped(&input).exists());
    assert_eq!(fs::read(&input).unwrap(), compressed, "source must be untouched");
    #[cfg(target_os = "linux")]
    assert!(!is_open(std::path::Path::new(&input)), "source must be closed");
}

#[test]
fn directory_input_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("folder.lz4");
    fs::create_dir(&sub).unwrap();

    let (outcome, _) = run(&[sub.to_str().unwrap().to_owned()], &quiet_opts());

    assert!(matches!(outcome.error, Some(BatchError::Open { .. })));
}

// ─────────────────────────────────────────────────────────────────────────────
// Benchmark mode through the dispatcher
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bench_mode_reports_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let data = text(64_000);
    let input = write_input(dir.path(), "bench.lz4", &make_frame_stream(&data));
    let opts = DispatchOptions {
        bench: 3,
        ..quiet_opts()
    };

    let (outcome, report) = run(std::slice::from_ref(&input), &opts);

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert!(report.starts_with(&format!("Reading {}...", input)));
    assert_eq!(report.matches("\nDecompressing...").count(), 3);
    assert_eq!(report.matches(&format!("-> {} [", data.len())).count(), 3);
    assert!(report.ends_with('\n'));
    assert!(!stripped(&input).exists());
}

#[test]
fn bench_mode_decode_error_reports_file_index() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_input(dir.path(), "g.lz4", &make_frame_stream(b"good data"));
    let bad = write_input(dir.path(), "b.lz4", b"this is not lz4");
    let opts = DispatchOptions {
        bench: 2,
        ..quiet_opts()
    };

    let (outcome, _) = run(&[good, bad], &opts);

    assert_eq!(outcome.index, 1);
    assert!(matches!(
        outcome.error.as_ref().and_then(|e| e.decode_error()),
        Some(lz4c::DecodeError::UnknownMagic(_))
    ));
}
