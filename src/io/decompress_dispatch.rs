//! Batch decompression dispatch.
//!
//! [`decompress`] is the single entry point behind the `lz4c` command line.
//! It drives one long-lived [`StreamDecoder`] through either:
//!
//! - **pass-through mode** (no inputs): standard input is decoded to standard
//!   output with no instrumentation;
//! - **batch mode**: every input is decoded in order, either into a
//!   destination file named after it (its `.lz4` suffix stripped, its
//!   permission bits copied) or, when a benchmark count is set, repeatedly
//!   from memory by the benchmark loop.
//!
//! The first failure ends the batch. The returned [`BatchOutcome`] carries
//! the index of the input that failed (or the number of inputs when all
//! succeeded) together with the error.
//!
//! Every descriptor opened here is closed on every path; on the success path
//! close errors are reported, on an error path they are logged and the first
//! error wins.

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::bench::runner::bench_buffer;
use crate::cli::constants::LZ4_EXTENSION;
use crate::displaylevel;
use crate::frame::types::DecodeError;
use crate::io::error::BatchError;
use crate::io::file_io::{
    close_file, create_dst_file, dst_filename, source_mode, STDIN_MARK, STDOUT_MARK,
};
use crate::io::progress::{instrument, ProgressTarget};
use crate::io::session::{ByteCounter, StreamDecoder};
use crate::io::source::Source;

// ---------------------------------------------------------------------------
// Options and outcome
// ---------------------------------------------------------------------------

/// Per-invocation knobs of the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions<'a> {
    /// Benchmark iterations per input; `0` decompresses to files.
    pub bench: u32,
    /// Where progress bars are drawn.
    pub progress: ProgressTarget,
    /// Suffix stripped from each input to name its destination.
    pub suffix: &'a str,
}

impl Default for DispatchOptions<'static> {
    fn default() -> Self {
        DispatchOptions {
            bench: 0,
            progress: ProgressTarget::Stderr,
            suffix: LZ4_EXTENSION,
        }
    }
}

/// Result of a whole batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Index of the failing input, or the number of inputs on success.
    /// Always `0` in pass-through mode.
    pub index: usize,
    pub error: Option<BatchError>,
}

impl BatchOutcome {
    fn done(index: usize) -> Self {
        BatchOutcome { index, error: None }
    }

    fn failed(index: usize, error: BatchError) -> Self {
        BatchOutcome {
            index,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Decompresses `inputs` (or stdin to stdout when empty) with `decoder`.
///
/// Benchmark reports and per-file summary lines go to standard output.
pub fn decompress<D>(decoder: &mut D, inputs: &[String], opts: &DispatchOptions<'_>) -> BatchOutcome
where
    D: StreamDecoder<Source>,
{
    decompress_to(decoder, inputs, opts, &mut io::stdout())
}

/// Like [`decompress`], writing reports and summary lines to `report`.
pub fn decompress_to<D>(
    decoder: &mut D,
    inputs: &[String],
    opts: &DispatchOptions<'_>,
    report: &mut dyn Write,
) -> BatchOutcome
where
    D: StreamDecoder<Source>,
{
    if inputs.is_empty() {
        return match pass_through(decoder) {
            Ok(()) => BatchOutcome::done(0),
            Err(e) => BatchOutcome::failed(0, e),
        };
    }

    for (index, input) in inputs.iter().enumerate() {
        displaylevel!(4, "Processing file #{} {}\n", index, input);
        let result = if opts.bench > 0 {
            bench_file(decoder, input, opts.bench, report)
        } else {
            decompress_file(decoder, input, opts, report)
        };
        if let Err(e) = result {
            displaylevel!(4, "{} on file #{} {}\n", e.kind_name(), index, input);
            return BatchOutcome::failed(index, e);
        }
    }
    BatchOutcome::done(inputs.len())
}

// ---------------------------------------------------------------------------
// Pass-through
// ---------------------------------------------------------------------------

fn pass_through<D: StreamDecoder<Source>>(decoder: &mut D) -> Result<(), BatchError> {
    decoder.set_observer(None);
    rebind(decoder, Source::stdin());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let decoded = decoder.decode_all(&mut out);
    decoder.take_source();
    let n = decoded?;
    out.flush().map_err(DecodeError::Io)?;
    displaylevel!(4, "{} -> {}: decoded {} bytes\n", STDIN_MARK, STDOUT_MARK, n);
    Ok(())
}

// ---------------------------------------------------------------------------
// Batch: one file to one destination
// ---------------------------------------------------------------------------

fn decompress_file<D: StreamDecoder<Source>>(
    decoder: &mut D,
    src_name: &str,
    opts: &DispatchOptions<'_>,
    report: &mut dyn Write,
) -> Result<(), BatchError> {
    let src = open_source(src_name)?;

    let (size, mode) = match stat_source(&src) {
        Ok(v) => v,
        Err(e) => {
            abandon(src, src_name);
            return Err(BatchError::Stat {
                path: src_name.to_owned(),
                source: e,
            });
        }
    };
    let Some(dst_name) = dst_filename(src_name, opts.suffix) else {
        abandon(src, src_name);
        return Err(BatchError::Suffix {
            path: src_name.to_owned(),
            suffix: opts.suffix.to_owned(),
        });
    };
    let dst = match create_dst_file(dst_name, mode) {
        Ok(f) => f,
        Err(e) => {
            abandon(src, src_name);
            return Err(BatchError::Create {
                path: dst_name.to_owned(),
                source: e,
            });
        }
    };
    displaylevel!(4, "{} -> {} ({} bytes, mode {:o})\n", src_name, dst_name, size, mode);

    let mut sink = instrument(dst, Some(size), dst_name, opts.progress);
    let counter = ByteCounter::new();
    decoder.set_observer(sink.is_tracked().then(|| counter.observer()));
    rebind(decoder, src);

    let decoded = decoder.decode_all(&mut sink);

    decoder.set_observer(None);
    let tracked = sink.is_tracked();
    let src_closed = decoder.take_source().map_or(Ok(()), Source::close);
    let dst_closed = close_file(sink.finish());

    let n = first_failure(decoded, (src_name, src_closed), (dst_name, dst_closed))?;
    displaylevel!(4, "{}: decoded {} bytes\n", src_name, n);

    if tracked {
        writeln!(report, "{} {}", src_name, counter.get()).map_err(BatchError::report)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Batch: benchmark one file from memory
// ---------------------------------------------------------------------------

fn bench_file<D: StreamDecoder<Source>>(
    decoder: &mut D,
    src_name: &str,
    iterations: u32,
    report: &mut dyn Write,
) -> Result<(), BatchError> {
    let mut src = open_source(src_name)?;
    if let Err(e) = write!(report, "Reading {}...", src_name) {
        abandon(src, src_name);
        return Err(BatchError::report(e));
    }

    let mut buf = Vec::new();
    let read = src.read_to_end(&mut buf);
    let closed = src.close();
    read.map_err(|e| BatchError::Read {
        path: src_name.to_owned(),
        source: e,
    })?;
    closed.map_err(|e| BatchError::Close {
        path: src_name.to_owned(),
        source: e,
    })?;

    let compressed: Arc<[u8]> = Arc::from(buf);
    decoder.set_observer(None);
    let runs = bench_buffer(decoder, &compressed, iterations, report);
    decoder.take_source();
    runs?;
    writeln!(report).map_err(BatchError::report)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_source(name: &str) -> Result<Source, BatchError> {
    Source::open(Path::new(name)).map_err(|e| BatchError::Open {
        path: name.to_owned(),
        source: e,
    })
}

/// Size and permission bits of an opened file source.
fn stat_source(src: &Source) -> io::Result<(u64, u32)> {
    let meta = src
        .metadata()?
        .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "source has no metadata"))?;
    Ok((meta.len(), source_mode(&meta)))
}

/// Settles a finished decode: the decode error wins, then the source close
/// error, then the destination close error.
fn first_failure(
    decoded: Result<u64, DecodeError>,
    (src_name, src_closed): (&str, io::Result<()>),
    (dst_name, dst_closed): (&str, io::Result<()>),
) -> Result<u64, BatchError> {
    let n = decoded?;
    src_closed.map_err(|e| BatchError::Close {
        path: src_name.to_owned(),
        source: e,
    })?;
    dst_closed.map_err(|e| BatchError::Close {
        path: dst_name.to_owned(),
        source: e,
    })?;
    Ok(n)
}

/// Binds `source` to the session, closing anything left bound.
fn rebind<D: StreamDecoder<Source>>(decoder: &mut D, source: Source) {
    if let Some(stale) = decoder.reset(source) {
        if let Err(e) = stale.close() {
            displaylevel!(4, "Warning : closing stale source: {}\n", e);
        }
    }
}

/// Closes a source on an error path; the original error takes precedence.
fn abandon(src: Source, name: &str) {
    if let Err(e) = src.close() {
        displaylevel!(4, "Warning : {}: close error: {}\n", name, e);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
