//! Benchmark loop.
//!
//! Each iteration quiesces the allocator, rebinds the session to a fresh
//! reader over the shared compressed buffer, and decodes into a discarding
//! sink that only counts bytes. Iterations are reported one line-segment at
//! a time, in the form
//!
//! ```text
//! Decompressing... 1048576 -> 4194304 [400.00%]; 3ms, 1398.1MB/s
//! ```
//!
//! Results are not aggregated; each [`BenchRun`] is returned to the caller.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cli::constants::BENCH_REPORT_PREFIX;
use crate::io::error::BatchError;
use crate::io::session::StreamDecoder;
use crate::io::source::Source;
use crate::util::heap::quiesce_heap;

// ── Result of one iteration ───────────────────────────────────────────────────

/// Timing and sizes of one decode of the benchmark buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchRun {
    pub elapsed: Duration,
    /// Decoded bytes produced.
    pub decoded: u64,
    /// Size of the compressed input.
    pub compressed: u64,
}

impl BenchRun {
    /// Decoded size as a percentage of the compressed size.
    pub fn ratio_pct(&self) -> f64 {
        if self.compressed == 0 {
            return 0.0;
        }
        self.decoded as f64 * 100.0 / self.compressed as f64
    }

    /// Decoded megabytes (10^6 bytes) per second.
    pub fn mb_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.decoded as f64 / 1e6) / secs
    }

    /// Elapsed time rounded to the nearest millisecond.
    pub fn elapsed_rounded(&self) -> Duration {
        let ms = (self.elapsed.as_micros() + 500) / 1000;
        Duration::from_millis(ms as u64)
    }
}

impl fmt::Display for BenchRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} [{:.2}%]; {}, {:.1}MB/s",
            self.compressed,
            self.decoded,
            self.ratio_pct(),
            format_elapsed(self.elapsed_rounded()),
            self.mb_per_sec()
        )
    }
}

/// Renders a whole-millisecond duration as `0s`, `12ms`, `1.5s` or `2m3.25s`.
fn format_elapsed(d: Duration) -> String {
    let ms = d.as_millis();
    if ms == 0 {
        return "0s".to_owned();
    }
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let (h, rest) = (ms / 3_600_000, ms % 3_600_000);
    let (m, rest) = (rest / 60_000, rest % 60_000);
    let secs = match rest % 1000 {
        0 => format!("{}s", rest / 1000),
        frac => {
            let frac = format!("{frac:03}");
            format!("{}.{}s", rest / 1000, frac.trim_end_matches('0'))
        }
    };
    match (h, m) {
        (0, 0) => secs,
        (0, m) => format!("{m}m{secs}"),
        (h, m) => format!("{h}h{m}m{secs}"),
    }
}

// ── Counting sink ─────────────────────────────────────────────────────────────

/// Discards everything written to it, counting the bytes.
#[derive(Debug, Default)]
struct CountingSink {
    count: u64,
}

impl Write for CountingSink {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.count += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Loop ──────────────────────────────────────────────────────────────────────

/// Decodes `compressed` `iterations` times with `decoder`, writing one report
/// segment per iteration to `report`.
///
/// The first decode error ends the loop and is returned as
/// [`BatchError::Decode`]; a failed report write ends it as
/// [`BatchError::Report`]. On return the session is still bound to the last
/// in-memory source.
pub fn bench_buffer<D>(
    decoder: &mut D,
    compressed: &Arc<[u8]>,
    iterations: u32,
    report: &mut dyn Write,
) -> Result<Vec<BenchRun>, BatchError>
where
    D: StreamDecoder<Source> + ?Sized,
{
    let mut runs = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        write!(report, "\n{}", BENCH_REPORT_PREFIX)
            .and_then(|()| report.flush())
            .map_err(BatchError::report)?;

        quiesce_heap();
        let start = Instant::now();
        decoder.reset(Source::memory(Arc::clone(compressed)));
        let mut sink = CountingSink::default();
        decoder.decode_all(&mut sink)?;
        let elapsed = start.elapsed();

        let run = BenchRun {
            elapsed,
            decoded: sink.count,
            compressed: compressed.len() as u64,
        };
        write!(report, " {}", run).map_err(BatchError::report)?;
        runs.push(run);
    }
    Ok(runs)
}
