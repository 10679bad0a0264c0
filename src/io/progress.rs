//! Progress instrumentation of the decompression output.
//!
//! [`instrument`] wraps a destination sink so that every write also advances
//! a terminal progress bar. The bar is only built when the expected total is
//! known and positive; otherwise the sink is used as-is, so a bar is never
//! shown with a meaningless scale.
//!
//! The bar is scaled to the compressed file size while it is fed decoded
//! bytes, so it is an indication of activity rather than an exact ratio; the
//! exact decoded count comes from a [`ByteCounter`] registered on the decoder
//! session and is printed once the file is done.
//!
//! [`ByteCounter`]: crate::io::session::ByteCounter

use std::io::{self, Write};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{msg} [{wide_bar}] {bytes}/{total_bytes} ({bytes_per_sec})";

/// Where progress bars are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressTarget {
    /// Draw on standard error.
    #[default]
    Stderr,
    /// Build bars but never draw them.
    Hidden,
}

/// An output sink, optionally fanned out to a progress bar.
pub enum ProgressSink<W> {
    /// No indicator; writes go straight to the sink.
    Plain(W),
    /// Every write goes to `sink`, then advances `bar` by the bytes written.
    Tracked { sink: W, bar: ProgressBar },
}

/// Wraps `sink` with a progress bar sized to `total`.
///
/// `total` of `None` or `0` yields [`ProgressSink::Plain`].
pub fn instrument<W: Write>(
    sink: W,
    total: Option<u64>,
    name: &str,
    target: ProgressTarget,
) -> ProgressSink<W> {
    match total {
        Some(total) if total > 0 => ProgressSink::Tracked {
            sink,
            bar: new_bar(total, name, target),
        },
        _ => ProgressSink::Plain(sink),
    }
}

fn new_bar(total: u64, name: &str, target: ProgressTarget) -> ProgressBar {
    let draw_target = match target {
        ProgressTarget::Stderr => ProgressDrawTarget::stderr(),
        ProgressTarget::Hidden => ProgressDrawTarget::hidden(),
    };
    let bar = ProgressBar::with_draw_target(Some(total), draw_target);
    bar.set_style(
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(name.to_owned());
    // Slow transfers should show the bar at 0% right away.
    bar.tick();
    bar
}

impl<W> ProgressSink<W> {
    /// `true` when a progress bar is attached.
    pub fn is_tracked(&self) -> bool {
        matches!(self, ProgressSink::Tracked { .. })
    }

    pub fn bar(&self) -> Option<&ProgressBar> {
        match self {
            ProgressSink::Tracked { bar, .. } => Some(bar),
            ProgressSink::Plain(_) => None,
        }
    }

    pub fn get_ref(&self) -> &W {
        match self {
            ProgressSink::Plain(sink) | ProgressSink::Tracked { sink, .. } => sink,
        }
    }

    /// Erases the bar from the terminal and returns the sink.
    pub fn finish(self) -> W {
        match self {
            ProgressSink::Plain(sink) => sink,
            ProgressSink::Tracked { sink, bar } => {
                bar.finish_and_clear();
                sink
            }
        }
    }
}

impl<W: Write> Write for ProgressSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ProgressSink::Plain(sink) => sink.write(buf),
            ProgressSink::Tracked { sink, bar } => {
                let n = sink.write(buf)?;
                bar.inc(n as u64);
                Ok(n)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ProgressSink::Plain(sink) | ProgressSink::Tracked { sink, .. } => sink.flush(),
        }
    }
}
