//! File and stream orchestration for `lz4c uncompress`.
//!
//! - [`session`]             — the decoder session contract and byte observers
//! - [`source`]              — compressed sources (stdin, file, in-memory buffer)
//! - [`file_io`]             — destination naming, mode-preserving creation, close
//! - [`progress`]            — progress-bar instrumentation of the output sink
//! - [`decompress_dispatch`] — the batch dispatcher and its [`BatchOutcome`]
//! - [`error`]               — [`BatchError`], the dispatcher's failure kinds
//!
//! [`BatchOutcome`]: decompress_dispatch::BatchOutcome
//! [`BatchError`]: error::BatchError

pub mod decompress_dispatch;
pub mod error;
pub mod file_io;
pub mod progress;
pub mod session;
pub mod source;

// ── Core type re-exports ─────────────────────────────────────────────────────
pub use decompress_dispatch::{decompress, decompress_to, BatchOutcome, DispatchOptions};
pub use error::BatchError;
pub use progress::{instrument, ProgressSink, ProgressTarget};
pub use session::{BlockObserver, ByteCounter, StreamDecoder};
pub use source::Source;

// ── Special I/O sentinels ────────────────────────────────────────────────────
pub use file_io::{STDIN_MARK, STDOUT_MARK};
