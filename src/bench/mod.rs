//! In-memory decompression benchmark.
//!
//! [`runner::bench_buffer`] decodes one compressed buffer a fixed number of
//! times through a reused decoder session and reports per-iteration
//! throughput and ratio. Nothing is written to disk.

pub mod runner;

pub use runner::{bench_buffer, BenchRun};
