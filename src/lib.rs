// lz4c — batch LZ4 decompression with progress reporting and benchmarking

pub mod cli;
pub mod util;
pub mod io;
pub mod bench;
pub mod frame;
pub mod xxhash;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use frame::{DecodeError, FrameDecoder};
pub use io::decompress_dispatch::{decompress, BatchOutcome, DispatchOptions};
pub use io::error::BatchError;
pub use io::session::{BlockObserver, ByteCounter, StreamDecoder};
pub use io::source::Source;
