// cli/constants.rs — program identity, display level, and display macros

use std::sync::atomic::{AtomicU32, Ordering};

// ── Identity ──────────────────────────────────────────────────────────────────
pub const COMPRESSOR_NAME: &str = "lz4c";
pub const LZ4_EXTENSION: &str = ".lz4";

/// Leading text of every benchmark iteration report.
pub const BENCH_REPORT_PREFIX: &str = "Decompressing...";

// ── Display level ─────────────────────────────────────────────────────────────
//
// 0 = no output; 1 = errors only; 2 = normal (downgradable); 3 = non-downgradable; 4 = verbose
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Level at or above which progress bars are drawn.
pub const PROGRESS_DISPLAY_LEVEL: u32 = 2;

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

// ── Display helper ────────────────────────────────────────────────────────────
//
// Diagnostics go to stderr so they never mix with decoded data on stdout.

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
