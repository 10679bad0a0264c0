//! Command-line argument parsing for `lz4c`.
//!
//! The entry points are [`parse_args`] (reads `std::env::args_os()`, exits on
//! usage errors the way clap does) and [`parse_args_from`] (takes an explicit
//! argument list and returns usage errors, suitable for unit-testing).
//!
//! ```text
//! lz4c [-b|--bench N] [-q|--quiet]... [-v|--verbose]... [FILES]...
//! ```
//!
//! With no files, standard input is decoded to standard output.

use std::ffi::OsString;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};

use crate::cli::constants::{LZ4_EXTENSION, PROGRESS_DISPLAY_LEVEL};
use crate::io::decompress_dispatch::DispatchOptions;
use crate::io::progress::ProgressTarget;

/// Default display level before `-q` / `-v` adjustments.
const DEFAULT_DISPLAY_LEVEL: u32 = 2;
/// Highest meaningful display level.
const MAX_DISPLAY_LEVEL: u32 = 4;

/// Uncompress `.lz4` files, or stdin to stdout when no file is given.
#[derive(Debug, Clone, Parser)]
#[command(name = "lz4c", version, about)]
pub struct CliArgs {
    /// Run the decompression benchmark N times per file; no output is written
    #[arg(short = 'b', long = "bench", value_name = "N", default_value_t = 0)]
    pub bench: u32,

    /// Suppress messages (repeat to also suppress errors)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// More verbose messages (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Compressed input files; each must end in `.lz4`
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,
}

impl CliArgs {
    /// Display level after applying `-q` and `-v` to the default of 2.
    pub fn display_level(&self) -> u32 {
        let level = DEFAULT_DISPLAY_LEVEL + u32::from(self.verbose);
        level
            .saturating_sub(u32::from(self.quiet))
            .min(MAX_DISPLAY_LEVEL)
    }

    /// `true` when a benchmark count was given but there is nothing to
    /// benchmark (pass-through mode).
    pub fn bench_ignored(&self) -> bool {
        self.bench > 0 && self.files.is_empty()
    }

    /// Dispatcher options for this invocation.
    pub fn dispatch_options(&self) -> DispatchOptions<'static> {
        let progress = if self.display_level() >= PROGRESS_DISPLAY_LEVEL {
            ProgressTarget::Stderr
        } else {
            ProgressTarget::Hidden
        };
        DispatchOptions {
            bench: if self.files.is_empty() { 0 } else { self.bench },
            progress,
            suffix: LZ4_EXTENSION,
        }
    }
}

/// Parses the process arguments. Usage errors, `--help` and `--version`
/// terminate the process with clap's exit status.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Parses an explicit argument list; `argv[0]` is the program name.
pub fn parse_args_from<I, T>(argv: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(argv).map_err(|e| anyhow!("bad usage: {}", e.to_string().trim_end()))
}
