//! Command-line interface for the `lz4c` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings, the `DISPLAY_LEVEL` atomic and the display macros. |
//! | [`args`]      | `CliArgs` — clap-derived argument parsing and conversion into `DispatchOptions`. |
//!
//! Typical call sequence: [`args::parse_args`] → `set_display_level` →
//! [`crate::io::decompress`].

pub mod constants;
pub mod args;
