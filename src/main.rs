//! Binary entry point for the `lz4c` command-line tool.
//!
//! # Control flow
//!
//! 1. [`parse_args`] processes all flags into a [`CliArgs`] value.
//! 2. The display level is applied process-wide.
//! 3. [`run`] builds one decoder session, hands it to the batch dispatcher
//!    and turns the outcome into an exit code.

use std::process::ExitCode;

use lz4c::cli::args::{parse_args, CliArgs};
use lz4c::cli::constants::{set_display_level, COMPRESSOR_NAME};
use lz4c::io::STDIN_MARK;
use lz4c::{decompress, displaylevel, FrameDecoder, Source};

/// Runs the batch described by `args` and returns the process exit code.
fn run(args: &CliArgs) -> ExitCode {
    if args.bench_ignored() {
        displaylevel!(
            2,
            "Warning : benchmark mode needs input files; decoding stdin to stdout\n"
        );
    }

    let opts = args.dispatch_options();
    let mut decoder = FrameDecoder::<Source>::new();
    let outcome = decompress(&mut decoder, &args.files, &opts);

    match outcome.error {
        None => ExitCode::SUCCESS,
        Some(e) => {
            let context = match args.files.get(outcome.index) {
                Some(name) => format!("file #{} {}", outcome.index, name),
                None => STDIN_MARK.to_owned(),
            };
            displaylevel!(1, "{}: {}: {}\n", COMPRESSOR_NAME, context, e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = parse_args();
    set_display_level(args.display_level());
    run(&args)
}
