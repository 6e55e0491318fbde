//! Everlax - command-line tool for generating drifting background keyframes

use std::process::ExitCode;

use everlax::cli;

fn main() -> ExitCode {
    cli::run()
}
