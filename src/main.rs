//! Pixelsummon - command-line tool that turns pixel art into summon commands

use std::process::ExitCode;

use pixelsummon::cli;

fn main() -> ExitCode {
    cli::run()
}
