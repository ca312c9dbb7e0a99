//! Build command implementation

use std::io::{self, Write};
use std::process::ExitCode;

use super::{fail, resolve_settings, SettingsArgs, EXIT_ERROR, EXIT_SUCCESS};
use crate::config::CliOverrides;
use crate::output::write_commands;
use crate::pipeline;

/// Run the build command
///
/// Prints the block usage report to stderr and the commands to stdout, one
/// per line. With `write_to_file` the commands also land in the output
/// directory as `message-{i}.txt`.
pub fn run_build(args: &SettingsArgs, overrides: CliOverrides, quiet: bool) -> ExitCode {
    let loaded = match resolve_settings(args, overrides) {
        Ok(loaded) => loaded,
        Err(e) => return fail(&e),
    };
    let settings = &loaded.settings;

    let conversion = match pipeline::run(settings) {
        Ok(conversion) => conversion,
        Err(e) => return fail(&e),
    };

    for line in conversion.batch.usage.report_lines() {
        eprintln!("{}", line);
    }
    eprintln!(
        "{} blocks in {} command(s)",
        conversion.batch.usage.total(),
        conversion.commands().len()
    );

    if settings.write_to_file {
        match write_commands(&settings.output_dir, conversion.commands()) {
            Ok(paths) => {
                eprintln!("Wrote {} file(s) to {}", paths.len(), settings.output_dir.display());
            }
            Err(e) => return fail(&e.into()),
        }
    }

    if !quiet {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for command in conversion.commands() {
            if let Err(e) = writeln!(out, "{}", command) {
                eprintln!("Error: Cannot write to stdout: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
