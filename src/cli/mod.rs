//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod init;
mod regions;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::{load_settings, merge_cli_overrides, CliOverrides, LoadedSettings};
use crate::error::PipelineError;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Pixelsummon - turn pixel art into Minecraft block_display summon commands
#[derive(Parser)]
#[command(name = "pxs")]
#[command(about = "Pixelsummon - turn pixel art into Minecraft block_display summon commands")]
#[command(version)]
pub struct Cli {
    /// Log more (-v for debug, -vv for trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where settings come from and the values most often overridden.
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Settings file (.json or .toml). Default: settings.json or pxs.toml,
    /// searched upward from the current directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source image (overrides file_path)
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Pixels per block (overrides pixel_size)
    #[arg(long)]
    pub pixel_size: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an image into summon commands
    Build {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Maximum command length, -1 for a single command (overrides max_length_command)
        #[arg(long, allow_negative_numbers = true)]
        max_length: Option<i64>,

        /// Rotation in degrees around X, Y and Z (overrides rotation)
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        rotate: Option<Vec<f64>>,

        /// Rotate about the origin instead of the center of the picture
        #[arg(long)]
        no_center: bool,

        /// Write commands to the output directory
        #[arg(short, long)]
        write: bool,

        /// Output directory (overrides output_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Do not print commands to stdout
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show how an image decomposes into blocks
    Regions {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a starter settings file
    Init {
        /// Settings file to create (.json or .toml, default: settings.json)
        path: Option<PathBuf>,
    },
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when running under a test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load settings and apply command-line overrides.
pub(crate) fn resolve_settings(
    args: &SettingsArgs,
    extra: CliOverrides,
) -> Result<LoadedSettings, PipelineError> {
    let mut loaded = load_settings(args.config.as_deref())?;
    let overrides =
        CliOverrides { image: args.image.clone(), pixel_size: args.pixel_size, ..extra };
    merge_cli_overrides(&mut loaded.settings, &overrides)?;
    tracing::debug!(path = %loaded.path.display(), "using settings");
    Ok(loaded)
}

/// Report a failed run and pick the exit code.
pub(crate) fn fail(err: &PipelineError) -> ExitCode {
    eprintln!("Error: {}", err);
    if err.is_config_error() {
        ExitCode::from(EXIT_INVALID_ARGS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { settings, max_length, rotate, no_center, write, out, quiet } => {
            let overrides = CliOverrides {
                max_length,
                rotation: rotate.map(|r| [r[0], r[1], r[2]]),
                no_center,
                write,
                out,
                ..Default::default()
            };
            build::run_build(&settings, overrides, quiet)
        }
        Commands::Regions { settings, json } => regions::run_regions(&settings, json),
        Commands::Init { path } => init::run_init(path.as_deref()),
    }
}
