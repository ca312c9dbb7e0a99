//! Crate-level error type for a conversion run

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::output::OutputError;
use crate::palette::PaletteError;

/// Anything that can stop a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Settings could not be loaded or are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Palette colors could not be resolved
    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),
    /// Source image could not be opened or decoded
    #[error("Cannot open image '{}': {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Commands could not be written
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

impl PipelineError {
    /// Whether the failure is a problem with the user's settings rather
    /// than with the run itself.
    pub fn is_config_error(&self) -> bool {
        matches!(self, PipelineError::Config(_) | PipelineError::Palette(_))
    }
}
