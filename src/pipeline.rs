//! End-to-end conversion: image -> label grid -> regions -> commands.
//!
//! [`convert_grid`] is the pure core over an already-classified grid.
//! [`run`] adds the image front end driven by [`Settings`].

use image::imageops::FilterType;
use image::RgbImage;
use std::path::Path;
use tracing::{debug, info};

use crate::command::{batch_entries, Batch, Envelope, MaxLength};
use crate::config::Settings;
use crate::error::PipelineError;
use crate::grid::{ColorLabel, LabelGrid};
use crate::merge::{find_regions, Region};
use crate::palette::Palette;
use crate::transform::{compose_entries, rotate_entries, Entry, RotationSettings};

/// Numeric and output options of the core.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Pixels per block
    pub pixel_size: f64,
    pub rotation: RotationSettings,
    pub max_length: MaxLength,
    pub envelope: Envelope,
}

impl ConvertOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            pixel_size: settings.pixel_size,
            rotation: settings.rotation_settings(),
            max_length: settings.max_length(),
            envelope: Envelope::block_display(),
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pixel_size: 16.0,
            rotation: RotationSettings::default(),
            max_length: MaxLength::Unbounded,
            envelope: Envelope::block_display(),
        }
    }
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Canvas size in pixels
    pub width: usize,
    pub height: usize,
    /// Label drawn as the full-canvas plate
    pub background: Option<ColorLabel>,
    pub regions: Vec<Region>,
    /// Rotated entries, background plate first
    pub entries: Vec<Entry>,
    pub batch: Batch,
}

impl Conversion {
    pub fn commands(&self) -> &[String] {
        &self.batch.commands
    }
}

/// Run the core over a classified grid whose background cells are already
/// set aside.
///
/// `width` and `height` size the background plate; `background` names its
/// block. Without a background label no plate is emitted.
pub fn convert_grid(
    grid: &LabelGrid,
    width: usize,
    height: usize,
    background: Option<ColorLabel>,
    options: &ConvertOptions,
) -> Conversion {
    let regions = find_regions(grid);
    let entries =
        compose_entries(width, height, options.pixel_size, background.as_ref(), &regions);
    let entries = rotate_entries(entries, &options.rotation);
    let batch = batch_entries(&entries, &options.envelope, options.max_length);

    info!(
        regions = regions.len(),
        entries = entries.len(),
        commands = batch.commands.len(),
        "converted grid"
    );

    Conversion { width, height, background, regions, entries, batch }
}

/// Move the dominant palette label of `grid` to the background, then
/// convert. The canvas size is taken from the grid.
pub fn convert_labels(mut grid: LabelGrid, palette: &Palette, options: &ConvertOptions) -> Conversion {
    let background = grid.extract_background(&palette.labels());
    debug!(background = ?background.as_ref().map(ColorLabel::as_str), "extracted background");

    let (width, height) = (grid.width(), grid.height());
    convert_grid(&grid, width, height, background, options)
}

/// Open an image as RGB, resized to `resize` if given.
pub fn load_image(path: &Path, resize: Option<(u32, u32)>) -> Result<RgbImage, PipelineError> {
    let image = image::open(path)
        .map_err(|source| PipelineError::Image { path: path.to_path_buf(), source })?;

    let image = match resize {
        Some((w, h)) => {
            debug!(from = ?(image.width(), image.height()), to = ?(w, h), "resizing image");
            image.resize_exact(w, h, FilterType::CatmullRom)
        }
        None => image,
    };
    Ok(image.to_rgb8())
}

/// Classify an image into a label grid.
pub fn classify(image: &RgbImage, palette: &Palette) -> LabelGrid {
    LabelGrid::from_image(image, palette)
}

/// Full run from validated settings.
pub fn run(settings: &Settings) -> Result<Conversion, PipelineError> {
    let palette = settings.colors.to_palette()?;
    let image = load_image(&settings.file_path, settings.resize())?;
    info!(
        path = %settings.file_path.display(),
        width = image.width(),
        height = image.height(),
        colors = palette.len(),
        "loaded image"
    );

    let grid = classify(&image, &palette);
    Ok(convert_labels(grid, &palette, &ConvertOptions::from_settings(settings)))
}
