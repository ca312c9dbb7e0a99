//! Label grids: one palette label (or background) per pixel.
//!
//! Row 0 of a grid built from an image is the *bottom* row of the picture,
//! so the grid's y axis points up the same way the block world's does.

use image::RgbImage;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::palette::Palette;

/// Opaque palette key, e.g. `minecraft:white_concrete`.
///
/// Cheap to clone: every grid cell holds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorLabel(Arc<str>);

impl ColorLabel {
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label with any `namespace:` prefix removed, for display.
    pub fn display_name(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ColorLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for ColorLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ColorLabel {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Part of a colored area
    Color(ColorLabel),
    /// Not part of any region (covered by the background plate)
    Background,
}

impl Cell {
    pub fn label(&self) -> Option<&ColorLabel> {
        match self {
            Cell::Color(label) => Some(label),
            Cell::Background => None,
        }
    }

    pub fn is_background(&self) -> bool {
        matches!(self, Cell::Background)
    }
}

/// Rows of cells indexed `(y, x)`. Rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelGrid {
    rows: Vec<Vec<Cell>>,
}

impl LabelGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Classify every pixel of `image` against `palette`.
    ///
    /// Image row `h - 1 - y` becomes grid row `y`. Pixels are classified by
    /// RGB only.
    pub fn from_image(image: &RgbImage, palette: &Palette) -> Self {
        let (width, height) = image.dimensions();
        let rows = (0..height)
            .rev()
            .map(|py| {
                (0..width)
                    .map(|px| match palette.nearest(*image.get_pixel(px, py)) {
                        Some(entry) => Cell::Color(entry.label.clone()),
                        None => Cell::Background,
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Length of row `y`, or 0 past the last row.
    pub fn row_len(&self, y: usize) -> usize {
        self.rows.get(y).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    /// Cell at `(y, x)`, `None` when outside a (possibly short) row.
    pub fn get(&self, y: usize, x: usize) -> Option<&Cell> {
        self.rows.get(y).and_then(|row| row.get(x))
    }

    /// Label at `(y, x)`; `None` for background or missing cells.
    pub fn label_at(&self, y: usize, x: usize) -> Option<&ColorLabel> {
        self.get(y, x).and_then(Cell::label)
    }

    /// Count cells carrying `label`.
    pub fn count(&self, label: &ColorLabel) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.label() == Some(label))
            .count()
    }

    /// The most frequent label among `order`.
    ///
    /// Ties go to the label that comes first in `order`. Labels that never
    /// occur are not candidates, so a grid with no colored cells has none.
    pub fn dominant_label(&self, order: &[ColorLabel]) -> Option<ColorLabel> {
        let mut best: Option<(&ColorLabel, usize)> = None;
        for label in order {
            let count = self.count(label);
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label.clone())
    }

    /// Turn every `label` cell into background. Returns the number replaced.
    pub fn replace_with_background(&mut self, label: &ColorLabel) -> usize {
        let mut replaced = 0;
        for cell in self.rows.iter_mut().flatten() {
            if cell.label() == Some(label) {
                *cell = Cell::Background;
                replaced += 1;
            }
        }
        replaced
    }

    /// Pick the dominant label and move it to the background.
    pub fn extract_background(&mut self, order: &[ColorLabel]) -> Option<ColorLabel> {
        let label = self.dominant_label(order)?;
        self.replace_with_background(&label);
        Some(label)
    }
}

/// Build a grid from strings, one char per cell; `.` is background.
#[cfg(test)]
pub(crate) fn grid_from_chars(rows: &[&str]) -> LabelGrid {
    LabelGrid::new(
        rows.iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        '.' => Cell::Background,
                        c => Cell::Color(ColorLabel::from(c.to_string())),
                    })
                    .collect()
            })
            .collect(),
    )
}
