//! Ordered block palette and nearest-color classification.

use image::Rgb;
use thiserror::Error;

use crate::color::{ColorError, ColorSpec};
use crate::grid::ColorLabel;

/// Error building a palette from settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// A color value could not be parsed
    #[error("invalid color for '{label}': {source}")]
    InvalidColor {
        label: String,
        #[source]
        source: ColorError,
    },
    /// The palette has no entries
    #[error("palette is empty")]
    Empty,
}

/// A single palette entry: a block label and the color it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub label: ColorLabel,
    pub color: Rgb<u8>,
}

/// Palette entries in insertion order.
///
/// Order matters twice: the first entry wins equal-distance classification
/// ties, and the first entry wins equal-count background ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a palette from `(label, color)` pairs as read from settings.
    pub fn from_specs<'a, I>(specs: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = (&'a str, &'a ColorSpec)>,
    {
        let mut palette = Self::new();
        for (label, spec) in specs {
            let color = spec.to_rgb().map_err(|source| PaletteError::InvalidColor {
                label: label.to_string(),
                source,
            })?;
            palette.push(label, color);
        }

        if palette.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(palette)
    }

    /// Append an entry. A label that is already present keeps its first
    /// position and takes the new color.
    pub fn push(&mut self, label: impl Into<ColorLabel>, color: Rgb<u8>) {
        let label = label.into();
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(existing) => existing.color = color,
            None => self.entries.push(PaletteEntry { label, color }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> Vec<ColorLabel> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    /// Find the entry closest to `color` by Euclidean RGB distance.
    ///
    /// Returns `None` only for an empty palette.
    pub fn nearest(&self, color: Rgb<u8>) -> Option<&PaletteEntry> {
        let mut best: Option<(&PaletteEntry, u32)> = None;
        for entry in &self.entries {
            let distance = distance_sq(entry.color, color);
            // Strict comparison: earlier entries win ties
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((entry, distance));
            }
        }
        best.map(|(entry, _)| entry)
    }
}

/// Squared Euclidean distance between two RGB colors.
///
/// Ordering by squared distance is the same as ordering by distance.
fn distance_sq(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw_palette() -> Palette {
        let mut palette = Palette::new();
        palette.push("minecraft:white_concrete", Rgb([255, 255, 255]));
        palette.push("minecraft:black_concrete", Rgb([0, 0, 0]));
        palette
    }

    #[test]
    fn test_nearest_picks_closest() {
        let palette = bw_palette();
        let near_white = palette.nearest(Rgb([200, 210, 220])).unwrap();
        assert_eq!(near_white.label.as_str(), "minecraft:white_concrete");

        let near_black = palette.nearest(Rgb([20, 5, 40])).unwrap();
        assert_eq!(near_black.label.as_str(), "minecraft:black_concrete");
    }

    #[test]
    fn test_nearest_tie_goes_to_first_entry() {
        let mut palette = Palette::new();
        palette.push("a", Rgb([0, 0, 0]));
        palette.push("b", Rgb([20, 0, 0]));
        // Exactly halfway between the two
        let hit = palette.nearest(Rgb([10, 0, 0])).unwrap();
        assert_eq!(hit.label.as_str(), "a");
    }

    #[test]
    fn test_nearest_empty_palette() {
        assert!(Palette::new().nearest(Rgb([1, 2, 3])).is_none());
    }

    #[test]
    fn test_push_duplicate_keeps_position() {
        let mut palette = bw_palette();
        palette.push("minecraft:white_concrete", Rgb([250, 250, 250]));
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.entries()[0].color, Rgb([250, 250, 250]));
    }

    #[test]
    fn test_from_specs() {
        let white = ColorSpec::from("#FFFFFF");
        let black = ColorSpec::Channels([0, 0, 0]);
        let palette = Palette::from_specs([("w", &white), ("k", &black)]).unwrap();
        let labels: Vec<_> = palette.labels().iter().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["w", "k"]);
    }

    #[test]
    fn test_from_specs_errors() {
        let bad = ColorSpec::from("#XYZ");
        let err = Palette::from_specs([("bad", &bad)]).unwrap_err();
        assert!(matches!(err, PaletteError::InvalidColor { ref label, .. } if label == "bad"));

        let none: Vec<(&str, &ColorSpec)> = Vec::new();
        assert_eq!(Palette::from_specs(none), Err(PaletteError::Empty));
    }
}
