//! Settings schema for `settings.json` / `pxs.toml`
//!
//! Defines the structure and validation rules for a conversion run.
//!
//! ```json
//! {
//!   "file_path": "art.png",
//!   "image_resize": [64, 64],
//!   "pixel_size": 16,
//!   "rotation": {"X": 0, "Y": 90, "Z": 0},
//!   "rotate_around_center": true,
//!   "max_length_command": 32500,
//!   "write_to_file": true,
//!   "colors": {
//!     "minecraft:white_concrete": "#CFD5D6",
//!     "minecraft:black_concrete": [8, 10, 15]
//!   }
//! }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

use crate::color::ColorSpec;
use crate::command::MaxLength;
use crate::palette::{Palette, PaletteError};
use crate::transform::{EulerAngles, RotationSettings};

/// Rotation section: `{"X": .., "Y": .., "Z": ..}` in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default, rename = "X")]
    pub x: f64,
    #[serde(default, rename = "Y")]
    pub y: f64,
    #[serde(default, rename = "Z")]
    pub z: f64,
}

/// Palette section: label -> color, in file order.
///
/// Order decides classification and background ties, so entries are kept
/// as a list rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorsConfig {
    pub entries: Vec<(String, ColorSpec)>,
}

impl ColorsConfig {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_palette(&self) -> Result<Palette, PaletteError> {
        Palette::from_specs(self.entries.iter().map(|(label, spec)| (label.as_str(), spec)))
    }
}

impl<'de> Deserialize<'de> for ColorsConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColorsVisitor;

        impl<'de> Visitor<'de> for ColorsVisitor {
            type Value = ColorsConfig;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of block labels to colors")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, spec)) = map.next_entry::<String, ColorSpec>()? {
                    entries.push((label, spec));
                }
                Ok(ColorsConfig { entries })
            }
        }

        deserializer.deserialize_map(ColorsVisitor)
    }
}

impl Serialize for ColorsConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, spec) in &self.entries {
            map.serialize_entry(label, spec)?;
        }
        map.end()
    }
}

/// A full conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Source image
    pub file_path: PathBuf,
    /// Resize target `[width, height]`; any `-1` keeps the original size
    #[serde(default = "default_image_resize")]
    pub image_resize: [i64; 2],
    /// Pixels per block
    pub pixel_size: f64,
    /// Rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationConfig>,
    /// Legacy top-level rotation keys, used when `rotation` is absent
    #[serde(default, rename = "X", skip_serializing_if = "is_zero")]
    pub legacy_x: f64,
    #[serde(default, rename = "Y", skip_serializing_if = "is_zero")]
    pub legacy_y: f64,
    #[serde(default, rename = "Z", skip_serializing_if = "is_zero")]
    pub legacy_z: f64,
    /// Rotate about the centroid of all blocks rather than the origin
    #[serde(default = "default_true")]
    pub rotate_around_center: bool,
    /// Maximum command length; `-1` for a single command
    pub max_length_command: i64,
    /// Write commands to `output_dir`
    #[serde(default)]
    pub write_to_file: bool,
    /// Where `write_to_file` puts `message-{i}.txt`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Palette
    pub colors: ColorsConfig,
}

fn default_image_resize() -> [i64; 2] {
    [-1, -1]
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

/// Settings validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "colors.minecraft:stone")
    pub field: String,
    /// Error message
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.field, self.message)
    }
}

impl Settings {
    /// A starter configuration for `pxs init`.
    pub fn example() -> Self {
        let colors = [
            ("minecraft:white_concrete", ColorSpec::from("#CFD5D6")),
            ("minecraft:light_gray_concrete", ColorSpec::from("#7D7D73")),
            ("minecraft:gray_concrete", ColorSpec::from("#373A3E")),
            ("minecraft:black_concrete", ColorSpec::from("#080A0F")),
            ("minecraft:red_concrete", ColorSpec::from("#8E2121")),
            ("minecraft:orange_concrete", ColorSpec::from("#E06101")),
            ("minecraft:yellow_concrete", ColorSpec::from("#F1AF15")),
            ("minecraft:lime_concrete", ColorSpec::from("#5EA919")),
            ("minecraft:green_concrete", ColorSpec::from("#495B24")),
            ("minecraft:light_blue_concrete", ColorSpec::from("#2489C7")),
            ("minecraft:blue_concrete", ColorSpec::from("#2D2F8F")),
            ("minecraft:purple_concrete", ColorSpec::from("#64209C")),
            ("minecraft:brown_concrete", ColorSpec::from("#603C20")),
        ];

        Self {
            file_path: PathBuf::from("image.png"),
            image_resize: [64, 64],
            pixel_size: 16.0,
            rotation: Some(RotationConfig::default()),
            legacy_x: 0.0,
            legacy_y: 0.0,
            legacy_z: 0.0,
            rotate_around_center: true,
            max_length_command: 32500,
            write_to_file: true,
            output_dir: default_output_dir(),
            colors: ColorsConfig {
                entries: colors.into_iter().map(|(l, c)| (l.to_string(), c)).collect(),
            },
        }
    }

    /// Validate the settings and return every problem found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.file_path.as_os_str().is_empty() {
            errors.push(ConfigValidationError::new("file_path", "must be a non-empty path"));
        }

        if !(self.pixel_size.is_finite() && self.pixel_size > 0.0) {
            errors.push(ConfigValidationError::new("pixel_size", "must be a positive number"));
        }

        for (axis, value) in self.image_resize.iter().enumerate() {
            if *value != -1 && (*value <= 0 || u32::try_from(*value).is_err()) {
                errors.push(ConfigValidationError::new(
                    format!("image_resize[{}]", axis),
                    "must be a positive size that fits in 32 bits, or -1",
                ));
            }
        }

        if MaxLength::from_setting(self.max_length_command).is_none() {
            errors.push(ConfigValidationError::new(
                "max_length_command",
                "must be a positive length or -1 for unbounded",
            ));
        }

        let angles = self.angles();
        if ![angles.x, angles.y, angles.z].iter().all(|a| a.is_finite()) {
            errors.push(ConfigValidationError::new("rotation", "angles must be finite numbers"));
        }

        if self.colors.is_empty() {
            errors.push(ConfigValidationError::new("colors", "must contain at least one color"));
        }
        for (label, spec) in &self.colors.entries {
            if label.is_empty() {
                errors.push(ConfigValidationError::new("colors", "labels must be non-empty"));
            }
            if let Err(e) = spec.to_rgb() {
                errors.push(ConfigValidationError::new(format!("colors.{}", label), e.to_string()));
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Rotation angles, from `rotation` or the legacy top-level keys.
    pub fn angles(&self) -> EulerAngles {
        match self.rotation {
            Some(r) => EulerAngles::new(r.x, r.y, r.z),
            None => EulerAngles::new(self.legacy_x, self.legacy_y, self.legacy_z),
        }
    }

    pub fn rotation_settings(&self) -> RotationSettings {
        RotationSettings { angles: self.angles(), about_center: self.rotate_around_center }
    }

    /// Maximum command length. Invalid values fall back to unbounded;
    /// `validate` rejects them before a run.
    pub fn max_length(&self) -> MaxLength {
        MaxLength::from_setting(self.max_length_command).unwrap_or_default()
    }

    /// Resize target, if resizing is enabled.
    pub fn resize(&self) -> Option<(u32, u32)> {
        match self.image_resize {
            [w, h] if w > 0 && h > 0 => Some((u32::try_from(w).ok()?, u32::try_from(h).ok()?)),
            _ => None,
        }
    }
}
