//! Palette color values
//!
//! A palette entry in the settings file is either a CSS color string or an
//! `[r, g, b]` array:
//!
//! ```json
//! {
//!   "minecraft:white_concrete": "#CFD5D6",
//!   "minecraft:red_concrete": "rgb(142, 32, 32)",
//!   "minecraft:black_concrete": [8, 10, 15]
//! }
//! ```
//!
//! Hex strings are parsed directly; every other CSS form (named colors,
//! `rgb()`, `hsl()`, `hwb()`, `oklch()`) goes through lightningcss.
//! Alpha is dropped: classification only compares RGB.

use image::Rgb;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// A color as written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// CSS color string: `"#CFD5D6"`, `"white"`, `"rgb(8, 10, 15)"`
    Css(String),
    /// Channel array: `[8, 10, 15]`
    Channels([u8; 3]),
}

impl ColorSpec {
    /// Resolve to an RGB triple.
    pub fn to_rgb(&self) -> Result<Rgb<u8>, ColorError> {
        match self {
            ColorSpec::Css(s) => parse_color(s),
            ColorSpec::Channels(c) => Ok(Rgb(*c)),
        }
    }
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        ColorSpec::Css(s.to_string())
    }
}

/// Parse a CSS color string into an RGB color.
///
/// ```
/// use pixelsummon::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgb([255, 0, 0]));
/// assert_eq!(parse_color("#CFD5D6").unwrap(), image::Rgb([207, 213, 214]));
/// assert_eq!(parse_color("blue").unwrap(), image::Rgb([0, 0, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgb<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex_color(hex),
        None => parse_css_color(s),
    }
}

/// Parse the digits of a `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` color.
fn parse_hex_color(hex: &str) -> Result<Rgb<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    match digits.len() {
        // Short forms double each digit
        3 | 4 => Ok(Rgb([digits[0] * 17, digits[1] * 17, digits[2] * 17])),
        6 | 8 => Ok(Rgb([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        ])),
        n => Err(ColorError::InvalidLength(n)),
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgb<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("cannot convert '{}' to RGB", s)))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgb([rgba.red, rgba.green, rgba.blue])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgb([
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
