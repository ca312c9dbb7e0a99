//! Block transforms and whole-assembly rotation.
//!
//! Every block is a unit cube placed by a 4x4 affine matrix (row-major,
//! translation in column 3). Regions become scale+translate matrices; the
//! assembly is then rotated as one piece, optionally about the centroid of
//! all block translations.

use rayon::prelude::*;
use std::ops::Mul;
use tracing::debug;

use crate::grid::ColorLabel;
use crate::merge::Region;

/// X offset of the background plate, keeping it off the foreground plane.
pub const BACKGROUND_OFFSET: f64 = 0.002;

/// A 4x4 affine transform, stored row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub m: [[f64; 4]; 4],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        m: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]],
    };

    pub fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    /// Axis-aligned scale followed by a translation.
    pub fn scale_translate(scale: [f64; 3], translation: [f64; 3]) -> Self {
        let mut t = Self::IDENTITY;
        for axis in 0..3 {
            t.m[axis][axis] = scale[axis];
            t.m[axis][3] = translation[axis];
        }
        t
    }

    pub fn translation_matrix(translation: [f64; 3]) -> Self {
        Self::scale_translate([1.0; 3], translation)
    }

    /// Right-handed rotation about the X axis.
    pub fn rotation_x(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about the Y axis.
    pub fn rotation_y(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about the Z axis.
    pub fn rotation_z(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// `Rz * Ry * Rx`: X is applied first, then Y, then Z.
    pub fn euler(angles: EulerAngles) -> Self {
        Self::rotation_z(angles.z) * (Self::rotation_y(angles.y) * Self::rotation_x(angles.x))
    }

    pub fn translation(&self) -> [f64; 3] {
        [self.m[0][3], self.m[1][3], self.m[2][3]]
    }

    /// All sixteen components, row by row.
    pub fn to_row_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.m.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        out
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Transform, epsilon: f64) -> bool {
        self.to_row_major()
            .iter()
            .zip(other.to_row_major().iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        let mut out = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.m[i][k] * rhs.m[k][j];
                }
                out[i][j] = sum;
            }
        }
        Transform { m: out }
    }
}

/// Rotation angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerAngles {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// How the assembly is rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSettings {
    pub angles: EulerAngles,
    /// Rotate about the pivot instead of the origin
    pub about_center: bool,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self { angles: EulerAngles::default(), about_center: true }
    }
}

/// A block ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub label: ColorLabel,
    pub transform: Transform,
}

/// The full-canvas plate standing in for the background color.
pub fn background_transform(width: usize, height: usize, pixel_size: f64) -> Transform {
    Transform::scale_translate(
        [1.0 / pixel_size, height as f64 / pixel_size, width as f64 / pixel_size],
        [BACKGROUND_OFFSET, 0.0, 0.0],
    )
}

/// Scale and place a unit block over `region`.
///
/// Grid rows run along the block y axis and grid columns along z; x is the
/// thickness of the picture.
pub fn region_transform(region: &Region, pixel_size: f64) -> Transform {
    debug_assert!(region.x0 <= region.x1 && region.y0 <= region.y1, "inverted region {:?}", region);
    Transform::scale_translate(
        [
            1.0 / pixel_size,
            region.height() as f64 / pixel_size,
            region.width() as f64 / pixel_size,
        ],
        [0.0, region.y0 as f64 / pixel_size, region.x0 as f64 / pixel_size],
    )
}

/// Build the unrotated entries: the background plate (if any) first, then
/// one entry per region in order.
pub fn compose_entries(
    width: usize,
    height: usize,
    pixel_size: f64,
    background: Option<&ColorLabel>,
    regions: &[Region],
) -> Vec<Entry> {
    let plate = background.map(|label| Entry {
        label: label.clone(),
        transform: background_transform(width, height, pixel_size),
    });

    plate
        .into_iter()
        .chain(regions.iter().map(|region| Entry {
            label: region.label.clone(),
            transform: region_transform(region, pixel_size),
        }))
        .collect()
}

/// Mean translation of `entries`, or the origin when there are none.
pub fn pivot(entries: &[Entry]) -> [f64; 3] {
    if entries.is_empty() {
        return [0.0; 3];
    }

    let mut sum = [0.0; 3];
    for entry in entries {
        let t = entry.transform.translation();
        for axis in 0..3 {
            sum[axis] += t[axis];
        }
    }

    let n = entries.len() as f64;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// The transform left-multiplied onto every entry.
///
/// About the center this is `T(pivot) * R * T(-pivot)`, otherwise just `R`.
pub fn rotation_about(pivot: [f64; 3], settings: &RotationSettings) -> Transform {
    let rotation = Transform::euler(settings.angles);
    if !settings.about_center {
        return rotation;
    }

    let [px, py, pz] = pivot;
    Transform::translation_matrix(pivot) * (rotation * Transform::translation_matrix([-px, -py, -pz]))
}

/// Rotate every entry as one assembly. Entry order is preserved.
pub fn rotate_entries(entries: Vec<Entry>, settings: &RotationSettings) -> Vec<Entry> {
    let center = pivot(&entries);
    let total = rotation_about(center, settings);
    debug!(pivot = ?center, angles = ?settings.angles, about_center = settings.about_center, "rotating assembly");

    entries
        .into_par_iter()
        .map(|entry| Entry { transform: total * entry.transform, ..entry })
        .collect()
}
