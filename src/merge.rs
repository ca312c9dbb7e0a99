//! Greedy rectangle decomposition of a label grid.
//!
//! Cells are scanned row-major. Each unclaimed colored cell seeds a rectangle
//! that first grows down as far as its column span allows, then grows right
//! as far as its row span allows. The result is not a minimum rectangle
//! count: growth order biases toward tall rectangles.

use serde::Serialize;
use tracing::debug;

use crate::grid::{ColorLabel, LabelGrid};

/// An axis-aligned rectangle of same-colored cells. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
    pub label: ColorLabel,
}

impl Region {
    /// Columns covered.
    pub fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    /// Rows covered.
    pub fn height(&self) -> usize {
        self.y1 - self.y0 + 1
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }
}

/// Cells already taken by an earlier rectangle. Mirrors the grid's shape.
#[derive(Debug, Clone)]
pub struct ClaimedCells {
    rows: Vec<Vec<bool>>,
}

impl ClaimedCells {
    pub fn for_grid(grid: &LabelGrid) -> Self {
        Self { rows: grid.rows().iter().map(|row| vec![false; row.len()]).collect() }
    }

    /// Missing cells report as claimed so they never join a rectangle.
    pub fn is_claimed(&self, y: usize, x: usize) -> bool {
        self.rows.get(y).and_then(|row| row.get(x)).copied().unwrap_or(true)
    }

    /// Claim every in-grid cell of the rectangle.
    fn claim(&mut self, y0: usize, y1: usize, x0: usize, x1: usize) {
        for row in self.rows.iter_mut().take(y1 + 1).skip(y0) {
            let end = (x1 + 1).min(row.len());
            if x0 < end {
                row[x0..end].fill(true);
            }
        }
    }
}

/// Decompose `grid` into disjoint same-colored rectangles.
///
/// Background cells are never covered. Every emitted region's cells carry
/// its label and no cell belongs to two regions.
pub fn find_regions(grid: &LabelGrid) -> Vec<Region> {
    let mut claimed = ClaimedCells::for_grid(grid);
    let mut regions = Vec::new();

    for y in 0..grid.height() {
        for x in 0..grid.row_len(y) {
            if claimed.is_claimed(y, x) || grid.label_at(y, x).is_none() {
                continue;
            }
            if let Some(region) = grow_region(grid, &mut claimed, y, x) {
                regions.push(region);
            }
        }
    }

    debug!(
        regions = regions.len(),
        cells = regions.iter().map(Region::area).sum::<usize>(),
        "decomposed label grid"
    );
    regions
}

/// Grow a rectangle from the seed cell `(y, x)` and claim its cells.
///
/// Returns `None` when the seed is background or missing, or when the grown
/// rectangle fails re-validation. The cells stay claimed either way.
pub fn grow_region(
    grid: &LabelGrid,
    claimed: &mut ClaimedCells,
    y: usize,
    x: usize,
) -> Option<Region> {
    let label = grid.label_at(y, x)?.clone();
    let matches =
        |cy: usize, cx: usize| !claimed.is_claimed(cy, cx) && grid.label_at(cy, cx) == Some(&label);

    let (y0, x0) = (y, x);
    let (mut y1, mut x1) = (y, x);

    // Rows first
    while y1 + 1 < grid.height() && (x0..=x1).all(|cx| matches(y1 + 1, cx)) {
        y1 += 1;
    }

    // Then columns
    while (y0..=y1).all(|cy| matches(cy, x1 + 1)) {
        x1 += 1;
    }

    claimed.claim(y0, y1, x0, x1);

    let uniform = (y0..=y1).all(|cy| (x0..=x1).all(|cx| grid.label_at(cy, cx) == Some(&label)));
    if !uniform {
        debug!(x0, y0, x1, y1, label = %label, "dropping non-uniform region");
        return None;
    }

    Some(Region { x0, y0, x1, y1, label })
}
