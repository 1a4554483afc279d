//! Final coverage and row-contiguity checks.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::layout::{Cell, Layout, Rect, Warning};
use crate::orientation::Orientation;

/// Check `layout` against the screen it claims to tile.
///
/// Problems turn the layout invalid and add warnings; cells are never
/// dropped or changed.
pub fn check(mut layout: Layout, orientation: Orientation, screen_w: u32, screen_h: u32) -> Layout {
    let expected = u64::from(screen_w) * u64::from(screen_h);
    let actual = layout.area();
    if actual != expected {
        layout.invalidate(Warning::CoverageMismatch { expected, actual });
    }

    for row in discontinuous_rows(&layout.cells, orientation, screen_w, screen_h) {
        layout.invalidate(Warning::RowDiscontinuity { row });
    }

    if !layout.valid {
        tracing::debug!(
            ?orientation,
            screen_w,
            screen_h,
            warnings = layout.warnings.len(),
            "layout failed validation"
        );
    }
    layout
}

/// Rows whose cells do not chain edge to edge across the build frame.
///
/// Cells are mapped back into the frame they were built in and grouped by
/// row. In every row the cells touching the row's top edge must run from 0 to
/// the frame width with no gap or overlap, and row bands must not overlap.
fn discontinuous_rows(
    cells: &[Cell],
    orientation: Orientation,
    screen_w: u32,
    screen_h: u32,
) -> Vec<u32> {
    let frame = orientation.transform_dimensions(screen_w, screen_h);
    let mut rows: BTreeMap<u32, Vec<Rect>> = BTreeMap::new();
    let mut broken = BTreeSet::new();

    for cell in cells {
        let rect = cell.rect();
        if !rect.fits_within(screen_w, screen_h) {
            broken.insert(cell.row);
            continue;
        }
        rows.entry(cell.row)
            .or_default()
            .push(orientation.transform_rect_to_build(rect, screen_h));
    }

    let mut bands: Vec<(u32, u32, u32)> = Vec::with_capacity(rows.len());
    for (row, rects) in &rows {
        let Some(top) = rects.iter().map(|r| r.y).min() else {
            continue;
        };
        let bottom = rects.iter().map(|r| r.y + r.height).max().unwrap_or(top);
        bands.push((top, bottom, *row));

        let mut line: Vec<&Rect> = rects.iter().filter(|r| r.y == top).collect();
        line.sort_by_key(|r| r.x);
        let mut cursor = 0u32;
        for rect in line {
            if rect.x != cursor {
                broken.insert(*row);
                break;
            }
            cursor = rect.x + rect.width;
        }
        if cursor != frame.width {
            broken.insert(*row);
        }
    }

    bands.sort_unstable();
    for pair in bands.windows(2) {
        let (_, above_bottom, above_row) = pair[0];
        let (below_top, _, below_row) = pair[1];
        if below_top < above_bottom {
            broken.insert(above_row);
            broken.insert(below_row);
        }
    }

    broken.into_iter().collect()
}
