//! Filling residual gaps with whole LED modules.
//!
//! A [`Missing`](CellKind::Missing) cell whose sides are whole multiples of
//! the module, up to a sub-tolerance sliver, is replaced by a grid of
//! [`ModuleFilled`](CellKind::ModuleFilled) cells. The sliver is absorbed by
//! the last column and last row, so the grid always covers exactly the area
//! of the gap it replaces.

use alloc::vec::Vec;

use crate::layout::{Cell, CellKind, Layout, Rect, Size, Warning};
use crate::partition::Tolerance;

/// Replace every resolvable gap in `layout` with a module grid.
///
/// `module` must be expressed in the same frame as the cells. Gaps that
/// cannot be resolved stay [`Missing`](CellKind::Missing) and add an
/// [`UnresolvedModuleGap`](Warning::UnresolvedModuleGap) warning, which does
/// not change validity.
pub fn subdivide(layout: Layout, module: Size, tolerance: Tolerance) -> Layout {
    if module.is_empty() {
        return layout;
    }

    let Layout {
        cells,
        valid,
        mut warnings,
    } = layout;
    let mut out = Vec::with_capacity(cells.len());

    for cell in cells {
        if cell.kind != CellKind::Missing {
            out.push(cell);
            continue;
        }
        match module_grid(&cell, module, tolerance) {
            Some(grid) => {
                tracing::trace!(
                    x = cell.x,
                    y = cell.y,
                    modules = grid.len(),
                    "filled gap with modules"
                );
                out.extend(grid);
            }
            None => {
                tracing::debug!(
                    x = cell.x,
                    y = cell.y,
                    width = cell.width,
                    height = cell.height,
                    "gap does not divide into modules"
                );
                warnings.push(Warning::UnresolvedModuleGap {
                    x: cell.x,
                    y: cell.y,
                    width: cell.width,
                    height: cell.height,
                });
                out.push(cell);
            }
        }
    }

    Layout {
        cells: out,
        valid,
        warnings,
    }
}

/// Whole modules along one side, and the sliver left over.
fn resolve_axis(extent: u32, unit: u32, tolerance: Tolerance) -> Option<(u32, u32)> {
    let count = extent / unit;
    let remainder = extent % unit;
    if count == 0 {
        return None;
    }
    if remainder == 0 || tolerance.admits(remainder, unit) {
        Some((count, remainder))
    } else {
        None
    }
}

/// Row-major module grid tiling `cell`, or `None` if it does not fit.
fn module_grid(cell: &Cell, module: Size, tolerance: Tolerance) -> Option<Vec<Cell>> {
    let (cols, extra_w) = resolve_axis(cell.width, module.width, tolerance)?;
    let (rows, extra_h) = resolve_axis(cell.height, module.height, tolerance)?;

    let mut grid = Vec::with_capacity((cols as usize) * (rows as usize));
    for j in 0..rows {
        let height = if j + 1 == rows {
            module.height + extra_h
        } else {
            module.height
        };
        for i in 0..cols {
            let width = if i + 1 == cols {
                module.width + extra_w
            } else {
                module.width
            };
            let rect = Rect::new(
                cell.x + i * module.width,
                cell.y + j * module.height,
                width,
                height,
            );
            grid.push(Cell::new(rect, CellKind::ModuleFilled, cell.row));
        }
    }
    Some(grid)
}
