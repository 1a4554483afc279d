//! Screen tiling model and the row-wise layout builder.
//!
//! A screen is tiled top to bottom in rows of the standard case height. Each
//! full row is split into catalog widths by the [`partition`](crate::partition)
//! search; a shorter bottom row can only use custom entries of exactly that
//! height. Any residual width becomes a [`CellKind::Missing`] cell at the end
//! of its row, reported as [`Warning::UnpartitionableRow`].
//!
//! # Example
//!
//! ```
//! use casetile::{Orientation, TilingConfig, layout::build};
//!
//! let config = TilingConfig::default();
//! let layout = build(2240, 640, Orientation::Direct, &config);
//!
//! assert!(layout.valid);
//! assert_eq!(layout.cells.len(), 2);
//! assert_eq!(layout.missing_area(), 0);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{CaseCatalog, ConfigError, TilingConfig};
use crate::orientation::Orientation;
use crate::partition::{Tolerance, partition_with_missing};

/// Largest accepted screen dimension, in millimeters.
pub const MAX_DIMENSION_MM: u32 = 1_000_000;

/// Width × height dimensions in millimeters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in millimeters.
    pub width: u32,
    /// Height in millimeters.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Swap width and height.
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Area in square millimeters.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether both sides of `self` are whole multiples of `unit`.
    pub fn is_multiple_of(self, unit: Size) -> bool {
        !unit.is_empty() && self.width % unit.width == 0 && self.height % unit.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle in millimeter coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this rect lies entirely inside `(0, 0, max_w, max_h)`.
    pub fn fits_within(&self, max_w: u32, max_h: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(max_w)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(max_h)
    }

    /// Area in square millimeters.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// What occupies a cell of the final tiling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// The standard case.
    Standard,
    /// A custom case with an exact catalog match.
    CustomPremade,
    /// A custom size with no catalog entry (e.g. a tolerance-merged width).
    CustomNew,
    /// Uncovered gap.
    Missing,
    /// One LED module filling part of a former gap.
    ModuleFilled,
}

impl CellKind {
    /// Stable lowercase name, also used as the CSS class in SVG output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::CustomPremade => "custom-premade",
            Self::CustomNew => "custom-new",
            Self::Missing => "missing",
            Self::ModuleFilled => "module",
        }
    }

    /// Whether cells of this kind carry LED modules.
    pub fn counts_modules(self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// One rectangular region of a tiling, in absolute screen coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub kind: CellKind,
    /// Index of the tiling row this cell was built in.
    pub row: u32,
    /// Catalog id of a premade custom case, when the entry has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
}

impl Cell {
    /// Create a cell without a catalog id.
    pub fn new(rect: Rect, kind: CellKind, row: u32) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            kind,
            row,
            catalog_id: None,
        }
    }

    /// An uncovered gap.
    pub fn missing(rect: Rect, row: u32) -> Self {
        Self::new(rect, CellKind::Missing, row)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Move and resize the cell, keeping kind, row and catalog id.
    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn area(&self) -> u64 {
        self.rect().area()
    }
}

/// Recoverable problem found while building or checking a layout.
///
/// Warnings never abort a computation; the affected layout is still returned
/// so the defect can be visualized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Catalog widths cannot fill a row band, exactly or within tolerance.
    ///
    /// The rect is the whole row band, in screen coordinates.
    UnpartitionableRow {
        row: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// A row's emitted cells do not add up to the row width.
    RowWidthMismatch { row: u32, expected: u32, actual: u32 },
    /// Total cell area differs from the screen area.
    CoverageMismatch { expected: u64, actual: u64 },
    /// A row has gaps, overlaps, or cells outside its band.
    RowDiscontinuity { row: u32 },
    /// A gap could not be rounded into whole LED modules.
    UnresolvedModuleGap {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnpartitionableRow {
                row,
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "row {row}: no catalog combination fills the {width}×{height} mm band at ({x}, {y})"
            ),
            Self::RowWidthMismatch {
                row,
                expected,
                actual,
            } => write!(f, "row {row}: cells span {actual} mm, expected {expected} mm"),
            Self::CoverageMismatch { expected, actual } => write!(
                f,
                "coverage mismatch: cells cover {actual} mm², screen is {expected} mm²"
            ),
            Self::RowDiscontinuity { row } => write!(f, "row {row}: cells are not contiguous"),
            Self::UnresolvedModuleGap {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "gap {width}×{height} mm at ({x}, {y}) does not divide into whole modules"
            ),
        }
    }
}

/// A tiling of one screen: ordered cells, a validity flag, and warnings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub cells: Vec<Cell>,
    pub valid: bool,
    pub warnings: Vec<Warning>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// An empty, valid layout.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            valid: true,
            warnings: Vec::new(),
        }
    }

    /// Record a warning that makes the layout invalid.
    pub fn invalidate(&mut self, warning: Warning) {
        self.valid = false;
        self.warnings.push(warning);
    }

    /// Record a warning without touching validity.
    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// All warnings joined into one human-readable message.
    pub fn warning(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.warnings.iter().map(ToString::to_string).collect();
        Some(parts.join("; "))
    }

    /// Total area of all cells.
    pub fn area(&self) -> u64 {
        self.cells.iter().map(Cell::area).sum()
    }

    /// Total area of [`CellKind::Missing`] cells.
    pub fn missing_area(&self) -> u64 {
        self.cells
            .iter()
            .filter(|c| c.kind == CellKind::Missing)
            .map(Cell::area)
            .sum()
    }

    /// Number of cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}

/// Hard precondition failure. No layout is produced.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Screen width or height is zero or negative.
    #[error("screen dimensions must be positive, got {width}×{height} mm")]
    InvalidDimension { width: i64, height: i64 },
    /// Screen width or height exceeds [`MAX_DIMENSION_MM`].
    #[error("screen dimension {value} mm exceeds the {max} mm limit")]
    DimensionTooLarge { value: i64, max: u32 },
    /// The tiling configuration is inconsistent.
    #[error("invalid tiling configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Reject non-positive or oversized screen dimensions before any tiling.
pub fn check_dimensions(width: i64, height: i64) -> Result<Size, LayoutError> {
    if width <= 0 || height <= 0 {
        return Err(LayoutError::InvalidDimension { width, height });
    }
    for value in [width, height] {
        if value > i64::from(MAX_DIMENSION_MM) {
            return Err(LayoutError::DimensionTooLarge {
                value,
                max: MAX_DIMENSION_MM,
            });
        }
    }
    // Both values are in 1..=MAX_DIMENSION_MM, which fits u32.
    Ok(Size::new(width as u32, height as u32))
}

/// Tile a `screen_w × screen_h` area row by row in the build frame of
/// `orientation`.
///
/// Cases are laid out unrotated, so the row module is always the direct one;
/// the orientation only labels diagnostics. Rotated candidates are built with
/// swapped dimensions and mapped back by the caller (see
/// [`choose`](crate::orientation::choose)).
pub fn build(
    screen_w: u32,
    screen_h: u32,
    orientation: Orientation,
    config: &TilingConfig,
) -> Layout {
    let catalog = &config.catalog;
    let row_height = catalog.standard.height;
    let mut layout = Layout::new();

    if row_height == 0 {
        layout.invalidate(Warning::UnpartitionableRow {
            row: 0,
            x: 0,
            y: 0,
            width: screen_w,
            height: screen_h,
        });
        return layout;
    }

    let rows = RowTiler {
        catalog,
        width: screen_w,
        module_width: config.module.width,
        tolerance: config.tolerance(),
    };

    let full_rows = screen_h / row_height;
    let bottom_height = screen_h % row_height;

    let full_widths = catalog.widths_for_height(row_height);
    for row in 0..full_rows {
        rows.tile(&mut layout, row, row * row_height, row_height, &full_widths);
    }

    if bottom_height > 0 {
        let y = full_rows * row_height;
        let widths = catalog.widths_for_height(bottom_height);
        if widths.is_empty() {
            // Keep the band visible and accounted for.
            layout
                .cells
                .push(Cell::missing(Rect::new(0, y, screen_w, bottom_height), full_rows));
            layout.invalidate(Warning::UnpartitionableRow {
                row: full_rows,
                x: 0,
                y,
                width: screen_w,
                height: bottom_height,
            });
        } else {
            rows.tile(&mut layout, full_rows, y, bottom_height, &widths);
        }
    }

    tracing::debug!(
        ?orientation,
        screen_w,
        screen_h,
        cells = layout.cells.len(),
        missing = layout.missing_area(),
        valid = layout.valid,
        "built layout"
    );
    layout
}

/// Shared per-screen state for emitting rows.
struct RowTiler<'a> {
    catalog: &'a CaseCatalog,
    width: u32,
    module_width: u32,
    tolerance: Tolerance,
}

impl RowTiler<'_> {
    fn tile(&self, layout: &mut Layout, row: u32, y: u32, height: u32, widths: &[u32]) {
        let partition = partition_with_missing(self.width, widths, self.module_width, self.tolerance);

        let mut x = 0u32;
        for &segment in &partition.segments {
            let (kind, catalog_id) = self.catalog.classify(segment, height);
            let mut cell = Cell::new(Rect::new(x, y, segment, height), kind, row);
            cell.catalog_id = catalog_id;
            layout.cells.push(cell);
            x += segment;
        }
        if partition.missing > 0 {
            // Reported only; module filling decides what the gap becomes.
            layout.warn(Warning::UnpartitionableRow {
                row,
                x: 0,
                y,
                width: self.width,
                height,
            });
            layout
                .cells
                .push(Cell::missing(Rect::new(x, y, partition.missing, height), row));
            x += partition.missing;
        }

        if x != self.width {
            layout.invalidate(Warning::RowWidthMismatch {
                row,
                expected: self.width,
                actual: x,
            });
        }

        tracing::trace!(
            row,
            y,
            height,
            segments = partition.segments.len(),
            missing = partition.missing,
            "tiled row"
        );
    }
}
