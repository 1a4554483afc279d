//! Candidate orientations, the 90° coordinate transform, and candidate selection.
//!
//! A rotated candidate is tiled on the transposed screen (the *build frame*)
//! and then mapped back onto the real screen:
//!
//! ```text
//!     build frame (h × w)            screen frame (w × h)
//!     ┌──────────┬─────┐             ┌─────┬─────┐
//!     │ A        │ B   │  row 0      │ B   │ D   │
//!     ├──────────┼─────┤     ──►     ├─────┼─────┤
//!     │ C        │ D   │  row 1      │ A   │ C   │
//!     └──────────┴─────┘             │     │     │
//!                                    └─────┴─────┘
//! ```
//!
//! Rows of the build frame become columns of the screen, read bottom to top.

use serde::{Deserialize, Serialize};

use crate::catalog::TilingConfig;
use crate::layout::{Layout, Rect, Size, Warning, build};

/// Which way the cases are laid out relative to the screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Rows run along the screen width.
    #[default]
    Direct,
    /// Screen transposed before tiling, cells mapped back afterwards.
    Rotated,
}

impl Orientation {
    /// Both orientations, direct first.
    pub const ALL: [Self; 2] = [Self::Direct, Self::Rotated];

    /// Whether this orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self == Self::Rotated
    }

    /// Dimensions of `w × h` seen from this orientation's frame.
    pub fn transform_dimensions(self, w: u32, h: u32) -> Size {
        if self.swaps_axes() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }

    /// Map a rect from the build frame onto the screen.
    ///
    /// `screen_h` is the real screen height, which is the build frame's width
    /// for [`Rotated`](Self::Rotated). The rect must lie inside the build frame.
    pub fn transform_rect_to_screen(self, rect: Rect, screen_h: u32) -> Rect {
        let (rx, ry, rw, rh) = (rect.x, rect.y, rect.width, rect.height);
        match self {
            Self::Direct => rect,
            Self::Rotated => Rect::new(ry, screen_h - rx - rw, rh, rw),
        }
    }

    /// Inverse of [`transform_rect_to_screen`](Self::transform_rect_to_screen).
    ///
    /// The rect must lie inside the screen.
    pub fn transform_rect_to_build(self, rect: Rect, screen_h: u32) -> Rect {
        let (rx, ry, rw, rh) = (rect.x, rect.y, rect.width, rect.height);
        match self {
            Self::Direct => rect,
            Self::Rotated => Rect::new(screen_h - ry - rh, rx, rh, rw),
        }
    }
}

/// A layout in screen coordinates together with the orientation that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub layout: Layout,
    pub orientation: Orientation,
}

impl Candidate {
    pub fn missing_area(&self) -> u64 {
        self.layout.missing_area()
    }
}

/// Build one candidate in screen coordinates.
pub fn candidate(
    screen_w: u32,
    screen_h: u32,
    orientation: Orientation,
    config: &TilingConfig,
) -> Candidate {
    let frame = orientation.transform_dimensions(screen_w, screen_h);
    let mut layout = build(frame.width, frame.height, orientation, config);
    if orientation.swaps_axes() {
        for cell in &mut layout.cells {
            let rect = orientation.transform_rect_to_screen(cell.rect(), screen_h);
            cell.set_rect(rect);
        }
        for warning in &mut layout.warnings {
            if let Warning::UnpartitionableRow {
                x,
                y,
                width,
                height,
                ..
            } = warning
            {
                let rect = orientation
                    .transform_rect_to_screen(Rect::new(*x, *y, *width, *height), screen_h);
                *x = rect.x;
                *y = rect.y;
                *width = rect.width;
                *height = rect.height;
            }
        }
    }
    Candidate {
        layout,
        orientation,
    }
}

/// Tile the screen both ways and keep the better candidate.
pub fn choose(screen_w: u32, screen_h: u32, config: &TilingConfig) -> Candidate {
    let direct = candidate(screen_w, screen_h, Orientation::Direct, config);
    let rotated = candidate(screen_w, screen_h, Orientation::Rotated, config);
    select(direct, rotated)
}

/// Pick between two candidates.
///
/// A valid candidate beats an invalid one. Otherwise the smaller missing area
/// wins, and ties go to `direct`. Invalid results are still returned so the
/// caller always has something to show.
pub fn select(direct: Candidate, rotated: Candidate) -> Candidate {
    let direct_missing = direct.missing_area();
    let rotated_missing = rotated.missing_area();
    let take_rotated = match (direct.layout.valid, rotated.layout.valid) {
        (true, false) => false,
        (false, true) => true,
        _ => rotated_missing < direct_missing,
    };
    tracing::debug!(
        direct_valid = direct.layout.valid,
        direct_missing,
        rotated_valid = rotated.layout.valid,
        rotated_missing,
        take_rotated,
        "selected orientation"
    );
    if take_rotated { rotated } else { direct }
}
