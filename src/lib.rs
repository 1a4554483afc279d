//! LED-screen case tiling: which cases and modules cover a screen of a given size.
//!
//! A screen is tiled in rows of the standard case height, using the standard
//! case plus a catalog of custom sizes, in both orientations. The better
//! candidate is kept, residual gaps are filled with whole LED modules, and the
//! result is checked for exact coverage.
//!
//! Pure geometry, `no_std` compatible (with `alloc`).
//!
//! # Modules
//!
//! - [`catalog`]: Case catalog, module size, tiling configuration, panel types
//! - [`partition`]: Exact and tolerant row partitioning over catalog widths
//! - [`layout`]: Cells, warnings, and the row-wise layout builder
//! - [`orientation`]: Direct/rotated candidates and the coordinate transform
//! - [`subdivide`]: Filling gaps with LED modules
//! - [`validate`]: Coverage and row-contiguity checks
//! - [`plan`](mod@plan): The end-to-end layout contract and derived metrics
//! - `svg`: SVG rendering of a result (feature `svg`)
//! - `config`: TOML configuration files (feature `config`)
//!
//! # Example
//!
//! ```
//! use casetile::{CaseSpec, CellKind, TilingConfig, TilingStatus, plan};
//!
//! let config = TilingConfig::default().custom(CaseSpec::custom(560, 640).with_id("C560"));
//! let result = plan(&config, 1680, 1280).unwrap();
//!
//! assert_eq!(result.status, TilingStatus::Exact);
//! assert_eq!(result.count(CellKind::Standard), 2);
//! assert_eq!(result.count(CellKind::CustomPremade), 2);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod catalog;
#[cfg(feature = "config")]
pub mod config;
pub mod layout;
pub mod orientation;
pub mod partition;
pub mod plan;
pub mod subdivide;
#[cfg(feature = "svg")]
pub mod svg;
pub mod validate;

pub use catalog::{
    CaseCatalog, CaseKind, CaseSpec, ConfigError, DEFAULT_MISSING_TOLERANCE, PanelType,
    TilingConfig,
};
pub use layout::{
    Cell, CellKind, Layout, LayoutError, MAX_DIMENSION_MM, Rect, Size, Warning, check_dimensions,
};
pub use orientation::{Candidate, Orientation};
pub use partition::{Partition, Tolerance, partition_exact, partition_with_missing};
pub use plan::{
    TilingRequest, TilingResult, TilingStatus, compute_layout, consumption_watts, plan,
    total_modules,
};
