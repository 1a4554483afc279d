//! The layout contract: screen size and catalog in, tiled and checked result out.
//!
//! ```text
//!   choose ──► subdivide ──► check ──► metrics
//!   (both orientations)  (module grid)  (coverage, rows)
//! ```
//!
//! # Example
//!
//! ```
//! use casetile::{Orientation, TilingConfig, TilingStatus, plan};
//!
//! let result = plan(&TilingConfig::default(), 1400, 640).unwrap();
//!
//! assert_eq!(result.orientation, Orientation::Direct);
//! assert_eq!(result.status, TilingStatus::Exact);
//! // One standard case plus a 280 mm strip of four modules.
//! assert_eq!(result.total_modules, 20.0);
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    CaseCatalog, CaseSpec, ConfigError, DEFAULT_MISSING_TOLERANCE, TilingConfig,
};
use crate::layout::{Cell, CellKind, Layout, LayoutError, Size, Warning, check_dimensions};
use crate::orientation::{Orientation, choose};
use crate::subdivide::subdivide;
use crate::validate::check;

/// A layout request as sent by a presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilingRequest {
    pub screen_width_mm: i64,
    pub screen_height_mm: i64,
    pub standard_case_size: Size,
    #[serde(default)]
    pub custom_catalog: Vec<CaseSpec>,
    pub led_module_direct: Size,
    pub led_module_rotated: Size,
    #[serde(default = "default_missing_tolerance")]
    pub missing_tolerance: f64,
    /// Power draw of the selected panel type, for a consumption estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watt_per_m2: Option<f64>,
}

fn default_missing_tolerance() -> f64 {
    DEFAULT_MISSING_TOLERANCE
}

impl TilingRequest {
    /// A request for `width × height` using an existing configuration.
    pub fn new(width: i64, height: i64, config: &TilingConfig) -> Self {
        Self {
            screen_width_mm: width,
            screen_height_mm: height,
            standard_case_size: config.catalog.standard,
            custom_catalog: config.catalog.custom.clone(),
            led_module_direct: config.module_for(Orientation::Direct),
            led_module_rotated: config.module_for(Orientation::Rotated),
            missing_tolerance: config.missing_tolerance,
            watt_per_m2: None,
        }
    }

    /// Attach a consumption rate.
    pub fn watt_per_m2(mut self, watt_per_m2: f64) -> Self {
        self.watt_per_m2 = Some(watt_per_m2);
        self
    }

    /// The validated configuration this request describes.
    pub fn to_config(&self) -> Result<TilingConfig, ConfigError> {
        if self.led_module_rotated != self.led_module_direct.transposed() {
            return Err(ConfigError::ModuleNotTransposed {
                direct: self.led_module_direct,
                rotated: self.led_module_rotated,
            });
        }
        TilingConfig {
            catalog: CaseCatalog {
                standard: self.standard_case_size,
                custom: self.custom_catalog.clone(),
            },
            module: self.led_module_direct,
            missing_tolerance: self.missing_tolerance,
        }
        .validated()
    }
}

/// How usable a result is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TilingStatus {
    /// Valid and fully covered by cases and modules.
    Exact,
    /// Valid, but some gaps could not be filled.
    Degraded,
    /// Failed a tiling or validation invariant. Cells are best effort.
    Invalid,
}

impl TilingStatus {
    fn of(layout: &Layout) -> Self {
        if !layout.valid {
            Self::Invalid
        } else if layout.count(CellKind::Missing) > 0 {
            Self::Degraded
        } else {
            Self::Exact
        }
    }
}

/// The tiled screen plus derived metrics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TilingResult {
    pub screen: Size,
    pub orientation: Orientation,
    pub cells: Vec<Cell>,
    pub valid: bool,
    pub status: TilingStatus,
    /// All warnings as one message.
    pub warning: Option<String>,
    pub warnings: Vec<Warning>,
    /// LED modules across all non-gap cells.
    pub total_modules: f64,
    /// Area still uncovered after module filling, in mm².
    pub missing_area: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption_watts: Option<f64>,
}

impl TilingResult {
    /// Add a consumption estimate for a panel drawing `watt_per_m2`.
    pub fn with_consumption(mut self, watt_per_m2: f64) -> Self {
        self.consumption_watts = Some(consumption_watts(self.screen, watt_per_m2));
        self
    }

    /// Number of cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}

/// Validate a request and compute its layout.
pub fn compute_layout(request: &TilingRequest) -> Result<TilingResult, LayoutError> {
    let screen = check_dimensions(request.screen_width_mm, request.screen_height_mm)?;
    let config = request.to_config()?;
    let result = run(&config, screen);
    Ok(match request.watt_per_m2 {
        Some(rate) => result.with_consumption(rate),
        None => result,
    })
}

/// Compute the layout of a `screen_w × screen_h` screen.
pub fn plan(config: &TilingConfig, screen_w: u32, screen_h: u32) -> Result<TilingResult, LayoutError> {
    let screen = check_dimensions(i64::from(screen_w), i64::from(screen_h))?;
    config.validate()?;
    Ok(run(config, screen))
}

fn run(config: &TilingConfig, screen: Size) -> TilingResult {
    let candidate = choose(screen.width, screen.height, config);
    let orientation = candidate.orientation;
    let module = config.module_for(orientation);

    let layout = subdivide(candidate.layout, module, config.tolerance());
    let layout = check(layout, orientation, screen.width, screen.height);

    let status = TilingStatus::of(&layout);
    let warning = layout.warning();
    let total_modules = total_modules(&layout.cells, module);
    let missing_area = layout.missing_area();

    tracing::debug!(
        width = screen.width,
        height = screen.height,
        ?orientation,
        ?status,
        cells = layout.cells.len(),
        missing_area,
        "planned screen"
    );

    TilingResult {
        screen,
        orientation,
        cells: layout.cells,
        valid: layout.valid,
        status,
        warning,
        warnings: layout.warnings,
        total_modules,
        missing_area,
        consumption_watts: None,
    }
}

/// Modules per cell, `(w / mw) · (h / mh)`, summed over every non-gap cell.
///
/// Custom sizes that are not module multiples contribute fractional counts.
pub fn total_modules(cells: &[Cell], module: Size) -> f64 {
    if module.is_empty() {
        return 0.0;
    }
    let (mw, mh) = (f64::from(module.width), f64::from(module.height));
    cells
        .iter()
        .filter(|c| c.kind.counts_modules())
        .map(|c| (f64::from(c.width) / mw) * (f64::from(c.height) / mh))
        .sum()
}

/// Power draw in watts of a `screen` (mm) at `watt_per_m2`.
pub fn consumption_watts(screen: Size, watt_per_m2: f64) -> f64 {
    f64::from(screen.width) * f64::from(screen.height) * 1e-6 * watt_per_m2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use alloc::vec;

    fn request(width: i64, height: i64) -> TilingRequest {
        TilingRequest::new(width, height, &TilingConfig::default())
    }

    #[test]
    fn single_standard_case() {
        let result = compute_layout(&request(1120, 640)).unwrap();
        assert_eq!(result.orientation, Orientation::Direct);
        assert!(result.valid);
        assert_eq!(result.status, TilingStatus::Exact);
        assert_eq!(result.cells.len(), 1);
        assert_eq!(result.cells[0].kind, CellKind::Standard);
        assert_eq!(result.cells[0].rect(), Rect::new(0, 0, 1120, 640));
        assert_eq!(result.missing_area, 0);
        assert_eq!(result.total_modules, 16.0);
        assert_eq!(result.warning, None);
    }

    #[test]
    fn two_stacked_standard_cases() {
        let result = compute_layout(&request(1120, 1280)).unwrap();
        assert!(result.valid);
        let rects: Vec<Rect> = result.cells.iter().map(Cell::rect).collect();
        assert_eq!(
            rects,
            vec![Rect::new(0, 0, 1120, 640), Rect::new(0, 640, 1120, 640)]
        );
        assert_eq!(result.count(CellKind::Standard), 2);
    }

    #[test]
    fn residual_bottom_row_is_invalid() {
        let result = compute_layout(&request(1120, 660)).unwrap();
        assert!(!result.valid);
        assert_eq!(result.status, TilingStatus::Invalid);
        assert_eq!(result.orientation, Orientation::Direct);
        assert_eq!(
            result.warnings[0],
            Warning::UnpartitionableRow {
                row: 1,
                x: 0,
                y: 640,
                width: 1120,
                height: 20
            }
        );
        // The 20 mm band is also too thin for modules.
        assert!(matches!(
            result.warnings[1],
            Warning::UnresolvedModuleGap { .. }
        ));
        let warning = result.warning.unwrap();
        assert!(warning.contains("row 1: no catalog combination fills the 1120×20 mm band at (0, 640)"));
        // Every cell is still returned.
        assert_eq!(result.missing_area, 1120 * 20);
    }

    #[test]
    fn gap_filled_with_modules() {
        let result = compute_layout(&request(1400, 640)).unwrap();
        assert_eq!(result.status, TilingStatus::Exact);
        assert_eq!(result.count(CellKind::Standard), 1);
        assert_eq!(result.count(CellKind::ModuleFilled), 4);
        assert_eq!(result.missing_area, 0);
        assert_eq!(result.total_modules, 20.0);
        // Cases alone could not fill the row; modules did.
        assert_eq!(
            result.warnings,
            vec![Warning::UnpartitionableRow {
                row: 0,
                x: 0,
                y: 0,
                width: 1400,
                height: 640
            }]
        );
    }

    #[test]
    fn unfillable_gap_is_degraded() {
        let result = compute_layout(&request(1500, 640)).unwrap();
        assert!(result.valid);
        assert_eq!(result.status, TilingStatus::Degraded);
        assert_eq!(result.missing_area, 380 * 640);
        assert_eq!(
            result.warnings,
            vec![
                Warning::UnpartitionableRow {
                    row: 0,
                    x: 0,
                    y: 0,
                    width: 1500,
                    height: 640
                },
                Warning::UnresolvedModuleGap {
                    x: 1120,
                    y: 0,
                    width: 380,
                    height: 640
                },
            ]
        );
    }

    #[test]
    fn row_without_any_case_is_degraded() {
        let result = compute_layout(&request(200, 640)).unwrap();
        assert!(result.valid);
        assert_eq!(result.status, TilingStatus::Degraded);
        assert_eq!(result.count(CellKind::Missing), 1);
        assert!(matches!(
            result.warnings[..],
            [
                Warning::UnpartitionableRow {
                    row: 0,
                    width: 200,
                    height: 640,
                    ..
                },
                Warning::UnresolvedModuleGap { .. },
            ]
        ));
    }

    #[test]
    fn rotated_result_counts_rotated_modules() {
        let result = compute_layout(&request(640, 1120)).unwrap();
        assert_eq!(result.orientation, Orientation::Rotated);
        assert_eq!(result.status, TilingStatus::Exact);
        assert_eq!(result.total_modules, 16.0);
    }

    #[test]
    fn custom_catalog_from_request() {
        let mut req = request(1680, 960);
        req.custom_catalog = vec![
            CaseSpec::custom(560, 640).with_id("C560"),
            CaseSpec::custom(1120, 320).with_id("H320"),
            CaseSpec::custom(560, 320).with_id("Q320"),
        ];
        let result = compute_layout(&req).unwrap();
        assert_eq!(result.status, TilingStatus::Exact);
        assert_eq!(result.count(CellKind::Standard), 1);
        assert_eq!(result.count(CellKind::CustomPremade), 3);
        let ids: Vec<&str> = result
            .cells
            .iter()
            .filter_map(|c| c.catalog_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["C560", "H320", "Q320"]);
    }

    #[test]
    fn rejects_bad_dimensions_before_tiling() {
        assert_eq!(
            compute_layout(&request(0, 640)),
            Err(LayoutError::InvalidDimension {
                width: 0,
                height: 640
            })
        );
        assert!(matches!(
            compute_layout(&request(-1120, 640)),
            Err(LayoutError::InvalidDimension { .. })
        ));
        assert!(matches!(
            plan(&TilingConfig::default(), 1120, 0),
            Err(LayoutError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn rejects_untransposed_rotated_module() {
        let mut req = request(1120, 640);
        req.led_module_rotated = Size::new(280, 160);
        assert_eq!(
            compute_layout(&req),
            Err(LayoutError::Config(ConfigError::ModuleNotTransposed {
                direct: Size::new(280, 160),
                rotated: Size::new(280, 160),
            }))
        );
    }

    #[test]
    fn consumption_estimate() {
        let result = compute_layout(&request(2240, 1280).watt_per_m2(550.0)).unwrap();
        let watts = result.consumption_watts.unwrap();
        assert!((watts - 2.24 * 1.28 * 550.0).abs() < 1e-6);

        let result = compute_layout(&request(2240, 1280)).unwrap();
        assert_eq!(result.consumption_watts, None);
    }

    #[test]
    fn total_modules_is_fractional_for_odd_custom_sizes() {
        let cells = vec![
            Cell::new(Rect::new(0, 0, 1130, 640), CellKind::CustomNew, 0),
            Cell::missing(Rect::new(1130, 0, 100, 640), 0),
        ];
        let total = total_modules(&cells, Size::new(280, 160));
        assert!((total - 1130.0 / 280.0 * 4.0).abs() < 1e-9);
    }

    #[test]
    fn request_json_defaults_tolerance() {
        let json = r#"{
            "screen_width_mm": 1120,
            "screen_height_mm": 640,
            "standard_case_size": { "width": 1120, "height": 640 },
            "led_module_direct": { "width": 280, "height": 160 },
            "led_module_rotated": { "width": 160, "height": 280 }
        }"#;
        let req: TilingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.missing_tolerance, 0.1);
        assert!(req.custom_catalog.is_empty());
        assert!(compute_layout(&req).unwrap().valid);
    }

    #[test]
    fn result_json_shape() {
        let result = compute_layout(&request(1120, 660)).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["orientation"], "direct");
        assert_eq!(value["status"], "invalid");
        assert_eq!(value["valid"], false);
        assert_eq!(value["cells"][0]["kind"], "standard");
        assert_eq!(value["cells"][1]["kind"], "missing");
        assert_eq!(value["warnings"][0]["kind"], "unpartitionable_row");
        assert!(value["warning"].is_string());
        assert!(value.get("consumption_watts").is_none());
    }
}
