//! Case catalog, LED module size, and the immutable tiling configuration.
//!
//! A [`TilingConfig`] is built once (by hand, from a request, or from a TOML
//! file) and then shared read-only by every layout computation.
//!
//! # Example
//!
//! ```
//! use casetile::{CaseSpec, Size, TilingConfig};
//!
//! let config = TilingConfig::new(Size::new(1120, 640), Size::new(280, 160))
//!     .custom(CaseSpec::custom(560, 640).with_id("C560"))
//!     .missing_tolerance(0.1)
//!     .validated()
//!     .unwrap();
//!
//! assert_eq!(config.catalog.widths_for_height(640), vec![1120, 560]);
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::layout::{CellKind, Size};
use crate::orientation::Orientation;
use crate::partition::Tolerance;

/// Default fraction of a module dimension that is merged instead of reported missing.
pub const DEFAULT_MISSING_TOLERANCE: f64 = 0.1;

/// Whether a catalog entry is the distinguished standard case or a custom one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    Standard,
    #[default]
    Custom,
}

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub kind: CaseKind,
    /// Catalog reference of a custom case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl CaseSpec {
    /// A custom entry without an id.
    pub fn custom(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            kind: CaseKind::Custom,
            id: None,
        }
    }

    /// Attach a catalog id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Registry of the standard case and the custom cases available to a row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCatalog {
    pub standard: Size,
    #[serde(default)]
    pub custom: Vec<CaseSpec>,
}

impl CaseCatalog {
    /// A catalog with only the standard case.
    pub fn new(standard: Size) -> Self {
        Self {
            standard,
            custom: Vec::new(),
        }
    }

    /// The standard case as a catalog entry.
    pub fn standard_spec(&self) -> CaseSpec {
        CaseSpec {
            width: self.standard.width,
            height: self.standard.height,
            kind: CaseKind::Standard,
            id: None,
        }
    }

    /// Distinct widths usable in a row of `height`, largest first.
    ///
    /// The standard width is included only when `height` is the standard
    /// height.
    pub fn widths_for_height(&self, height: u32) -> Vec<u32> {
        let mut widths: Vec<u32> = self
            .custom
            .iter()
            .filter(|c| c.height == height && c.width > 0)
            .map(|c| c.width)
            .collect();
        if height == self.standard.height && self.standard.width > 0 {
            widths.push(self.standard.width);
        }
        widths.sort_unstable_by(|a, b| b.cmp(a));
        widths.dedup();
        widths
    }

    /// First custom entry of exactly this size.
    pub fn lookup(&self, width: u32, height: u32) -> Option<&CaseSpec> {
        self.custom
            .iter()
            .find(|c| c.width == width && c.height == height)
    }

    /// Cell kind (and catalog id) of a `width × height` segment.
    pub fn classify(&self, width: u32, height: u32) -> (CellKind, Option<String>) {
        if Size::new(width, height) == self.standard {
            return (CellKind::Standard, None);
        }
        match self.lookup(width, height) {
            Some(spec) => (CellKind::CustomPremade, spec.id.clone()),
            None => (CellKind::CustomNew, None),
        }
    }
}

/// Everything the tiling engine needs besides the screen size.
///
/// `module` is the LED module in the direct orientation; the rotated module
/// is always its transpose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilingConfig {
    pub catalog: CaseCatalog,
    pub module: Size,
    #[serde(default = "default_missing_tolerance")]
    pub missing_tolerance: f64,
}

fn default_missing_tolerance() -> f64 {
    DEFAULT_MISSING_TOLERANCE
}

impl Default for TilingConfig {
    /// 1120×640 standard case, 280×160 module, no custom cases, 10% tolerance.
    fn default() -> Self {
        Self::new(Size::new(1120, 640), Size::new(280, 160))
    }
}

impl TilingConfig {
    /// Configuration with an empty custom catalog and the default tolerance.
    pub fn new(standard: Size, module: Size) -> Self {
        Self {
            catalog: CaseCatalog::new(standard),
            module,
            missing_tolerance: DEFAULT_MISSING_TOLERANCE,
        }
    }

    /// Add a custom catalog entry.
    pub fn custom(mut self, spec: CaseSpec) -> Self {
        self.catalog.custom.push(spec);
        self
    }

    /// Set the tolerance fraction.
    pub fn missing_tolerance(mut self, fraction: f64) -> Self {
        self.missing_tolerance = fraction;
        self
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::from_fraction(self.missing_tolerance)
    }

    /// LED module size in the screen frame of `orientation`.
    pub fn module_for(&self, orientation: Orientation) -> Size {
        orientation.transform_dimensions(self.module.width, self.module.height)
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let standard = self.catalog.standard;
        if standard.is_empty() {
            return Err(ConfigError::ZeroCaseDimension { size: standard });
        }
        for spec in &self.catalog.custom {
            if spec.size().is_empty() {
                return Err(ConfigError::ZeroCaseDimension { size: spec.size() });
            }
            if spec.kind == CaseKind::Standard && spec.size() != standard {
                return Err(ConfigError::StandardMismatch {
                    standard,
                    entry: spec.size(),
                });
            }
        }
        if self.module.is_empty() {
            return Err(ConfigError::ZeroModuleDimension {
                module: self.module,
            });
        }
        if !standard.is_multiple_of(self.module) {
            return Err(ConfigError::ModuleMisaligned {
                standard,
                module: self.module,
            });
        }
        if !(0.0..0.5).contains(&self.missing_tolerance) {
            return Err(ConfigError::ToleranceOutOfRange(self.missing_tolerance));
        }
        Ok(())
    }

    /// Validate and return `self`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

/// Inconsistent tiling configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("case size {size} mm has a zero dimension")]
    ZeroCaseDimension { size: Size },
    #[error("module size {module} mm has a zero dimension")]
    ZeroModuleDimension { module: Size },
    #[error("standard case {standard} mm does not divide into {module} mm modules")]
    ModuleMisaligned { standard: Size, module: Size },
    #[error("rotated module {rotated} mm is not the transpose of direct module {direct} mm")]
    ModuleNotTransposed { direct: Size, rotated: Size },
    #[error("catalog entry {entry} mm is marked standard but the standard case is {standard} mm")]
    StandardMismatch { standard: Size, entry: Size },
    #[error("missing tolerance {0} is outside 0.0..0.5")]
    ToleranceOutOfRange(f64),
}

/// A named LED panel type with its power draw per square meter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelType {
    pub id: String,
    pub name: String,
    pub watt_per_m2: f64,
}

impl PanelType {
    pub fn new(id: impl Into<String>, name: impl Into<String>, watt_per_m2: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            watt_per_m2,
        }
    }

    /// The built-in panel list.
    pub fn defaults() -> Vec<Self> {
        alloc::vec![
            Self::new("panel1", "LED panel A", 550.0),
            Self::new("panel2", "LED panel B", 150.0),
            Self::new("panel3", "LED panel C", 200.0),
        ]
    }

    /// Estimated draw in watts for a screen of `screen` millimeters.
    pub fn consumption_watts(&self, screen: Size) -> f64 {
        crate::plan::consumption_watts(screen, self.watt_per_m2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn default_config_is_valid() {
        let config = TilingConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.catalog.standard, Size::new(1120, 640));
        assert_eq!(config.module, Size::new(280, 160));
        assert!(config.catalog.custom.is_empty());
    }

    #[test]
    fn widths_for_height_sorted_and_deduplicated() {
        let config = TilingConfig::default()
            .custom(CaseSpec::custom(560, 640))
            .custom(CaseSpec::custom(840, 640))
            .custom(CaseSpec::custom(560, 640).with_id("dup"))
            .custom(CaseSpec::custom(1120, 640))
            .custom(CaseSpec::custom(1120, 320));
        assert_eq!(config.catalog.widths_for_height(640), vec![1120, 840, 560]);
        assert_eq!(config.catalog.widths_for_height(320), vec![1120]);
        assert!(config.catalog.widths_for_height(20).is_empty());
    }

    #[test]
    fn classify_prefers_standard_then_catalog() {
        let config = TilingConfig::default()
            .custom(CaseSpec::custom(1120, 640).with_id("same-as-standard"))
            .custom(CaseSpec::custom(560, 640).with_id("C560"));
        let catalog = &config.catalog;
        assert_eq!(catalog.classify(1120, 640), (CellKind::Standard, None));
        assert_eq!(
            catalog.classify(560, 640),
            (CellKind::CustomPremade, Some(String::from("C560")))
        );
        assert_eq!(catalog.classify(1130, 640), (CellKind::CustomNew, None));
        assert_eq!(catalog.standard_spec().kind, CaseKind::Standard);
    }

    #[test]
    fn module_transposes_for_rotated() {
        let config = TilingConfig::default();
        assert_eq!(config.module_for(Orientation::Direct), Size::new(280, 160));
        assert_eq!(config.module_for(Orientation::Rotated), Size::new(160, 280));
    }

    #[test]
    fn validate_rejects_inconsistent_configs() {
        let zero_case = TilingConfig::default().custom(CaseSpec::custom(0, 640));
        assert!(matches!(
            zero_case.validate(),
            Err(ConfigError::ZeroCaseDimension { .. })
        ));

        let misaligned = TilingConfig::new(Size::new(1120, 640), Size::new(320, 160));
        assert_eq!(
            misaligned.validate(),
            Err(ConfigError::ModuleMisaligned {
                standard: Size::new(1120, 640),
                module: Size::new(320, 160),
            })
        );

        let zero_module = TilingConfig::new(Size::new(1120, 640), Size::new(0, 160));
        assert!(matches!(
            zero_module.validate(),
            Err(ConfigError::ZeroModuleDimension { .. })
        ));

        let mut fake_standard = CaseSpec::custom(560, 640);
        fake_standard.kind = CaseKind::Standard;
        assert!(matches!(
            TilingConfig::default().custom(fake_standard).validate(),
            Err(ConfigError::StandardMismatch { .. })
        ));
    }

    #[test]
    fn tolerance_range() {
        assert!(TilingConfig::default().missing_tolerance(0.0).validate().is_ok());
        assert!(TilingConfig::default().missing_tolerance(0.49).validate().is_ok());
        assert_eq!(
            TilingConfig::default().missing_tolerance(0.5).validate(),
            Err(ConfigError::ToleranceOutOfRange(0.5))
        );
        assert!(
            TilingConfig::default()
                .missing_tolerance(-0.1)
                .validate()
                .is_err()
        );
        assert!(
            TilingConfig::default()
                .missing_tolerance(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn default_panels_match_wattage_table() {
        let panels = PanelType::defaults();
        let watts: Vec<f64> = panels.iter().map(|p| p.watt_per_m2).collect();
        assert_eq!(watts, vec![550.0, 150.0, 200.0]);
        // 2 m × 1 m at 150 W/m²
        let draw = panels[1].consumption_watts(Size::new(2000, 1000));
        assert!((draw - 300.0).abs() < 1e-9);
    }
}
