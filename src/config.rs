//! TOML configuration file: catalog, module size, tolerance, and panel types.
//!
//! Every key is optional; missing keys fall back to the built-in defaults.
//!
//! ```toml
//! missing_tolerance = 0.1
//!
//! [standard]
//! width = 1120
//! height = 640
//!
//! [module]
//! width = 280
//! height = 160
//!
//! [[custom]]
//! width = 560
//! height = 640
//! id = "C560"
//!
//! [[panels]]
//! id = "panel1"
//! name = "LED panel A"
//! watt_per_m2 = 550.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{CaseCatalog, CaseSpec, ConfigError, PanelType, TilingConfig};
use crate::layout::Size;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub standard: Size,
    pub module: Size,
    pub missing_tolerance: f64,
    pub custom: Vec<CaseSpec>,
    pub panels: Vec<PanelType>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let tiling = TilingConfig::default();
        Self {
            standard: tiling.catalog.standard,
            module: tiling.module,
            missing_tolerance: tiling.missing_tolerance,
            custom: tiling.catalog.custom,
            panels: PanelType::defaults(),
        }
    }
}

impl ConfigFile {
    /// Load a configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            custom_cases = config.custom.len(),
            panels = config.panels.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(content)?)
    }

    /// The validated tiling configuration.
    pub fn tiling_config(&self) -> Result<TilingConfig, ConfigFileError> {
        TilingConfig {
            catalog: CaseCatalog {
                standard: self.standard,
                custom: self.custom.clone(),
            },
            module: self.module,
            missing_tolerance: self.missing_tolerance,
        }
        .validated()
        .map_err(ConfigFileError::Invalid)
    }

    /// Panel type by id.
    pub fn panel(&self, id: &str) -> Result<&PanelType, ConfigFileError> {
        self.panels
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ConfigFileError::UnknownPanel(id.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(ConfigError),
    #[error("unknown panel type '{0}'")]
    UnknownPanel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ConfigFile::from_toml_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.tiling_config().unwrap(), TilingConfig::default());
        assert_eq!(config.panels.len(), 3);
    }

    #[test]
    fn parses_catalog_and_panels() {
        let config = ConfigFile::from_toml_str(
            r#"
            missing_tolerance = 0.05

            [standard]
            width = 1000
            height = 500

            [module]
            width = 250
            height = 125

            [[custom]]
            width = 500
            height = 500
            id = "half"

            [[custom]]
            width = 1000
            height = 250

            [[panels]]
            id = "outdoor"
            name = "Outdoor"
            watt_per_m2 = 800.0
            "#,
        )
        .unwrap();

        let tiling = config.tiling_config().unwrap();
        assert_eq!(tiling.catalog.standard, Size::new(1000, 500));
        assert_eq!(tiling.catalog.widths_for_height(500), vec![1000, 500]);
        assert_eq!(tiling.catalog.custom[0].id.as_deref(), Some("half"));
        assert_eq!(tiling.catalog.custom[1].id, None);
        assert_eq!(tiling.missing_tolerance, 0.05);

        assert_eq!(config.panel("outdoor").unwrap().watt_per_m2, 800.0);
        assert!(matches!(
            config.panel("panel1"),
            Err(ConfigFileError::UnknownPanel(id)) if id == "panel1"
        ));
    }

    #[test]
    fn invalid_values_are_reported() {
        let config = ConfigFile::from_toml_str(
            r#"
            [module]
            width = 300
            height = 160
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.tiling_config(),
            Err(ConfigFileError::Invalid(ConfigError::ModuleMisaligned { .. }))
        ));

        assert!(matches!(
            ConfigFile::from_toml_str("missing_tolerance = \"lots\""),
            Err(ConfigFileError::Parse(_))
        ));
    }
}
