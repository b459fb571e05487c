//! Dashboard configuration.
//!
//! Built-in defaults reproduce the fixed export layout; an optional JSON file
//! can override any field.

use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "BAC_DASHBOARD_CONFIG";
/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "bac_dashboard.json";
pub const DEFAULT_CSV_PATH: &str = "./raw_data/notes_bac_2024.csv";

/// Order of per-class rows and chart categories.
///
/// The default follows the class multi-select. A sorted `groupby` report lists
/// classes alphabetically; use `Alphabetical` to reproduce that layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrder {
    /// Order in which each class first appears in the cleaned data
    #[default]
    FirstSeen,
    /// Lexicographic order of class labels
    Alphabetical,
}

/// Settings for loading and aggregation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub csv_path: PathBuf,
    pub separator: char,
    pub decimal_comma: bool,
    pub group_order: GroupOrder,
    pub histogram_bins: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            separator: ';',
            decimal_comma: false,
            group_order: GroupOrder::FirstSeen,
            histogram_bins: 10,
        }
    }
}

impl Settings {
    /// Resolve settings from `$BAC_DASHBOARD_CONFIG`, then `./bac_dashboard.json`,
    /// then built-in defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }

        log::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Read settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DashboardError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from JSON text. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(text).map_err(|e| DashboardError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !self.separator.is_ascii() || self.separator == '"' || self.separator == '\n' {
            return Err(DashboardError::Config(format!(
                "separator must be a single ASCII character other than quote or newline, got {:?}",
                self.separator
            )));
        }
        if self.decimal_comma && self.separator == ',' {
            return Err(DashboardError::Config(
                "decimal_comma cannot be combined with ',' as separator".to_string(),
            ));
        }
        if self.histogram_bins == 0 {
            return Err(DashboardError::Config(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Separator as the byte expected by the CSV reader.
    pub fn separator_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.separator as u8
    }
}
