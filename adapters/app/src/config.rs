//! `wordgrid.toml` configuration.
//!
//! Every key is optional; missing keys fall back to the built-in constants.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use wordgrid_core::{
    CellSize, CELL_HEIGHT, CELL_WIDTH, MAX_INITIAL_COLUMNS, MAX_INITIAL_ROWS, MAX_TABLE_CELLS,
    RANGE_BOUND, RECONCILE_INTERVAL,
};
use wordgrid_system_product_table::TableLimits;
use wordgrid_system_windowing::Config as WindowingConfig;

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE: &str = "wordgrid.toml";

/// Failure to load the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("failed to parse {}", path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Product table settings.
    pub table: TableSettings,
    /// Tile game settings.
    pub tiles: TileSettings,
}

/// Settings shared by the windowed and the strict product table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Cell width in pixels.
    pub cell_width: u32,
    /// Cell height in pixels.
    pub cell_height: u32,
    /// Minimum spacing between scroll-triggered reconciles, in milliseconds.
    pub reconcile_interval_ms: u64,
    /// Keeps the visible window inside the logical range.
    pub clamp_to_range: bool,
    /// Columns realized when a table is attached.
    pub max_initial_columns: u64,
    /// Rows realized when a table is attached.
    pub max_initial_rows: u64,
    /// Largest accepted magnitude of a range bound.
    pub range_bound: i64,
    /// Largest accepted strict table size.
    pub max_table_cells: u64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            reconcile_interval_ms: u64::try_from(RECONCILE_INTERVAL.as_millis()).unwrap_or(50),
            clamp_to_range: true,
            max_initial_columns: MAX_INITIAL_COLUMNS,
            max_initial_rows: MAX_INITIAL_ROWS,
            range_bound: RANGE_BOUND,
            max_table_cells: MAX_TABLE_CELLS,
        }
    }
}

impl TableSettings {
    /// Pixel size of a cell.
    #[must_use]
    pub fn cell_size(&self) -> CellSize {
        CellSize::new(self.cell_width, self.cell_height)
    }

    /// Windowing system configuration.
    #[must_use]
    pub fn windowing(&self) -> WindowingConfig {
        WindowingConfig::new(
            self.cell_size(),
            Duration::from_millis(self.reconcile_interval_ms),
            self.clamp_to_range,
            self.max_initial_columns,
            self.max_initial_rows,
        )
    }

    /// Request limits for strict tables.
    #[must_use]
    pub fn limits(&self) -> TableLimits {
        TableLimits {
            bound: self.range_bound,
            max_cells: self.max_table_cells,
        }
    }
}

/// Settings of the tile game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSettings {
    /// Directory holding `data/pieces.json` and `data/dictionary.txt`.
    pub asset_root: PathBuf,
    /// Fixed shuffle seed; a fresh seed is derived per game when absent.
    pub seed: Option<u64>,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Parses configuration text.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml_str(&text, path)?;
                info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "configuration not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml_str("", Path::new(CONFIG_FILE)).expect("valid toml");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.table.cell_size(), CellSize::new(52, 32));
        assert_eq!(config.table.limits(), TableLimits::default());
        assert_eq!(config.table.windowing(), WindowingConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let text = r#"
            [table]
            clamp_to_range = false
            reconcile_interval_ms = 120

            [tiles]
            seed = 7
        "#;
        let config = AppConfig::from_toml_str(text, Path::new(CONFIG_FILE)).expect("valid toml");

        assert!(!config.table.clamp_to_range);
        assert_eq!(config.table.reconcile_interval_ms, 120);
        assert_eq!(config.table.cell_width, CELL_WIDTH);
        assert_eq!(config.tiles.seed, Some(7));
        assert_eq!(config.tiles.asset_root, PathBuf::from("assets"));
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let error = AppConfig::from_toml_str("[table]\ncell_width = \"wide\"", Path::new("x.toml"))
            .unwrap_err();

        assert_eq!(error.to_string(), "failed to parse x.toml");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config =
            AppConfig::load_or_default(&dir.path().join(CONFIG_FILE)).expect("defaults");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn existing_file_is_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[tiles]\nasset_root = \"/srv/wordgrid\"\n").expect("write config");

        let config = AppConfig::load_or_default(&path).expect("config loads");

        assert_eq!(config.tiles.asset_root, PathBuf::from("/srv/wordgrid"));
    }
}
