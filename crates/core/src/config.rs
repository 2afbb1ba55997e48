//! Board configuration, read from `arrowboard.toml`.
//!
//! Every field has a default, so a partial or empty file is valid. Values
//! that would break layout are clamped by [`BoardConfig::validated`] rather
//! than rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::fit::FitSettings;
use crate::model::GridConfig;
use crate::model::grid::DEFAULT_COLUMN_WIDTH_PX;

pub const CONFIG_FILE_NAME: &str = "arrowboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub fit: FitSettings,
}

impl BoardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        Ok(config.validated())
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Clamp every value into a range layout can work with.
    pub fn validated(self) -> Self {
        Self {
            grid: validate_grid(self.grid),
            fit: validate_fit(self.fit),
        }
    }
}

fn clamp_field(field: &'static str, value: f64, fixed: f64) -> f64 {
    if value != fixed {
        warn!(field, value, fixed, "config value out of range");
    }
    fixed
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn validate_grid(grid: GridConfig) -> GridConfig {
    let defaults = GridConfig::default();

    let column_count = if grid.column_count == 0 {
        warn!(field = "grid.column_count", "config value out of range");
        defaults.column_count
    } else {
        grid.column_count
    };
    let columns = f64::from(column_count);

    let min_duration_columns = clamp_field(
        "grid.min_duration_columns",
        grid.min_duration_columns,
        positive_or(grid.min_duration_columns, defaults.min_duration_columns).min(columns),
    );
    let max_duration = if grid.max_duration_columns.is_finite() {
        grid.max_duration_columns.clamp(min_duration_columns, columns)
    } else {
        columns
    };
    let max_duration_columns = clamp_field(
        "grid.max_duration_columns",
        grid.max_duration_columns,
        max_duration,
    );

    let positive = |field, value, fallback| clamp_field(field, value, positive_or(value, fallback));
    let non_negative = |field, value: f64| {
        clamp_field(field, value, if value.is_finite() { value.max(0.0) } else { 0.0 })
    };

    GridConfig {
        column_count,
        column_width_px: positive("grid.column_width_px", grid.column_width_px, DEFAULT_COLUMN_WIDTH_PX),
        min_duration_columns,
        max_duration_columns,
        start_hour: grid.start_hour % 24,
        arrow_height_px: positive("grid.arrow_height_px", grid.arrow_height_px, defaults.arrow_height_px),
        row_height_px: positive("grid.row_height_px", grid.row_height_px, defaults.row_height_px),
        name_column_px: non_negative("grid.name_column_px", grid.name_column_px),
        actions_column_px: non_negative("grid.actions_column_px", grid.actions_column_px),
    }
}

fn validate_fit(fit: FitSettings) -> FitSettings {
    let defaults = FitSettings::default();
    let positive = |field, value, fallback| clamp_field(field, value, positive_or(value, fallback));

    let min_font_px = positive("fit.min_font_px", fit.min_font_px, defaults.min_font_px);
    let mid_font_px = clamp_field(
        "fit.mid_font_px",
        fit.mid_font_px,
        positive_or(fit.mid_font_px, defaults.mid_font_px).max(min_font_px),
    );
    let max_font_px = clamp_field(
        "fit.max_font_px",
        fit.max_font_px,
        positive_or(fit.max_font_px, defaults.max_font_px).max(mid_font_px),
    );

    FitSettings {
        max_font_px,
        mid_font_px,
        min_font_px,
        step_px: positive("fit.step_px", fit.step_px, defaults.step_px),
        fitting_margin_px: clamp_field(
            "fit.fitting_margin_px",
            fit.fitting_margin_px,
            if fit.fitting_margin_px.is_finite() {
                fit.fitting_margin_px.max(0.0)
            } else {
                defaults.fitting_margin_px
            },
        ),
        plain_word_scale: positive("fit.plain_word_scale", fit.plain_word_scale, defaults.plain_word_scale),
        wrap_max_height_px: positive(
            "fit.wrap_max_height_px",
            fit.wrap_max_height_px,
            defaults.wrap_max_height_px,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let config = BoardConfig::from_toml_str("").unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = BoardConfig::from_toml_str(
            r#"
            [grid]
            column_count = 24
            start_hour = 0

            [fit]
            max_font_px = 16.0
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.column_count, 24);
        assert_eq!(config.grid.start_hour, 0);
        assert_eq!(config.grid.column_width_px, 60.0);
        assert_eq!(config.fit.max_font_px, 16.0);
        assert_eq!(config.fit.mid_font_px, 11.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = BoardConfig::from_toml_str(
            r#"
            [grid]
            column_width_px = -5.0
            min_duration_columns = 0.0
            max_duration_columns = 40.0

            [fit]
            min_font_px = 12.0
            mid_font_px = 9.0
            max_font_px = 10.0
            step_px = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.column_width_px, 60.0);
        assert_eq!(config.grid.min_duration_columns, 0.5);
        assert_eq!(config.grid.max_duration_columns, 18.0);
        assert_eq!(config.fit.min_font_px, 12.0);
        assert_eq!(config.fit.mid_font_px, 12.0);
        assert_eq!(config.fit.max_font_px, 12.0);
        assert_eq!(config.fit.step_px, 0.5);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let err = BoardConfig::from_toml_str("[grid]\ncolumn_count = \"many\"");
        assert!(matches!(err, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("arrowboard-missing-dir/none.toml");
        assert_eq!(BoardConfig::load(&path).unwrap(), BoardConfig::default());
    }

    #[test]
    fn written_config_reads_back() {
        let mut config = BoardConfig::default();
        config.grid.start_hour = 6;
        config.fit.step_px = 0.25;
        let text = config.to_toml_string().unwrap();
        assert_eq!(BoardConfig::from_toml_str(&text).unwrap(), config);
    }
}
