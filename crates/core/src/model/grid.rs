use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

pub const DEFAULT_COLUMN_COUNT: u32 = 18;
pub const DEFAULT_COLUMN_WIDTH_PX: f64 = 60.0;
pub const DEFAULT_START_HOUR: u32 = 7;
pub const DEFAULT_ARROW_HEIGHT_PX: f64 = 22.0;

/// Fixed coordinate system the timelines are drawn on.
///
/// Passed by value into every positioning and fitting call so a single
/// computation never mixes two column widths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub column_count: u32,
    pub column_width_px: f64,
    pub min_duration_columns: f64,
    pub max_duration_columns: f64,
    /// Hour shown above column 0.
    pub start_hour: u32,
    pub arrow_height_px: f64,
    pub row_height_px: f64,
    /// Fixed-width table columns flanking the grid; subtracted on resize.
    pub name_column_px: f64,
    pub actions_column_px: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_count: DEFAULT_COLUMN_COUNT,
            column_width_px: DEFAULT_COLUMN_WIDTH_PX,
            min_duration_columns: 0.5,
            max_duration_columns: f64::from(DEFAULT_COLUMN_COUNT),
            start_hour: DEFAULT_START_HOUR,
            arrow_height_px: DEFAULT_ARROW_HEIGHT_PX,
            row_height_px: 30.0,
            name_column_px: 150.0,
            actions_column_px: 100.0,
        }
    }
}

impl GridConfig {
    pub fn columns(&self) -> f64 {
        f64::from(self.column_count)
    }

    /// Pixel width of the whole grid.
    pub fn grid_width_px(&self) -> f64 {
        self.columns() * self.column_width_px
    }

    /// Header label for column `index`, e.g. `"07"`; wraps past midnight.
    pub fn column_label(&self, index: u32) -> String {
        format!("{:02}", (self.start_hour + index) % 24)
    }

    /// Clamp a duration into `[min_duration_columns, max_duration_columns]`.
    pub fn clamp_duration(&self, duration: f64) -> f64 {
        if duration.is_nan() {
            return self.min_duration_columns;
        }
        duration.clamp(self.min_duration_columns, self.max_duration_columns)
    }

    /// Recompute the column width for a table of the given total width.
    ///
    /// Falls back to the default width when the flanking columns leave no
    /// room.
    pub fn resized(&self, table_width_px: f64) -> Self {
        let available = table_width_px - self.name_column_px - self.actions_column_px;
        let column_width_px = if available > 0.0 && self.column_count > 0 {
            available / self.columns()
        } else {
            DEFAULT_COLUMN_WIDTH_PX
        };
        Self {
            column_width_px,
            ..*self
        }
    }
}

/// Process-wide grid that can be resized while layouts are in flight.
///
/// Readers take a [`snapshot`](Self::snapshot) once at the start of a
/// computation and use that copy throughout.
#[derive(Debug, Clone, Default)]
pub struct SharedGrid {
    inner: Arc<RwLock<GridConfig>>,
}

impl SharedGrid {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(grid)),
        }
    }

    pub fn snapshot(&self) -> GridConfig {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recompute the column width for a new table width and return the
    /// resulting grid.
    pub fn resize(&self, table_width_px: f64) -> GridConfig {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let next = guard.resized(table_width_px);
        *guard = next;
        next
    }
}
