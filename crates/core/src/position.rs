use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{ClassifiedLabel, GridConfig, Interval};

/// Left edge offset of every arrow inside its first column.
pub const ARROW_INSET_PX: f64 = 1.0;
/// Width taken off every arrow so neighbours stay visually separate.
pub const ARROW_GAP_PX: f64 = 2.0;
/// Granularity every stored or entered duration snaps to.
pub const DURATION_STEP_COLUMNS: f64 = 0.5;

const ALIGN_TOLERANCE: f64 = 1e-6;

/// Horizontal pixel geometry of one arrow. A projection of an [`Interval`],
/// never a source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    pub left: f64,
    pub width: f64,
}

impl PixelBox {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Round a duration to the nearest [`DURATION_STEP_COLUMNS`] multiple.
pub fn snap_duration(duration_columns: f64) -> f64 {
    (duration_columns / DURATION_STEP_COLUMNS).round() * DURATION_STEP_COLUMNS
}

/// Project an interval onto the grid.
pub fn to_box(interval: &Interval, grid: &GridConfig) -> PixelBox {
    PixelBox {
        left: f64::from(interval.start_column) * grid.column_width_px + ARROW_INSET_PX,
        width: interval.duration_columns * grid.column_width_px - ARROW_GAP_PX,
    }
}

/// Recover `(start_column, duration_columns)` from pixel geometry.
///
/// Exact for boxes produced by [`to_box`] with the same grid. Geometry that
/// does not land on a column boundary (e.g. after a fractional resize) is
/// snapped to the nearest column and half-column duration, then clamped
/// into the grid; this recovery is lossy but never fails.
pub fn to_span(pixel_box: &PixelBox, grid: &GridConfig) -> (u32, f64) {
    let width = grid.column_width_px;
    let raw_start = (pixel_box.left - ARROW_INSET_PX) / width;
    let raw_duration = (pixel_box.width + ARROW_GAP_PX) / width;

    let last_column = grid.column_count.saturating_sub(1);
    let start_column = if raw_start.is_finite() {
        raw_start.round().clamp(0.0, f64::from(last_column)) as u32
    } else {
        0
    };

    let snapped = snap_duration(raw_duration);
    let room = grid.columns() - f64::from(start_column);
    let duration_columns = grid.clamp_duration(snapped).min(room);

    let misaligned = (raw_start - f64::from(start_column)).abs() > ALIGN_TOLERANCE
        || (raw_duration - duration_columns).abs() > ALIGN_TOLERANCE;
    if misaligned {
        warn!(
            left = pixel_box.left,
            width = pixel_box.width,
            start_column,
            duration_columns,
            "pixel box not aligned to grid; snapped"
        );
    }

    (start_column, duration_columns)
}

/// Inverse of [`to_box`], reattaching the stored label.
pub fn to_interval(pixel_box: &PixelBox, label: ClassifiedLabel, grid: &GridConfig) -> Interval {
    let (start_column, duration_columns) = to_span(pixel_box, grid);
    Interval::new(start_column, duration_columns, label)
}
