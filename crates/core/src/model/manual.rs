use arrowboard_protocol::ConditionColor;
use serde::{Deserialize, Serialize};

use super::grid::GridConfig;
use super::interval::Interval;
use super::label::ClassifiedLabel;
use crate::position::snap_duration;

pub const DEFAULT_MANUAL_DURATION: f64 = 1.0;
pub const DEFAULT_MANUAL_COLOR: ConditionColor = ConditionColor::Green;

/// A condition entered by hand rather than classified from a raw code.
///
/// The color is chosen explicitly; no classification runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualCondition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub emphasis: String,
    #[serde(default)]
    pub trailing: String,
    #[serde(default = "default_duration")]
    pub duration_columns: f64,
    #[serde(default = "default_color")]
    pub color: ConditionColor,
    #[serde(default)]
    pub start_column: u32,
}

fn default_duration() -> f64 {
    DEFAULT_MANUAL_DURATION
}

fn default_color() -> ConditionColor {
    DEFAULT_MANUAL_COLOR
}

impl Default for ManualCondition {
    fn default() -> Self {
        Self {
            main: String::new(),
            emphasis: String::new(),
            trailing: String::new(),
            duration_columns: DEFAULT_MANUAL_DURATION,
            color: DEFAULT_MANUAL_COLOR,
            start_column: 0,
        }
    }
}

impl ManualCondition {
    /// Convert to an interval, or `None` when there is nothing to show.
    ///
    /// The duration snaps to the half-column step, then the result is
    /// clamped into the grid.
    pub fn to_interval(&self, grid: &GridConfig) -> Option<Interval> {
        let label = ClassifiedLabel::new(&self.main, &self.emphasis, &self.trailing, self.color);
        if label.is_blank() {
            return None;
        }
        let duration = snap_duration(self.duration_columns);
        Some(Interval::new(self.start_column, duration, label).clamped(grid))
    }
}
