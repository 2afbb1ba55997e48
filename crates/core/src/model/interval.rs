use serde::{Deserialize, Serialize};
use tracing::warn;

use super::grid::GridConfig;
use super::label::ClassifiedLabel;

/// One arrow: a label holding steady over a run of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start_column: u32,
    /// Fractional durations are allowed for manually authored arrows.
    pub duration_columns: f64,
    pub label: ClassifiedLabel,
}

impl Interval {
    pub fn new(start_column: u32, duration_columns: f64, label: ClassifiedLabel) -> Self {
        Self {
            start_column,
            duration_columns,
            label,
        }
    }

    pub fn end_column(&self) -> f64 {
        f64::from(self.start_column) + self.duration_columns
    }

    /// Force the interval inside the grid.
    ///
    /// The start is pulled back onto the last column, the duration is bounded
    /// by the configured min/max and then cut at the grid's right edge.
    pub fn clamped(&self, grid: &GridConfig) -> Self {
        let last_column = grid.column_count.saturating_sub(1);
        let start_column = self.start_column.min(last_column);
        let room = grid.columns() - f64::from(start_column);
        let duration_columns = grid.clamp_duration(self.duration_columns).min(room);

        if start_column != self.start_column || duration_columns != self.duration_columns {
            warn!(
                start = self.start_column,
                duration = self.duration_columns,
                clamped_start = start_column,
                clamped_duration = duration_columns,
                "interval clamped into grid"
            );
        }

        Self {
            start_column,
            duration_columns,
            label: self.label.clone(),
        }
    }
}

/// Ordered, non-overlapping intervals for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    intervals: Vec<Interval>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a timeline from intervals in any order.
    pub fn from_intervals(mut intervals: Vec<Interval>) -> Self {
        intervals.sort_by_key(|i| i.start_column);
        Self { intervals }
    }

    /// Insert a manually authored interval, keeping start order.
    ///
    /// Intervals with the same start keep insertion order.
    pub fn insert(&mut self, interval: Interval) {
        let at = self
            .intervals
            .partition_point(|i| i.start_column <= interval.start_column);
        self.intervals.insert(at, interval);
    }

    /// Append an interval produced by a left-to-right scan.
    pub(crate) fn push(&mut self, interval: Interval) {
        debug_assert!(
            self.intervals
                .last()
                .is_none_or(|last| last.start_column <= interval.start_column)
        );
        self.intervals.push(interval);
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Clamp every interval into the grid.
    pub fn clamp_to(&mut self, grid: &GridConfig) {
        for interval in &mut self.intervals {
            *interval = interval.clamped(grid);
        }
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrowboard_protocol::ConditionColor;

    fn label(text: &str) -> ClassifiedLabel {
        ClassifiedLabel::plain(text, ConditionColor::Green)
    }

    #[test]
    fn clamp_cuts_at_grid_edge() {
        let grid = GridConfig::default();
        let i = Interval::new(15, 6.0, label("a")).clamped(&grid);
        assert_eq!(i.start_column, 15);
        assert_eq!(i.duration_columns, 3.0);
    }

    #[test]
    fn clamp_pulls_start_onto_grid() {
        let grid = GridConfig::default();
        let i = Interval::new(40, 2.0, label("a")).clamped(&grid);
        assert_eq!(i.start_column, 17);
        assert_eq!(i.duration_columns, 1.0);
    }

    #[test]
    fn clamp_enforces_min_duration() {
        let grid = GridConfig::default();
        let i = Interval::new(3, 0.1, label("a")).clamped(&grid);
        assert_eq!(i.duration_columns, 0.5);
    }

    #[test]
    fn clamp_keeps_valid_interval() {
        let grid = GridConfig::default();
        let original = Interval::new(2, 4.0, label("a"));
        assert_eq!(original.clamped(&grid), original);
    }

    #[test]
    fn insert_keeps_start_order() {
        let mut timeline = Timeline::new();
        timeline.insert(Interval::new(5, 1.0, label("b")));
        timeline.insert(Interval::new(0, 2.0, label("a")));
        timeline.insert(Interval::new(9, 1.0, label("c")));
        let starts: Vec<u32> = timeline.iter().map(|i| i.start_column).collect();
        assert_eq!(starts, vec![0, 5, 9]);
    }

    #[test]
    fn from_intervals_sorts() {
        let timeline = Timeline::from_intervals(vec![
            Interval::new(4, 1.0, label("b")),
            Interval::new(1, 1.0, label("a")),
        ]);
        assert_eq!(timeline.intervals()[0].start_column, 1);
        assert_eq!(timeline.len(), 2);
    }
}
