use tracing::{debug, warn};

use crate::classify::classify;
use crate::model::{GridConfig, Interval, Timeline};

/// Run-length merge a raw per-column row into a timeline.
///
/// Adjacent columns join only when their classified labels are identical in
/// every field; a blank cell always breaks a run. Cells beyond the grid's
/// column count are ignored, missing trailing cells count as blank.
pub fn merge<S: AsRef<str>>(row: &[S], grid: &GridConfig) -> Timeline {
    let columns = grid.column_count as usize;
    if row.len() > columns {
        warn!(
            cells = row.len(),
            columns, "raw row longer than grid; extra cells ignored"
        );
    }

    let mut timeline = Timeline::new();
    let mut open: Option<Interval> = None;

    for (index, cell) in row.iter().take(columns).enumerate() {
        let column = index as u32;
        let Some(label) = classify(cell.as_ref()) else {
            if let Some(done) = open.take() {
                timeline.push(done);
            }
            continue;
        };

        if let Some(acc) = open.as_mut()
            && acc.label == label
            && acc.end_column() == f64::from(column)
        {
            acc.duration_columns += 1.0;
            continue;
        }

        if let Some(done) = open.replace(Interval::new(column, 1.0, label)) {
            timeline.push(done);
        }
    }

    if let Some(done) = open {
        timeline.push(done);
    }

    debug!(cells = row.len(), intervals = timeline.len(), "merged row");
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrowboard_protocol::ConditionColor;

    fn grid(columns: u32) -> GridConfig {
        GridConfig {
            column_count: columns,
            max_duration_columns: f64::from(columns),
            ..GridConfig::default()
        }
    }

    fn spans(timeline: &Timeline) -> Vec<(u32, f64)> {
        timeline
            .iter()
            .map(|i| (i.start_column, i.duration_columns))
            .collect()
    }

    #[test]
    fn merges_runs_and_breaks_on_blank() {
        let row = ["600x6", "600x6", "600x6", "", "300x3"];
        let timeline = merge(&row, &grid(5));
        assert_eq!(spans(&timeline), vec![(0, 3.0), (4, 1.0)]);
        assert_eq!(timeline.intervals()[0].label.main_text, "600x6");
        assert_eq!(timeline.intervals()[0].label.color, ConditionColor::Green);
        assert_eq!(timeline.intervals()[1].label.color, ConditionColor::Blue);
    }

    #[test]
    fn gap_prevents_merge() {
        let row = ["туман", "", "туман"];
        let timeline = merge(&row, &grid(3));
        assert_eq!(spans(&timeline), vec![(0, 1.0), (2, 1.0)]);
    }

    #[test]
    fn same_color_different_text_does_not_merge() {
        let row = ["600x6", "600x6 к 10", "600x6"];
        let timeline = merge(&row, &grid(3));
        assert_eq!(spans(&timeline), vec![(0, 1.0), (1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn whitespace_variants_merge() {
        let row = ["600x6  к 10", " 600x6 к 10 "];
        let timeline = merge(&row, &grid(2));
        assert_eq!(spans(&timeline), vec![(0, 2.0)]);
    }

    #[test]
    fn full_row_of_negative() {
        let row = vec!["минус"; 18];
        let timeline = merge(&row, &GridConfig::default());
        assert_eq!(spans(&timeline), vec![(0, 18.0)]);
        assert_eq!(timeline.intervals()[0].label.color, ConditionColor::Violet);
    }

    #[test]
    fn extra_cells_are_ignored() {
        let row = ["600x6", "600x6", "600x6", "600x6"];
        let timeline = merge(&row, &grid(2));
        assert_eq!(spans(&timeline), vec![(0, 2.0)]);
    }

    #[test]
    fn empty_row() {
        let row: [&str; 0] = [];
        assert!(merge(&row, &grid(4)).is_empty());
    }
}
