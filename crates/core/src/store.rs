//! Persistence-facing (de)serialization.
//!
//! The field names follow the board format written by earlier versions of
//! the application, so saved boards load unchanged. Where to keep the
//! resulting JSON is up to the caller.

use arrowboard_protocol::{ConditionColor, ParseColorError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::{Board, ClassifiedLabel, GridConfig, Interval, Subject, Timeline};
use crate::position::snap_duration;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row {row:?}: {source}")]
    Color {
        row: String,
        #[source]
        source: ParseColorError,
    },
}

/// One interval as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredInterval {
    #[serde(default)]
    pub main_text: String,
    #[serde(default)]
    pub red_text: String,
    #[serde(default)]
    pub after_text: String,
    pub arrow_hours: f64,
    /// `#RRGGBB` or CSS `rgb(r, g, b)`.
    pub arrow_color: String,
    #[serde(default)]
    pub start_position: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoredRow {
    pub name: String,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub conditions: Vec<StoredInterval>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardState {
    #[serde(default)]
    pub rows: Vec<StoredRow>,
}

/// A subject's unmerged per-column codes, as delivered by an importer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRow {
    pub name: String,
    #[serde(default)]
    pub cells: Vec<String>,
}

pub fn serialize_timeline(timeline: &Timeline) -> Vec<StoredInterval> {
    timeline
        .iter()
        .map(|interval| StoredInterval {
            main_text: interval.label.main_text.clone(),
            red_text: interval.label.emphasis_text.clone(),
            after_text: interval.label.trailing_text.clone(),
            arrow_hours: interval.duration_columns,
            arrow_color: interval.label.color.hex().to_string(),
            start_position: f64::from(interval.start_column),
        })
        .collect()
}

/// Rebuild a timeline, sorting by start and clamping into the grid.
///
/// Positions written as fractions of a column (older files stored raw pixel
/// ratios) are snapped to the nearest column and half-column duration.
pub fn deserialize_timeline(
    stored: &[StoredInterval],
    grid: &GridConfig,
) -> Result<Timeline, ParseColorError> {
    let intervals = stored
        .iter()
        .map(|s| {
            let color: ConditionColor = s.arrow_color.parse()?;
            let label = ClassifiedLabel::new(&s.main_text, &s.red_text, &s.after_text, color);
            let start = if s.start_position.is_finite() {
                s.start_position.round().max(0.0) as u32
            } else {
                0
            };
            Ok(Interval::new(start, snap_duration(s.arrow_hours), label).clamped(grid))
        })
        .collect::<Result<Vec<_>, ParseColorError>>()?;
    Ok(Timeline::from_intervals(intervals))
}

impl BoardState {
    pub fn from_board(board: &Board) -> Self {
        Self {
            rows: board
                .iter()
                .map(|subject| StoredRow {
                    name: subject.name.clone(),
                    highlighted: subject.highlighted,
                    conditions: serialize_timeline(&subject.timeline),
                })
                .collect(),
        }
    }

    /// Rows with a blank name are skipped.
    pub fn into_board(self, grid: &GridConfig) -> Result<Board, StoreError> {
        let mut board = Board::new();
        for row in self.rows {
            let name = row.name.trim();
            if name.is_empty() {
                debug!("skipping stored row without a name");
                continue;
            }
            let timeline =
                deserialize_timeline(&row.conditions, grid).map_err(|source| StoreError::Color {
                    row: name.to_string(),
                    source,
                })?;
            let mut subject = Subject::new(name, timeline);
            subject.highlighted = row.highlighted;
            board.add_subject(subject);
        }
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Merge raw rows into a board; rows that yield nothing are dropped.
pub fn board_from_raw_rows(rows: &[RawRow], grid: &GridConfig) -> Board {
    let mut board = Board::new();
    for row in rows {
        board.add_raw_row(&row.name, &row.cells, grid);
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board(grid: &GridConfig) -> Board {
        let mut board = Board::new();
        board.add_raw_row("UUEE", &["600x6", "600x6", "", "{туман} 50x0.6"], grid);
        board.add_raw_row("ULLI", &["минус"; 3], grid);
        board.toggle_highlight(1);
        board
    }

    #[test]
    fn board_survives_json() {
        let grid = GridConfig::default();
        let board = sample_board(&grid);
        let json = BoardState::from_board(&board).to_json().unwrap();
        let back = BoardState::from_json(&json).unwrap().into_board(&grid).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn uses_stored_field_names() {
        let grid = GridConfig::default();
        let json = BoardState::from_board(&sample_board(&grid)).to_json().unwrap();
        for key in ["mainText", "redText", "afterText", "arrowHours", "arrowColor", "startPosition"] {
            assert!(json.contains(key), "missing {key}");
        }
    }

    #[test]
    fn loads_legacy_pixel_ratios_and_css_colors() {
        let grid = GridConfig::default();
        let json = r##"{"rows": [
            {"name": " UWWW ", "highlighted": true, "conditions": [
                {"mainText": "200x2", "redText": "", "afterText": "",
                 "arrowHours": 2.966, "arrowColor": "rgb(255, 254, 206)",
                 "startPosition": 4.0166},
                {"mainText": "", "redText": "гроза", "afterText": "",
                 "arrowHours": 1, "arrowColor": "#FDCDC9", "startPosition": 0}
            ]},
            {"name": "", "conditions": []}
        ]}"##;
        let board = BoardState::from_json(json).unwrap().into_board(&grid).unwrap();
        assert_eq!(board.len(), 1);
        let subject = &board.subjects()[0];
        assert_eq!(subject.name, "UWWW");
        assert!(subject.highlighted);
        let spans: Vec<(u32, f64)> = subject
            .timeline
            .iter()
            .map(|i| (i.start_column, i.duration_columns))
            .collect();
        assert_eq!(spans, vec![(0, 1.0), (4, 3.0)]);
        assert_eq!(subject.timeline.intervals()[1].label.color, ConditionColor::Yellow);
    }

    #[test]
    fn unknown_color_is_an_error() {
        let grid = GridConfig::default();
        let json = r##"{"rows": [{"name": "X", "conditions": [
            {"mainText": "a", "arrowHours": 1, "arrowColor": "#123456"}]}]}"##;
        let err = BoardState::from_json(json).unwrap().into_board(&grid);
        assert!(matches!(err, Err(StoreError::Color { .. })));
    }

    #[test]
    fn overflowing_interval_is_clamped() {
        let grid = GridConfig::default();
        let stored = vec![StoredInterval {
            main_text: "600x6".into(),
            red_text: String::new(),
            after_text: String::new(),
            arrow_hours: 10.0,
            arrow_color: "#E9FFEA".into(),
            start_position: 12.0,
        }];
        let timeline = deserialize_timeline(&stored, &grid).unwrap();
        assert_eq!(timeline.intervals()[0].duration_columns, 6.0);
    }

    #[test]
    fn fractional_manual_duration_reloads_unchanged() {
        let grid = GridConfig::default();
        let mut subject = Subject::new("UUEE", Timeline::new());
        let entry = crate::model::ManualCondition {
            main: "ветер".into(),
            duration_columns: 1.25,
            start_column: 2,
            ..Default::default()
        };
        assert!(subject.add_manual(&entry, &grid));

        let stored = serialize_timeline(&subject.timeline);
        let back = deserialize_timeline(&stored, &grid).unwrap();
        assert_eq!(back, subject.timeline);
        assert_eq!(back.intervals()[0].duration_columns, 1.5);
    }

    #[test]
    fn raw_rows_are_merged() {
        let grid = GridConfig::default();
        let rows = vec![
            RawRow { name: "A".into(), cells: vec!["300x3".into(), "300x3".into()] },
            RawRow { name: "B".into(), cells: vec![] },
        ];
        let board = board_from_raw_rows(&rows, &grid);
        assert_eq!(board.len(), 1);
        assert_eq!(board.subjects()[0].timeline.intervals()[0].duration_columns, 2.0);
    }
}
