use serde::{Deserialize, Serialize};

use super::grid::GridConfig;
use super::interval::Timeline;
use super::manual::ManualCondition;
use crate::merge::merge;

/// One row of the board: a named subject (an airport) and its timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub highlighted: bool,
    pub timeline: Timeline,
}

impl Subject {
    pub fn new(name: impl Into<String>, timeline: Timeline) -> Self {
        Self {
            name: name.into(),
            highlighted: false,
            timeline,
        }
    }

    /// Insert a hand-entered condition in start order. Returns `false` when
    /// the entry is blank.
    pub fn add_manual(&mut self, entry: &ManualCondition, grid: &GridConfig) -> bool {
        match entry.to_interval(grid) {
            Some(interval) => {
                self.timeline.insert(interval);
                true
            }
            None => false,
        }
    }
}

/// The ordered list of subjects shown on the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    subjects: Vec<Subject>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subject(&mut self, subject: Subject) {
        self.subjects.push(subject);
    }

    /// Merge a raw per-column row and append it as a subject.
    ///
    /// Returns `false` (and adds nothing) when the name is blank or the row
    /// produced no intervals.
    pub fn add_raw_row<S: AsRef<str>>(&mut self, name: &str, cells: &[S], grid: &GridConfig) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let timeline = merge(cells, grid);
        if timeline.is_empty() {
            return false;
        }
        self.subjects.push(Subject::new(name, timeline));
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Subject> {
        (index < self.subjects.len()).then(|| self.subjects.remove(index))
    }

    /// Move the subject at `from` so that it ends up at index `to`.
    ///
    /// Out-of-range indices leave the board unchanged.
    pub fn move_subject(&mut self, from: usize, to: usize) -> bool {
        let len = self.subjects.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let subject = self.subjects.remove(from);
            self.subjects.insert(to, subject);
        }
        true
    }

    /// Flip the highlight flag; returns the new state.
    pub fn toggle_highlight(&mut self, index: usize) -> Option<bool> {
        let subject = self.subjects.get_mut(index)?;
        subject.highlighted = !subject.highlighted;
        Some(subject.highlighted)
    }

    pub fn clear(&mut self) {
        self.subjects.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Subject> {
        self.subjects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Subject> {
        self.subjects.get_mut(index)
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subject> {
        self.subjects.iter()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_of(names: &[&str]) -> Board {
        let grid = GridConfig::default();
        let mut board = Board::new();
        for name in names {
            assert!(board.add_raw_row(name, &["600x6"], &grid));
        }
        board
    }

    fn names(board: &Board) -> Vec<&str> {
        board.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn add_raw_row_skips_blank_name_and_empty_row() {
        let grid = GridConfig::default();
        let mut board = Board::new();
        assert!(!board.add_raw_row("  ", &["600x6"], &grid));
        assert!(!board.add_raw_row("UUEE", &["", " "], &grid));
        assert!(board.is_empty());
    }

    #[test]
    fn manual_entries_insert_in_order() {
        let grid = GridConfig::default();
        let mut subject = Subject::new("UUEE", Timeline::new());
        let late = ManualCondition {
            main: "600x6".into(),
            start_column: 8,
            ..ManualCondition::default()
        };
        let early = ManualCondition {
            emphasis: "туман".into(),
            start_column: 2,
            duration_columns: 3.0,
            ..ManualCondition::default()
        };
        assert!(subject.add_manual(&late, &grid));
        assert!(subject.add_manual(&early, &grid));
        assert!(!subject.add_manual(&ManualCondition::default(), &grid));

        let starts: Vec<u32> = subject.timeline.iter().map(|i| i.start_column).collect();
        assert_eq!(starts, vec![2, 8]);
    }

    #[test]
    fn move_subject_reorders() {
        let mut board = board_of(&["A", "B", "C", "D"]);
        assert!(board.move_subject(0, 2));
        assert_eq!(names(&board), vec!["B", "C", "A", "D"]);
        assert!(board.move_subject(3, 0));
        assert_eq!(names(&board), vec!["D", "B", "C", "A"]);
        assert!(!board.move_subject(7, 0));
    }

    #[test]
    fn toggle_and_remove() {
        let mut board = board_of(&["A", "B"]);
        assert_eq!(board.toggle_highlight(1), Some(true));
        assert_eq!(board.toggle_highlight(1), Some(false));
        assert_eq!(board.toggle_highlight(9), None);

        let removed = board.remove(0);
        assert_eq!(removed.map(|s| s.name), Some("A".to_string()));
        assert!(board.remove(5).is_none());
        assert_eq!(names(&board), vec!["B"]);

        board.clear();
        assert!(board.is_empty());
    }
}
