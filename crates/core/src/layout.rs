//! Board layout: pixel geometry and fitted presentation for every arrow.
//!
//! [`layout_board`] is a pure pass over a board. [`BoardView`] owns a board
//! and its current layout and re-lays it out when told the geometry changed;
//! fits go through a [`RefitTracker`] so a result computed for superseded
//! geometry is never applied.

use arrowboard_protocol::ConditionColor;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fit::{ArrowKey, FitResult, FitTicket, RefitTracker, TextFitter, TextMeasurer};
use crate::model::{Board, ClassifiedLabel, GridConfig, Interval, SharedGrid, Subject, Timeline};
use crate::position::{PixelBox, to_box};

/// Width of the triangular head drawn at the right end of an arrow. Labels
/// are fitted into the body only.
pub const ARROW_HEAD_WIDTH_PX: f64 = 14.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowLayout {
    pub interval: Interval,
    pub pixel_box: PixelBox,
    /// The body of the arrow, where the label goes.
    pub text_box: PixelBox,
    pub fit: FitResult,
}

/// Horizontal extent of a row's worst-condition arrows, in percent of the
/// grid width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardSpan {
    pub start_pct: f64,
    pub end_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    pub name: String,
    pub highlighted: bool,
    pub arrows: Vec<ArrowLayout>,
    pub hazard: Option<HazardSpan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// The grid snapshot every row was laid out against.
    pub grid: GridConfig,
    /// Scale for plain words in the emphasis segment, as fitted.
    pub plain_word_scale: f64,
    pub rows: Vec<RowLayout>,
}

pub fn text_box(pixel_box: &PixelBox) -> PixelBox {
    PixelBox::new(
        pixel_box.left,
        (pixel_box.width - ARROW_HEAD_WIDTH_PX).max(0.0),
    )
}

/// Extent covering every red interval; `None` when the row has none.
pub fn hazard_span(timeline: &Timeline, grid: &GridConfig) -> Option<HazardSpan> {
    let total = grid.grid_width_px();
    if total <= 0.0 {
        return None;
    }
    let (left, right) = timeline
        .iter()
        .filter(|interval| interval.label.color == ConditionColor::Red)
        .map(|interval| to_box(interval, grid))
        .fold(None, |acc: Option<(f64, f64)>, b| match acc {
            Some((l, r)) => Some((l.min(b.left), r.max(b.right()))),
            None => Some((b.left, b.right())),
        })?;
    let pct = |x: f64| (x / total * 100.0).clamp(0.0, 100.0);
    Some(HazardSpan {
        start_pct: pct(left),
        end_pct: pct(right),
    })
}

fn arrow_geometry(interval: &Interval, grid: &GridConfig) -> (PixelBox, PixelBox) {
    let pixel_box = to_box(interval, grid);
    (pixel_box, text_box(&pixel_box))
}

pub fn layout_arrow<M: TextMeasurer>(
    interval: &Interval,
    grid: &GridConfig,
    fitter: &TextFitter<M>,
) -> ArrowLayout {
    let (pixel_box, text_box) = arrow_geometry(interval, grid);
    ArrowLayout {
        interval: interval.clone(),
        pixel_box,
        text_box,
        fit: fitter.fit(&interval.label, &text_box, grid),
    }
}

pub fn layout_row<M: TextMeasurer>(
    subject: &Subject,
    grid: &GridConfig,
    fitter: &TextFitter<M>,
) -> RowLayout {
    RowLayout {
        name: subject.name.clone(),
        highlighted: subject.highlighted,
        arrows: subject
            .timeline
            .iter()
            .map(|interval| layout_arrow(interval, grid, fitter))
            .collect(),
        hazard: hazard_span(&subject.timeline, grid),
    }
}

pub fn layout_board<M: TextMeasurer>(
    board: &Board,
    grid: &GridConfig,
    fitter: &TextFitter<M>,
) -> BoardLayout {
    let rows: Vec<RowLayout> = board
        .iter()
        .map(|subject| layout_row(subject, grid, fitter))
        .collect();
    debug!(
        rows = rows.len(),
        arrows = rows.iter().map(|r| r.arrows.len()).sum::<usize>(),
        column_width = grid.column_width_px,
        "board laid out"
    );
    BoardLayout {
        grid: *grid,
        plain_word_scale: fitter.settings().plain_word_scale,
        rows,
    }
}

/// Something that moved arrows or changed what they must hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryChange {
    /// The table was resized; column width is recomputed from this.
    Resized { table_width_px: f64 },
    /// One subject's timeline or labels changed.
    LabelEdited { subject: usize },
    /// Subjects were added, removed or reordered.
    RowsChanged,
}

/// A fit to run, possibly on a deferred measurement backend.
#[derive(Debug, Clone)]
pub struct FitJob {
    pub ticket: FitTicket,
    pub label: ClassifiedLabel,
    pub text_box: PixelBox,
    pub grid: GridConfig,
}

impl FitJob {
    pub fn run<M: TextMeasurer>(&self, fitter: &TextFitter<M>) -> FitResult {
        fitter.fit(&self.label, &self.text_box, &self.grid)
    }
}

/// A board, the grid it is drawn on, and its current layout.
#[derive(Debug)]
pub struct BoardView<M> {
    board: Board,
    grid: SharedGrid,
    fitter: TextFitter<M>,
    tracker: RefitTracker,
    layout: BoardLayout,
}

impl<M: TextMeasurer> BoardView<M> {
    pub fn new(board: Board, grid: SharedGrid, fitter: TextFitter<M>) -> Self {
        let layout = layout_board(&board, &grid.snapshot(), &fitter);
        Self {
            board,
            grid,
            fitter,
            tracker: RefitTracker::new(),
            layout,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    pub fn fitter(&self) -> &TextFitter<M> {
        &self.fitter
    }

    /// Mutate the subject list, then re-lay out every row.
    pub fn edit_board(&mut self, edit: impl FnOnce(&mut Board)) {
        edit(&mut self.board);
        self.apply(GeometryChange::RowsChanged);
    }

    /// Mutate one subject, then re-lay out its row. Returns `false` when
    /// `index` is out of range.
    pub fn edit_subject(&mut self, index: usize, edit: impl FnOnce(&mut Subject)) -> bool {
        let Some(subject) = self.board.get_mut(index) else {
            return false;
        };
        edit(subject);
        self.apply(GeometryChange::LabelEdited { subject: index });
        true
    }

    pub fn apply(&mut self, change: GeometryChange) {
        match change {
            GeometryChange::Resized { table_width_px } => {
                let grid = self.grid.resize(table_width_px);
                debug!(table_width_px, column_width = grid.column_width_px, "grid resized");
                self.relayout_all();
            }
            GeometryChange::LabelEdited { subject } => {
                if subject >= self.layout.rows.len() || self.layout.rows.len() != self.board.len() {
                    self.relayout_all();
                } else {
                    let grid = self.grid.snapshot();
                    if grid != self.layout.grid {
                        self.relayout_all();
                    } else {
                        self.relayout_row(subject, &grid);
                    }
                }
            }
            GeometryChange::RowsChanged => {
                self.tracker.invalidate_all();
                self.relayout_all();
            }
        }
    }

    fn relayout_all(&mut self) {
        let grid = self.grid.snapshot();
        self.layout.grid = grid;
        self.layout.rows.truncate(self.board.len());
        for index in 0..self.board.len() {
            self.relayout_row(index, &grid);
        }
        debug!(rows = self.layout.rows.len(), "board re-laid out");
    }

    /// Recompute geometry for one row and fit every arrow through the
    /// tracker.
    fn relayout_row(&mut self, index: usize, grid: &GridConfig) {
        let Some(subject) = self.board.get(index) else {
            return;
        };
        self.tracker.forget_subject(index);

        let mut arrows = Vec::with_capacity(subject.timeline.len());
        for (arrow, interval) in subject.timeline.iter().enumerate() {
            let (pixel_box, text_box) = arrow_geometry(interval, grid);
            let ticket = self.tracker.submit(ArrowKey::new(index, arrow));
            let fit = self.fitter.fit(&interval.label, &text_box, grid);
            if !self.tracker.accept(&ticket) {
                continue;
            }
            arrows.push(ArrowLayout {
                interval: interval.clone(),
                pixel_box,
                text_box,
                fit,
            });
        }

        let row = RowLayout {
            name: subject.name.clone(),
            highlighted: subject.highlighted,
            arrows,
            hazard: hazard_span(&subject.timeline, grid),
        };
        if let Some(slot) = self.layout.rows.get_mut(index) {
            *slot = row;
        } else {
            self.layout.rows.push(row);
        }
    }

    /// Issue fit jobs for every arrow currently laid out in `subject`, for a
    /// measurement backend that answers later.
    pub fn refit_jobs(&mut self, subject: usize) -> Vec<FitJob> {
        let Some(row) = self.layout.rows.get(subject) else {
            return Vec::new();
        };
        let grid = self.layout.grid;
        let targets: Vec<(usize, ClassifiedLabel, PixelBox)> = row
            .arrows
            .iter()
            .enumerate()
            .map(|(arrow, layout)| (arrow, layout.interval.label.clone(), layout.text_box))
            .collect();
        targets
            .into_iter()
            .map(|(arrow, label, text_box)| FitJob {
                ticket: self.tracker.submit(ArrowKey::new(subject, arrow)),
                label,
                text_box,
                grid,
            })
            .collect()
    }

    /// Apply a deferred fit result. Returns `false` and drops the result when
    /// the job was superseded.
    pub fn complete(&mut self, job: &FitJob, fit: FitResult) -> bool {
        if !self.tracker.accept(&job.ticket) {
            debug!(
                subject = job.ticket.key.subject,
                arrow = job.ticket.key.arrow,
                "discarding stale fit"
            );
            return false;
        }
        let slot = self
            .layout
            .rows
            .get_mut(job.ticket.key.subject)
            .and_then(|row| row.arrows.get_mut(job.ticket.key.arrow));
        match slot {
            Some(arrow) => {
                arrow.fit = fit;
                true
            }
            None => false,
        }
    }

    pub fn pending_fits(&self) -> usize {
        self.tracker.pending()
    }
}
