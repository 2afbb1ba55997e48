//! Text-fit layout: choose a font size and wrap mode so a label fits its
//! arrow.
//!
//! The search walks a fixed ladder of sizes:
//!
//! ```text
//!   max ──step──▶ mid          single line
//!               mid            wrapped
//!   mid ──step──▶ min          wrapped
//!               min            wrapped + truncated (gives up)
//! ```
//!
//! and stops at the first rung where the label fits. Every rung is a pure
//! function of the box width, so a wider box never lands on a lower rung.

pub mod flow;
pub mod measure;
pub mod tracker;

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::{ClassifiedLabel, GridConfig};
use crate::position::PixelBox;

pub use flow::{FlowExtent, LabelWord, SegmentRole, label_words};
pub use measure::{ApproxMeasurer, TextExtent, TextMeasurer};
pub use tracker::{ArrowKey, FitTicket, RefitTracker};

/// Smallest step accepted, so the ladder always has finitely many rungs.
const MIN_STEP_PX: f64 = 0.05;
/// Upper bound on rungs per phase regardless of configuration.
const MAX_RUNGS_PER_PHASE: u32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    pub max_font_px: f64,
    pub mid_font_px: f64,
    pub min_font_px: f64,
    pub step_px: f64,
    /// Horizontal slack kept free so labels do not flap at pixel edges.
    pub fitting_margin_px: f64,
    /// Relative size of plain words inside the emphasis segment.
    pub plain_word_scale: f64,
    /// Height a wrapped label may take.
    pub wrap_max_height_px: f64,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            max_font_px: 14.0,
            mid_font_px: 11.0,
            min_font_px: 7.0,
            step_px: 0.5,
            fitting_margin_px: 4.0,
            plain_word_scale: 0.6,
            wrap_max_height_px: 28.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontTier {
    /// Full size.
    Max,
    /// Between the mid threshold and full size.
    Mid,
    /// Below the mid threshold, down to the minimum.
    Min,
}

/// Presentation chosen for one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub tier: FontTier,
    pub font_px: f64,
    pub wrapped: bool,
    /// Nothing fit; the renderer must clip.
    pub truncated: bool,
    /// Number of layouts measured to reach this result.
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy)]
struct Ladder {
    max: f64,
    mid: f64,
    min: f64,
    step: f64,
}

impl Ladder {
    fn new(settings: &FitSettings) -> Self {
        let min = settings.min_font_px.max(1.0);
        let mid = settings.mid_font_px.max(min);
        let max = settings.max_font_px.max(mid);
        let step = if settings.step_px.is_finite() {
            settings.step_px.max(MIN_STEP_PX)
        } else {
            MIN_STEP_PX
        };
        Self {
            max,
            mid,
            min,
            step,
        }
    }

    fn rungs(&self, from: f64, to: f64) -> u32 {
        let n = ((from - to) / self.step).ceil();
        if n.is_finite() && n > 0.0 {
            (n as u32).min(MAX_RUNGS_PER_PHASE)
        } else {
            0
        }
    }

    fn tier(&self, font_px: f64) -> FontTier {
        if font_px >= self.max {
            FontTier::Max
        } else if font_px >= self.mid {
            FontTier::Mid
        } else {
            FontTier::Min
        }
    }
}

/// Fits labels using an injected measurement backend.
#[derive(Debug, Clone)]
pub struct TextFitter<M> {
    measurer: M,
    settings: FitSettings,
}

impl<M: TextMeasurer> TextFitter<M> {
    pub fn new(measurer: M, settings: FitSettings) -> Self {
        Self { measurer, settings }
    }

    pub fn settings(&self) -> &FitSettings {
        &self.settings
    }

    /// Decide font size and wrap mode for `label` inside `pixel_box`.
    ///
    /// Always returns; the number of measurements is bounded by the size
    /// ladder.
    pub fn fit(&self, label: &ClassifiedLabel, pixel_box: &PixelBox, grid: &GridConfig) -> FitResult {
        let ladder = Ladder::new(&self.settings);
        let words = label_words(label, self.settings.plain_word_scale);
        let available = pixel_box.width - self.settings.fitting_margin_px;
        let attempts = Cell::new(0u32);

        let fits = |font_px: f64, wrap: bool| {
            attempts.set(attempts.get() + 1);
            let extent = if wrap {
                flow::wrapped(&words, font_px, available, &self.measurer)
            } else {
                flow::single_line(&words, font_px, &self.measurer)
            };
            let height_limit = if wrap {
                self.settings.wrap_max_height_px
            } else {
                grid.arrow_height_px
            };
            let ok = extent.width <= available && extent.height <= height_limit;
            trace!(
                font_px,
                wrap,
                width = extent.width,
                height = extent.height,
                available,
                ok,
                "fit attempt"
            );
            ok
        };

        let done = |font_px: f64, wrapped: bool, truncated: bool| FitResult {
            tier: ladder.tier(font_px),
            font_px,
            wrapped,
            truncated,
            attempts: attempts.get(),
        };

        let shrink = ladder.rungs(ladder.max, ladder.mid);
        for k in 0..=shrink {
            let font_px = (ladder.max - f64::from(k) * ladder.step).max(ladder.mid);
            if fits(font_px, false) {
                return done(font_px, false, false);
            }
        }

        if fits(ladder.mid, true) {
            return done(ladder.mid, true, false);
        }

        let shrink = ladder.rungs(ladder.mid, ladder.min);
        for k in 1..=shrink {
            let font_px = (ladder.mid - f64::from(k) * ladder.step).max(ladder.min);
            if fits(font_px, true) {
                return done(font_px, true, false);
            }
        }

        debug!(
            text = %label.full_text(),
            width = pixel_box.width,
            "label does not fit at minimum size; truncating"
        );
        done(ladder.min, true, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrowboard_protocol::ConditionColor;
    use proptest::prelude::*;

    fn fitter() -> TextFitter<ApproxMeasurer> {
        TextFitter::new(ApproxMeasurer::default(), FitSettings::default())
    }

    fn label(main: &str, emphasis: &str, trailing: &str) -> ClassifiedLabel {
        ClassifiedLabel::new(main, emphasis, trailing, ConditionColor::Yellow)
    }

    #[test]
    fn short_label_fits_at_max() {
        let grid = GridConfig::default();
        let r = fitter().fit(&label("600x6", "", ""), &PixelBox::new(1.0, 178.0), &grid);
        assert_eq!(r.tier, FontTier::Max);
        assert_eq!(r.font_px, 14.0);
        assert!(!r.wrapped && !r.truncated);
        assert_eq!(r.attempts, 1);
    }

    #[test]
    fn shrinks_before_wrapping() {
        let grid = GridConfig::default();
        // 5 chars: 42px at 14, 37.5px at 12.5; box leaves 38px
        let r = fitter().fit(&label("600x6", "", ""), &PixelBox::new(1.0, 42.0), &grid);
        assert_eq!(r.tier, FontTier::Mid);
        assert!(!r.wrapped);
        assert!(r.font_px < 14.0 && r.font_px >= 11.0);
    }

    #[test]
    fn wraps_when_mid_is_too_wide() {
        let grid = GridConfig::default();
        // two words at 11px need 33 + 6.6 + 33 on one line; box leaves 40px
        let r = fitter().fit(&label("abcde fghij", "", ""), &PixelBox::new(1.0, 44.0), &grid);
        assert!(r.wrapped);
        assert!(!r.truncated);
        assert!(r.font_px <= 11.0);
    }

    #[test]
    fn two_lines_fit_at_mid() {
        let grid = GridConfig::default();
        // 5 chars at 11px = 33px per line, two lines = 26.4px tall
        let r = fitter().fit(&label("abcde fghij", "", ""), &PixelBox::new(1.0, 44.0), &grid);
        assert_eq!(
            (r.tier, r.font_px, r.wrapped, r.truncated),
            (FontTier::Mid, 11.0, true, false)
        );
        // 7 single-line rungs, then the wrap at mid
        assert_eq!(r.attempts, 8);
    }

    #[test]
    fn gives_up_at_min() {
        let grid = GridConfig::default();
        let long = "очень длинное описание условий которое никак не поместится";
        let r = fitter().fit(&label(long, "", ""), &PixelBox::new(1.0, 28.0), &grid);
        assert_eq!(r.tier, FontTier::Min);
        assert_eq!(r.font_px, 7.0);
        assert!(r.wrapped && r.truncated);
        // 7 single-line rungs, one wrap at mid, 8 wrapped rungs below mid
        assert_eq!(r.attempts, 16);
    }

    #[test]
    fn empty_label_fits() {
        let grid = GridConfig::default();
        let r = fitter().fit(&label("", "", ""), &PixelBox::new(1.0, 10.0), &grid);
        assert_eq!(r.tier, FontTier::Max);
        assert!(!r.truncated);
    }

    #[test]
    fn degenerate_settings_still_terminate() {
        let grid = GridConfig::default();
        let settings = FitSettings {
            max_font_px: 5.0,
            mid_font_px: 40.0,
            min_font_px: f64::NAN,
            step_px: 0.0,
            ..FitSettings::default()
        };
        let fitter = TextFitter::new(ApproxMeasurer::default(), settings);
        let r = fitter.fit(&label("x", "", ""), &PixelBox::new(0.0, 1.0), &grid);
        assert!(r.truncated);
        assert!(r.attempts <= 2 * MAX_RUNGS_PER_PHASE + 2);
    }

    #[test]
    fn nan_measurements_do_not_loop() {
        let grid = GridConfig::default();
        let nan = |_: &str, _: f64, _: Option<f64>| TextExtent::new(f64::NAN, f64::NAN);
        let fitter = TextFitter::new(nan, FitSettings::default());
        let r = fitter.fit(&label("a", "", ""), &PixelBox::new(0.0, 100.0), &grid);
        assert!(r.truncated);
    }

    fn rank(r: &FitResult) -> (u8, bool, i64) {
        // Lower is better: not truncated, not wrapped, bigger font.
        (u8::from(r.truncated), r.wrapped, -(r.font_px * 1000.0) as i64)
    }

    proptest! {
        #[test]
        fn wider_box_never_fits_worse(
            main in "[a-zа-я0-9 ]{0,24}",
            emphasis in prop_oneof![Just(String::new()), Just("100x1 туман".to_string()), Just("гроза".to_string())],
            width in 4.0f64..300.0,
            extra in 0.0f64..200.0,
        ) {
            let grid = GridConfig::default();
            let l = label(&main, &emphasis, "");
            let narrow = fitter().fit(&l, &PixelBox::new(0.0, width), &grid);
            let wide = fitter().fit(&l, &PixelBox::new(0.0, width + extra), &grid);
            prop_assert!(rank(&wide) <= rank(&narrow), "narrow={narrow:?} wide={wide:?}");
        }

        #[test]
        fn fit_is_bounded(main in ".{0,40}", width in -50.0f64..400.0) {
            let grid = GridConfig::default();
            let r = fitter().fit(&label(&main, "", ""), &PixelBox::new(0.0, width), &grid);
            prop_assert!(r.attempts <= 16);
            prop_assert!(r.font_px >= 7.0 && r.font_px <= 14.0);
        }
    }
}
