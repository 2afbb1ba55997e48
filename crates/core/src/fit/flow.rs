//! Word-level layout of a three-segment label.
//!
//! The label is flowed as a sequence of words. Words of the emphasis segment
//! that are not ceiling/visibility codes are drawn smaller; all other words
//! use the current font size. Lines share one height, the tallest word at
//! that font size, so wrapping never gets taller as the width grows.

use crate::classify::priority::is_pair_token;
use crate::model::ClassifiedLabel;

use super::measure::{TextExtent, TextMeasurer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Main,
    Emphasis,
    Trailing,
}

/// One word of a label with its size relative to the current font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelWord<'a> {
    pub text: &'a str,
    pub role: SegmentRole,
    pub scale: f64,
}

/// Break a label into words in display order.
pub fn label_words(label: &ClassifiedLabel, plain_word_scale: f64) -> Vec<LabelWord<'_>> {
    let segments = [
        (label.main_text.as_str(), SegmentRole::Main),
        (label.emphasis_text.as_str(), SegmentRole::Emphasis),
        (label.trailing_text.as_str(), SegmentRole::Trailing),
    ];

    segments
        .into_iter()
        .flat_map(|(text, role)| {
            text.split_whitespace().map(move |word| LabelWord {
                text: word,
                role,
                scale: word_scale(word, role, plain_word_scale),
            })
        })
        .collect()
}

fn word_scale(word: &str, role: SegmentRole, plain_word_scale: f64) -> f64 {
    match role {
        SegmentRole::Emphasis if !is_pair_token(word) => plain_word_scale,
        _ => 1.0,
    }
}

/// Size of a flowed label.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowExtent {
    /// Widest line.
    pub width: f64,
    pub height: f64,
    pub lines: usize,
}

struct Metrics {
    words: Vec<TextExtent>,
    gap: f64,
    line_height: f64,
}

fn metrics<M: TextMeasurer>(words: &[LabelWord<'_>], font_px: f64, measurer: &M) -> Metrics {
    let words: Vec<TextExtent> = words
        .iter()
        .map(|w| measurer.measure(w.text, font_px * w.scale, None))
        .collect();
    let gap = measurer.measure(" ", font_px, None).width;
    let line_height = words.iter().map(|e| e.height).fold(0.0, f64::max);
    Metrics {
        words,
        gap,
        line_height,
    }
}

/// Lay the words out on one line.
pub fn single_line<M: TextMeasurer>(
    words: &[LabelWord<'_>],
    font_px: f64,
    measurer: &M,
) -> FlowExtent {
    if words.is_empty() {
        return FlowExtent::default();
    }
    let m = metrics(words, font_px, measurer);
    let width = m.words.iter().map(|e| e.width).sum::<f64>() + m.gap * (m.words.len() - 1) as f64;
    FlowExtent {
        width,
        height: m.line_height,
        lines: 1,
    }
}

/// Greedily fill lines no wider than `wrap_width`.
///
/// A word wider than a whole line is handed to the measurer with the wrap
/// width so the backend can break it; it then occupies as many lines as its
/// wrapped height needs.
pub fn wrapped<M: TextMeasurer>(
    words: &[LabelWord<'_>],
    font_px: f64,
    wrap_width: f64,
    measurer: &M,
) -> FlowExtent {
    if words.is_empty() {
        return FlowExtent::default();
    }
    let m = metrics(words, font_px, measurer);
    if m.line_height <= 0.0 {
        return single_line(words, font_px, measurer);
    }

    let mut lines = 0usize;
    let mut widest: f64 = 0.0;
    let mut current: Option<f64> = None;

    for (word, extent) in words.iter().zip(&m.words) {
        if extent.width > wrap_width {
            if let Some(w) = current.take() {
                widest = widest.max(w);
                lines += 1;
            }
            let broken = measurer.measure(word.text, font_px * word.scale, Some(wrap_width));
            widest = widest.max(broken.width);
            lines += ((broken.height / m.line_height) - 1e-9).ceil().max(1.0) as usize;
            continue;
        }

        current = match current {
            Some(w) if w + m.gap + extent.width <= wrap_width => Some(w + m.gap + extent.width),
            Some(w) => {
                widest = widest.max(w);
                lines += 1;
                Some(extent.width)
            }
            None => Some(extent.width),
        };
    }

    if let Some(w) = current {
        widest = widest.max(w);
        lines += 1;
    }

    FlowExtent {
        width: widest,
        height: lines as f64 * m.line_height,
        lines,
    }
}
