use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for a laid-out board. Renderers
/// consume this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
    },

    /// Draw a closed, filled polygon (arrow heads).
    DrawPolygon {
        points: Vec<Point>,
        color: ThemeToken,
        stroke: Option<ThemeToken>,
    },

    /// Draw a single-style text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a three-segment condition label inside `rect` with the
    /// presentation chosen by the text-fit pass.
    DrawLabel {
        rect: Rect,
        segments: LabelSegments,
        font_size: f64,
        /// Relative scale applied to plain words of the emphasis segment.
        plain_word_scale: f64,
        wrapped: bool,
        /// The label did not fit even at the smallest size; the renderer
        /// must clip to `rect`.
        truncated: bool,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Begin a logical group (e.g. one subject row).
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// The three text parts of a label as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelSegments {
    pub main: String,
    pub emphasis: String,
    pub trailing: String,
}
