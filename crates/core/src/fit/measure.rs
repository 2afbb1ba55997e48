use serde::{Deserialize, Serialize};

/// Measured size of a piece of text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

impl TextExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Text metrics provided by the rendering backend.
///
/// Implementations must be deterministic for identical inputs and free of
/// observable side effects. With `wrap_width` set, the text is laid out in
/// lines no wider than that width (breaking inside words if needed) and the
/// returned height covers all lines.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_px: f64, wrap_width: Option<f64>) -> TextExtent;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, f64, Option<f64>) -> TextExtent,
{
    fn measure(&self, text: &str, font_px: f64, wrap_width: Option<f64>) -> TextExtent {
        self(text, font_px, wrap_width)
    }
}

/// Fixed-advance metrics: every character is `advance × font_px` wide and a
/// line is `line_height × font_px` tall.
///
/// Good enough for terminals and headless layout, and fully deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxMeasurer {
    pub advance: f64,
    pub line_height: f64,
}

impl Default for ApproxMeasurer {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasurer for ApproxMeasurer {
    fn measure(&self, text: &str, font_px: f64, wrap_width: Option<f64>) -> TextExtent {
        let glyph = self.advance * font_px;
        let line = self.line_height * font_px;
        let chars = text.chars().count();
        if chars == 0 {
            return TextExtent::new(0.0, line);
        }
        let natural = chars as f64 * glyph;

        match wrap_width {
            Some(limit) if natural > limit && glyph > 0.0 => {
                let per_line = ((limit / glyph).floor() as usize).max(1);
                let lines = chars.div_ceil(per_line);
                TextExtent::new(per_line.min(chars) as f64 * glyph, lines as f64 * line)
            }
            _ => TextExtent::new(natural, line),
        }
    }
}
