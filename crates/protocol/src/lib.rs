pub mod commands;
pub mod palette;
pub mod theme;
pub mod types;

pub use commands::{LabelSegments, RenderCommand, TextAlign};
pub use palette::{ConditionColor, ParseColorError};
pub use theme::ThemeToken;
pub use types::{Point, Rect};
