use serde::{Deserialize, Serialize};

use crate::palette::ConditionColor;

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    /// Arrow fill; the palette value is authoritative, renderers only
    /// approximate it when they cannot show true color.
    Condition(ConditionColor),
    ArrowOutline,

    LabelText,
    EmphasisText,

    HeaderBackground,
    HeaderText,
    GridLine,

    RowBackground,
    NameText,
    NameHighlight,
    HazardBand,
    Selection,

    Background,
}
