use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The fixed set of fills an arrow can carry.
///
/// Four members encode a weather-minimum priority (best to worst); `Violet`
/// marks a "below minimum" (минус) condition that overrides any priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionColor {
    Green,
    Blue,
    Yellow,
    Red,
    Violet,
}

impl ConditionColor {
    pub const ALL: [ConditionColor; 5] = [
        ConditionColor::Green,
        ConditionColor::Blue,
        ConditionColor::Yellow,
        ConditionColor::Red,
        ConditionColor::Violet,
    ];

    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#E9FFEA",
            Self::Blue => "#DAE6F4",
            Self::Yellow => "#FFFECE",
            Self::Red => "#FDCDC9",
            Self::Violet => "#DEE7F6",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Green => (0xE9, 0xFF, 0xEA),
            Self::Blue => (0xDA, 0xE6, 0xF4),
            Self::Yellow => (0xFF, 0xFE, 0xCE),
            Self::Red => (0xFD, 0xCD, 0xC9),
            Self::Violet => (0xDE, 0xE7, 0xF6),
        }
    }

    /// Human-readable name shown in color pickers.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Green => "Green (excellent)",
            Self::Blue => "Blue (good)",
            Self::Yellow => "Yellow (marginal)",
            Self::Red => "Red (poor)",
            Self::Violet => "Violet (below minimum)",
        }
    }

    pub fn from_rgb(rgb: (u8, u8, u8)) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.rgb() == rgb)
    }
}

impl fmt::Display for ConditionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a palette color: {0:?}")]
pub struct ParseColorError(pub String);

/// Accepts `#RRGGBB` in any case, or CSS `rgb(r, g, b)` as produced by a
/// browser's computed style.
impl FromStr for ConditionColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseColorError(s.to_string());

        let rgb = if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(err());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            (channel(0)?, channel(2)?, channel(4)?)
        } else if let Some(body) = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<u8> = body
                .split(',')
                .map(|p| p.trim().parse::<u8>().map_err(|_| err()))
                .collect::<Result<_, _>>()?;
            match parts.as_slice() {
                [r, g, b] => (*r, *g, *b),
                _ => return Err(err()),
            }
        } else {
            return Err(err());
        };

        Self::from_rgb(rgb).ok_or_else(err)
    }
}

// Serialized as the hex string so stored boards stay readable.

impl Serialize for ConditionColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

impl<'de> Deserialize<'de> for ConditionColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
