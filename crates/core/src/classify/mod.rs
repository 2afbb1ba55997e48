//! Raw condition code → [`ClassifiedLabel`].
//!
//! Classification is total: blank input yields `None`, anything else yields
//! a label. Codes that cannot be understood fall into the worst color rather
//! than failing.

pub mod presets;
pub mod priority;

use std::sync::LazyLock;

use regex::Regex;

use crate::model::ClassifiedLabel;

pub use presets::{PRESETS, Preset};
pub use priority::{MinimumPair, NEGATIVE_TOKEN, Priority, condition_color};

/// `<before>{<inside>}<after>`; the first brace pair marks the emphasis.
#[allow(clippy::expect_used)]
static BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\{(.*?)\}(.*)$").expect("bracket pattern is valid"));

/// Weather phenomena emphasized when a code carries no explicit braces.
pub const HAZARD_WORDS: [&str; 5] = ["туман", "гроза", "шквал", "гололед", "гололёд"];

/// Collapse runs of whitespace to one space and trim.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify one raw cell.
pub fn classify(raw: &str) -> Option<ClassifiedLabel> {
    let text = normalize(raw);
    if text.is_empty() {
        return None;
    }

    let color = condition_color(&text);

    if let Some(caps) = BRACKET_RE.captures(&text) {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        return Some(ClassifiedLabel::new(group(1), group(2), group(3), color));
    }

    let (main, emphasis, trailing) = split_hazard(&text);
    Some(ClassifiedLabel::new(main, emphasis, trailing, color))
}

/// Split normalized text around the first hazard word.
///
/// Without a hazard word the whole text is the main segment.
fn split_hazard(text: &str) -> (String, String, String) {
    let words: Vec<&str> = text.split(' ').collect();
    let hit = words.iter().position(|word| {
        let bare = word
            .trim_matches(|c: char| matches!(c, ',' | '.' | ';' | ':' | '!' | '?'))
            .to_lowercase();
        HAZARD_WORDS.contains(&bare.as_str())
    });

    match hit {
        Some(at) => (
            words[..at].join(" "),
            words[at].to_string(),
            words[at + 1..].join(" "),
        ),
        None => (text.to_string(), String::new(), String::new()),
    }
}
