use arrowboard_protocol::{ConditionColor, LabelSegments};
use serde::{Deserialize, Serialize};

/// The classified presentation of one raw condition code.
///
/// Two labels are equal iff all four fields match exactly; the timeline
/// merger relies on this to decide whether adjacent columns join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassifiedLabel {
    pub main_text: String,
    pub emphasis_text: String,
    pub trailing_text: String,
    pub color: ConditionColor,
}

impl ClassifiedLabel {
    /// Build a label, trimming each text segment.
    pub fn new(
        main_text: impl AsRef<str>,
        emphasis_text: impl AsRef<str>,
        trailing_text: impl AsRef<str>,
        color: ConditionColor,
    ) -> Self {
        Self {
            main_text: main_text.as_ref().trim().to_string(),
            emphasis_text: emphasis_text.as_ref().trim().to_string(),
            trailing_text: trailing_text.as_ref().trim().to_string(),
            color,
        }
    }

    /// A label with only a main segment.
    pub fn plain(text: impl AsRef<str>, color: ConditionColor) -> Self {
        Self::new(text, "", "", color)
    }

    /// True when neither the main nor the emphasis segment carries text.
    pub fn is_blank(&self) -> bool {
        self.main_text.is_empty() && self.emphasis_text.is_empty()
    }

    pub fn segments(&self) -> LabelSegments {
        LabelSegments {
            main: self.main_text.clone(),
            emphasis: self.emphasis_text.clone(),
            trailing: self.trailing_text.clone(),
        }
    }

    /// All non-empty segments joined by single spaces.
    pub fn full_text(&self) -> String {
        [&self.main_text, &self.emphasis_text, &self.trailing_text]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_segments() {
        let label = ClassifiedLabel::new("  a ", " b", "c  ", ConditionColor::Blue);
        assert_eq!(label.main_text, "a");
        assert_eq!(label.emphasis_text, "b");
        assert_eq!(label.trailing_text, "c");
    }

    #[test]
    fn equality_is_case_sensitive_and_includes_color() {
        let a = ClassifiedLabel::plain("Туман", ConditionColor::Red);
        let b = ClassifiedLabel::plain("туман", ConditionColor::Red);
        let c = ClassifiedLabel::plain("Туман", ConditionColor::Yellow);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ClassifiedLabel::plain("Туман ", ConditionColor::Red));
    }

    #[test]
    fn full_text_skips_empty_segments() {
        let label = ClassifiedLabel::new("", "туман", "к 12", ConditionColor::Red);
        assert_eq!(label.full_text(), "туман к 12");
        assert!(!label.is_blank());
        assert!(ClassifiedLabel::new("", "", "x", ConditionColor::Red).is_blank());
    }
}
