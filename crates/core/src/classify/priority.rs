use std::sync::LazyLock;

use arrowboard_protocol::ConditionColor;
use regex::Regex;

/// Marker for a "below minimum" condition; overrides every pair.
pub const NEGATIVE_TOKEN: &str = "минус";

/// `<height>x<visibility>`; the separator may be Latin `x` or Cyrillic `х`.
#[allow(clippy::expect_used)]
static PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+[xх][0-9]+(?:\.[0-9]+)?").expect("pair pattern is valid"));

#[allow(clippy::expect_used)]
static PAIR_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+[xXхХ][0-9]+(?:\.[0-9]+)?$").expect("pair token pattern is valid")
});

const BEST_HEIGHTS: [u64; 4] = [400, 500, 600, 1000];
const GOOD_HEIGHTS: [u64; 5] = [300, 400, 500, 600, 1000];
const MARGINAL_HEIGHTS: [u64; 7] = [100, 200, 300, 400, 500, 600, 1000];
const LOW_HEIGHTS: [u64; 2] = [100, 200];

/// Weather-minimum priority of a ceiling/visibility pair. Higher is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Best = 1,
    Good = 2,
    Marginal = 3,
    Worst = 4,
}

impl Priority {
    pub fn color(self) -> ConditionColor {
        match self {
            Self::Best => ConditionColor::Green,
            Self::Good => ConditionColor::Blue,
            Self::Marginal => ConditionColor::Yellow,
            Self::Worst => ConditionColor::Red,
        }
    }
}

/// A ceiling (height) and visibility pair found in a code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimumPair {
    pub height: u64,
    pub visibility: f64,
}

impl MinimumPair {
    pub fn priority(&self) -> Priority {
        let h = self.height;
        let v = self.visibility;
        if (4.0..=6.0).contains(&v) && BEST_HEIGHTS.contains(&h) {
            Priority::Best
        } else if v == 3.0 && GOOD_HEIGHTS.contains(&h) {
            Priority::Good
        } else if (v == 1.0 || v == 2.0) && MARGINAL_HEIGHTS.contains(&h) {
            Priority::Marginal
        } else if (3.0..=6.0).contains(&v) && LOW_HEIGHTS.contains(&h) {
            Priority::Marginal
        } else {
            Priority::Worst
        }
    }
}

/// Every pair in already-lowercased text. Pairs whose numbers do not fit
/// are reported as `None` so they still count as worst.
pub fn extract_pairs(lowercase: &str) -> Vec<Option<MinimumPair>> {
    PAIR_RE
        .find_iter(lowercase)
        .map(|m| {
            let (height, visibility) = m.as_str().split_once(['x', 'х'])?;
            Some(MinimumPair {
                height: height.parse().ok()?,
                visibility: visibility.parse().ok()?,
            })
        })
        .collect()
}

/// Whether a single word is exactly a ceiling/visibility code.
pub fn is_pair_token(word: &str) -> bool {
    PAIR_TOKEN_RE.is_match(word)
}

/// Color of a whole condition text.
///
/// The negative token wins outright; otherwise the worst pair decides, and
/// text without any pair is worst.
pub fn condition_color(text: &str) -> ConditionColor {
    let normalized = text.trim().to_lowercase();
    if normalized.contains(NEGATIVE_TOKEN) {
        return ConditionColor::Violet;
    }

    let pairs = extract_pairs(&normalized);
    if pairs.is_empty() {
        return ConditionColor::Red;
    }

    pairs
        .iter()
        .map(|pair| pair.map_or(Priority::Worst, |p| p.priority()))
        .max()
        .unwrap_or(Priority::Worst)
        .color()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(height: u64, visibility: f64) -> MinimumPair {
        MinimumPair { height, visibility }
    }

    #[test]
    fn priority_table() {
        assert_eq!(pair(600, 6.0).priority(), Priority::Best);
        assert_eq!(pair(400, 4.0).priority(), Priority::Best);
        assert_eq!(pair(1000, 5.5).priority(), Priority::Best);
        assert_eq!(pair(300, 3.0).priority(), Priority::Good);
        assert_eq!(pair(300, 4.0).priority(), Priority::Worst);
        assert_eq!(pair(200, 2.0).priority(), Priority::Marginal);
        assert_eq!(pair(100, 1.0).priority(), Priority::Marginal);
        assert_eq!(pair(200, 5.0).priority(), Priority::Marginal);
        assert_eq!(pair(50, 0.6).priority(), Priority::Worst);
        assert_eq!(pair(600, 7.0).priority(), Priority::Worst);
        assert_eq!(pair(250, 3.0).priority(), Priority::Worst);
    }

    #[test]
    fn extracts_both_separators() {
        let pairs = extract_pairs("600x6 и 300х3 потом 50х0.6");
        assert_eq!(
            pairs,
            vec![Some(pair(600, 6.0)), Some(pair(300, 3.0)), Some(pair(50, 0.6))]
        );
    }

    #[test]
    fn oversized_numbers_count_as_worst() {
        let pairs = extract_pairs("99999999999999999999999x6");
        assert_eq!(pairs, vec![None]);
        assert_eq!(condition_color("99999999999999999999999x6"), ConditionColor::Red);
    }

    #[test]
    fn worst_pair_wins() {
        assert_eq!(condition_color("600x6 100x1"), ConditionColor::Yellow);
        assert_eq!(condition_color("600x6 300x3"), ConditionColor::Blue);
        assert_eq!(condition_color("600x6"), ConditionColor::Green);
        assert_eq!(condition_color("600x6 50x0.6"), ConditionColor::Red);
    }

    #[test]
    fn negative_token_overrides_pairs() {
        assert_eq!(condition_color("минус"), ConditionColor::Violet);
        assert_eq!(condition_color("600x6 МИНУС 50x0.6"), ConditionColor::Violet);
    }

    #[test]
    fn uppercase_separator_is_accepted() {
        assert_eq!(condition_color("600X6"), ConditionColor::Green);
        assert_eq!(condition_color("600Х6"), ConditionColor::Green);
    }

    #[test]
    fn pair_tokens() {
        assert!(is_pair_token("600х6"));
        assert!(is_pair_token("50X0.6"));
        assert!(!is_pair_token("600x6,"));
        assert!(!is_pair_token("туман"));
    }

    #[test]
    fn no_pair_is_worst() {
        assert_eq!(condition_color("туман"), ConditionColor::Red);
        assert_eq!(condition_color(""), ConditionColor::Red);
    }
}
