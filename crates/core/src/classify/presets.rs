use arrowboard_protocol::ConditionColor;

use crate::model::ClassifiedLabel;

/// A ready-made condition offered when authoring arrows by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub color: ConditionColor,
}

impl Preset {
    /// The preset text goes in the emphasis segment.
    pub fn label(&self) -> ClassifiedLabel {
        ClassifiedLabel::new("", self.name, "", self.color)
    }
}

pub const PRESETS: [Preset; 10] = [
    Preset { name: "минус", color: ConditionColor::Violet },
    Preset { name: "600х6", color: ConditionColor::Green },
    Preset { name: "300х3", color: ConditionColor::Blue },
    Preset { name: "200х2", color: ConditionColor::Yellow },
    Preset { name: "100х1", color: ConditionColor::Red },
    Preset { name: "50х0.6", color: ConditionColor::Red },
    Preset { name: "туман", color: ConditionColor::Red },
    Preset { name: "гроза", color: ConditionColor::Red },
    Preset { name: "шквал", color: ConditionColor::Red },
    Preset { name: "гололед", color: ConditionColor::Red },
];

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_label_uses_emphasis() {
        let preset = find_preset("гроза").map(Preset::label);
        assert_eq!(
            preset,
            Some(ClassifiedLabel::new("", "гроза", "", ConditionColor::Red))
        );
    }

    #[test]
    fn unknown_preset() {
        assert!(find_preset("снег").is_none());
    }
}
