use serde::{Deserialize, Serialize};

/// The story themes the fallback generator knows how to tell.
///
/// A theme separates WHAT the story is about from the canned prose
/// that tells it, which lives in the theme book data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Creativity,
    Learning,
    Sharing,
    Adventure,
    Kindness,
    Magic,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Creativity,
        Theme::Learning,
        Theme::Sharing,
        Theme::Adventure,
        Theme::Kindness,
        Theme::Magic,
    ];

    /// Identifier used as the key in theme book files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Creativity => "creativity",
            Self::Learning => "learning",
            Self::Sharing => "sharing",
            Self::Adventure => "adventure",
            Self::Kindness => "kindness",
            Self::Magic => "magic",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Creativity => "creativity and joy",
            Self::Learning => "learning and growth",
            Self::Sharing => "sharing and friendship",
            Self::Adventure => "adventure and discovery",
            Self::Kindness => "kindness and helping",
            Self::Magic => "magic and wonder",
        }
    }

    pub fn from_name(name: &str) -> Option<Theme> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_name(theme.name()), Some(theme));
        }
        assert_eq!(Theme::from_name("horror"), None);
    }

    #[test]
    fn labels() {
        assert_eq!(Theme::Sharing.label(), "sharing and friendship");
        assert_eq!(Theme::Magic.label(), "magic and wonder");
    }
}
