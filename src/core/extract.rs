/// Prompt analysis — character name, species, description, and theme.
///
/// Every keyword category is a flat, case-insensitive substring test
/// against a fixed list. Matches are reported in list order, not in the
/// order they appear in the prompt.

use regex::Regex;
use tracing::debug;

use crate::schema::theme::Theme;

/// Name used when neither a name pattern nor a species keyword matches.
pub const DEFAULT_NAME: &str = "Luna";
/// Species used when no species keyword matches.
pub const DEFAULT_SPECIES: &str = "creature";

/// Tried in order; the first capture wins.
const NAME_PATTERNS: [&str; 7] = [
    r"named\s+([A-Z][a-z]+)",
    r"called\s+([A-Z][a-z]+)",
    r"([A-Z][a-z]+)\s+who",
    r"([A-Z][a-z]+)\s+the\s+",
    r"([A-Z][a-z]+)\s+learns",
    r"([A-Z][a-z]+)\s+discovers",
    r"([A-Z][a-z]+)\s+helps",
];

/// Species keyword and the name it implies.
const SPECIES: [(&str, &str); 7] = [
    ("fox", "Poppy"),
    ("cat", "Whiskers"),
    ("bear", "Buddy"),
    ("unicorn", "Luna"),
    ("mouse", "Mickey"),
    ("rabbit", "Bunny"),
    ("dog", "Rex"),
];

const SIZE_WORDS: [&str; 2] = ["little", "small"];

const COLORS: [&str; 7] = ["red", "blue", "green", "yellow", "orange", "purple", "brown"];

const ACCESSORIES: [(&str, &str); 3] = [
    ("scarf", "wears a colorful scarf"),
    ("hat", "wears a hat"),
    ("collar", "wears a collar"),
];

const TRAITS: [&str; 6] = ["shy", "brave", "curious", "kind", "friendly", "gentle"];

const FEATURES: [(&str, &str); 3] = [
    ("tail", "with a fluffy tail"),
    ("wings", "with beautiful wings"),
    ("horn", "with a magical horn"),
];

/// Theme keyword groups in priority order.
const THEME_KEYWORDS: [(&[&str], Theme); 6] = [
    (&["dance", "music", "rhythm"], Theme::Creativity),
    (&["learn", "teach"], Theme::Learning),
    (&["share", "sharing"], Theme::Sharing),
    (&["adventure", "explore", "discover"], Theme::Adventure),
    (&["help", "kind", "care"], Theme::Kindness),
    (&["magic", "magical", "wonder"], Theme::Magic),
];

const DEFAULT_THEME: Theme = Theme::Adventure;

/// Everything the generator needs to know about a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptProfile {
    pub name: String,
    pub species: String,
    pub description: String,
    pub theme: Theme,
}

/// Compiled name patterns. Build once, analyze many prompts.
#[derive(Debug, Clone)]
pub struct PromptAnalyzer {
    name_patterns: Vec<Regex>,
}

impl PromptAnalyzer {
    pub fn new() -> Result<Self, regex::Error> {
        let name_patterns = NAME_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name_patterns })
    }

    pub fn analyze(&self, prompt: &str) -> PromptProfile {
        let profile = PromptProfile {
            name: self.extract_name(prompt),
            species: extract_species(prompt).to_string(),
            description: describe_character(prompt),
            theme: select_theme(prompt),
        };
        debug!(
            name = %profile.name,
            species = %profile.species,
            theme = profile.theme.name(),
            "analyzed prompt"
        );
        profile
    }

    /// The protagonist's name: first name-pattern capture, else the name
    /// implied by the species keyword, else [`DEFAULT_NAME`].
    pub fn extract_name(&self, prompt: &str) -> String {
        for pattern in &self.name_patterns {
            if let Some(name) = pattern.captures(prompt).and_then(|c| c.get(1)) {
                return name.as_str().to_string();
            }
        }

        let lower = prompt.to_lowercase();
        SPECIES
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, name)| *name)
            .unwrap_or(DEFAULT_NAME)
            .to_string()
    }
}

/// First species keyword found, else [`DEFAULT_SPECIES`].
pub fn extract_species(prompt: &str) -> &'static str {
    let lower = prompt.to_lowercase();
    SPECIES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(keyword, _)| *keyword)
        .unwrap_or(DEFAULT_SPECIES)
}

/// Build the comma-joined description: size and species, colours,
/// accessories, personality, then special features.
pub fn describe_character(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    let species = extract_species(prompt);
    let mut parts = Vec::new();

    if SIZE_WORDS.iter().any(|w| lower.contains(w)) {
        parts.push(format!("small {species}"));
    } else {
        parts.push(species.to_string());
    }

    let colors = matching(&lower, &COLORS);
    if !colors.is_empty() {
        parts.push(format!("with {} fur", colors.join(", ")));
    }

    for (keyword, clause) in ACCESSORIES {
        if lower.contains(keyword) {
            parts.push(clause.to_string());
        }
    }

    let traits = matching(&lower, &TRAITS);
    if !traits.is_empty() {
        parts.push(format!("{} and adventurous", traits.join(", ")));
    }

    for (keyword, clause) in FEATURES {
        if lower.contains(keyword) {
            parts.push(clause.to_string());
        }
    }

    parts.join(", ")
}

/// Pick the theme from the first keyword group with a hit.
pub fn select_theme(prompt: &str) -> Theme {
    let lower = prompt.to_lowercase();
    THEME_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, theme)| *theme)
        .unwrap_or(DEFAULT_THEME)
}

fn matching<'a>(lower: &str, words: &[&'a str]) -> Vec<&'a str> {
    words.iter().copied().filter(|w| lower.contains(w)).collect()
}
