/// Character consistency across pages.
///
/// Image prompts are rewritten so every page carries the same character
/// descriptions and style clause, and stories can be audited for pages
/// that lose track of a character.

use rustc_hash::FxHashMap;
use std::fmt;
use tracing::debug;

use crate::schema::story::{Character, Story};
use crate::schema::style::Style;

const QUALITY_KEYWORDS: [&str; 4] = [
    "consistent character design",
    "same character appearance",
    "detailed illustration",
    "children's book illustration",
];

const COLORS: [&str; 12] = [
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "brown", "black", "white",
    "gray", "grey",
];
const CLOTHING: [&str; 8] = [
    "scarf", "hat", "shirt", "dress", "collar", "bow tie", "jacket", "sweater",
];
const ACCESSORIES: [&str; 7] = ["glasses", "jewelry", "bag", "backpack", "crown", "wings", "horn"];
const PHYSICAL_FEATURES: [&str; 9] = [
    "eyes", "tail", "ears", "mane", "fur", "wings", "horns", "smile", "nose",
];
const PERSONALITY: [&str; 8] = [
    "curious", "shy", "brave", "kind", "playful", "wise", "gentle", "friendly",
];

/// Colours and objects paired up for the visual consistency phrase.
const PAIR_COLORS: [&str; 10] = [
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "brown", "black", "white",
];
const PAIR_OBJECTS: [&str; 8] = [
    "scarf", "hat", "collar", "bow tie", "eyes", "tail", "mane", "fur",
];

/// Append character, style and quality clauses that are not yet present.
///
/// A character whose name already appears in the prompt is assumed to be
/// described there. Characters with an empty name or description are skipped.
pub fn enhance_image_prompt(base: &str, characters: &[Character], style: Style) -> String {
    let mut prompt = base.to_string();

    for character in characters {
        if character.name.is_empty() || character.description.is_empty() {
            continue;
        }
        if !prompt.to_lowercase().contains(&character.name.to_lowercase()) {
            prompt = format!(
                "{prompt}, featuring {}, {}",
                character.name, character.description
            );
        }
    }

    let clause = style.consistency_clause();
    if !prompt.contains(clause) {
        prompt = format!("{prompt}, {clause}");
    }

    for keyword in QUALITY_KEYWORDS {
        if !prompt.to_lowercase().contains(keyword) {
            prompt = format!("{prompt}, {keyword}");
        }
    }

    prompt
}

/// Visual elements found in a description, each list in keyword order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterElements {
    pub colors: Vec<&'static str>,
    pub clothing: Vec<&'static str>,
    pub accessories: Vec<&'static str>,
    pub physical_features: Vec<&'static str>,
    pub personality_traits: Vec<&'static str>,
}

impl CharacterElements {
    pub fn extract(description: &str) -> Self {
        let lower = description.to_lowercase();
        let found = |words: &[&'static str]| -> Vec<&'static str> {
            words.iter().copied().filter(|w| lower.contains(w)).collect()
        };
        Self {
            colors: found(&COLORS),
            clothing: found(&CLOTHING),
            accessories: found(&ACCESSORIES),
            physical_features: found(&PHYSICAL_FEATURES),
            personality_traits: found(&PERSONALITY),
        }
    }
}

/// Up to five descriptive fragments, split on `,` `;` `.`.
pub fn key_phrases(description: &str) -> Vec<String> {
    description
        .split([',', ';', '.'])
        .map(str::trim)
        .filter(|p| (6..50).contains(&p.chars().count()))
        .take(5)
        .map(str::to_string)
        .collect()
}

/// A short phrase pinning down the character's look.
///
/// Colour/object pairs are formed whenever both words occur anywhere in
/// the description; the first two are used. Without any pair, the first
/// six words of the description stand in.
pub fn visual_consistency_phrase(description: &str) -> String {
    let lower = description.to_lowercase();
    let pairs: Vec<String> = PAIR_COLORS
        .iter()
        .filter(|c| lower.contains(*c))
        .flat_map(|color| {
            PAIR_OBJECTS
                .iter()
                .filter(|o| lower.contains(*o))
                .map(move |object| format!("{color} {object}"))
        })
        .take(2)
        .collect();

    if pairs.is_empty() {
        description.split_whitespace().take(6).collect::<Vec<_>>().join(" ")
    } else {
        format!("with {}", pairs.join(", "))
    }
}

/// Everything remembered about one registered character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSheet {
    pub name: String,
    pub description: String,
    pub elements: CharacterElements,
    pub key_phrases: Vec<String>,
    pub visual_consistency: String,
}

/// Character sheets keyed by name. Re-registering a name replaces it.
#[derive(Debug, Clone, Default)]
pub struct CharacterRegistry {
    sheets: FxHashMap<String, CharacterSheet>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for characters with an empty name or description.
    pub fn register(&mut self, character: &Character) -> Option<&CharacterSheet> {
        if character.name.is_empty() || character.description.is_empty() {
            return None;
        }
        let sheet = CharacterSheet {
            name: character.name.clone(),
            description: character.description.clone(),
            elements: CharacterElements::extract(&character.description),
            key_phrases: key_phrases(&character.description),
            visual_consistency: visual_consistency_phrase(&character.description),
        };
        debug!(name = %sheet.name, phrase = %sheet.visual_consistency, "registered character");
        self.sheets.insert(character.name.clone(), sheet);
        self.sheets.get(&character.name)
    }

    pub fn get(&self, name: &str) -> Option<&CharacterSheet> {
        self.sheets.get(name)
    }

    /// The visual consistency phrase for `name`, or empty if unknown.
    pub fn consistency_prompt(&self, name: &str) -> &str {
        self.sheets
            .get(name)
            .map(|s| s.visual_consistency.as_str())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// Neither the page text nor its image prompt names the character.
    NotMentioned { character: String, page: u32 },
    /// The image prompt names the character without its description.
    DescriptionMissing { character: String, page: u32 },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMentioned { character, page } => {
                write!(f, "Character '{character}' not mentioned in page {page}")
            }
            Self::DescriptionMissing { character, page } => write!(
                f,
                "Character '{character}' description missing from page {page} image prompt"
            ),
        }
    }
}

/// Audit a story. All comparisons are case-insensitive substring tests.
pub fn check_consistency(story: &Story) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();

    for page in &story.pages {
        let text = page.text.to_lowercase();
        let prompt = page.image_prompt.to_lowercase();
        for character in &story.characters {
            let name = character.name.to_lowercase();
            if !text.contains(&name) && !prompt.contains(&name) {
                issues.push(ConsistencyIssue::NotMentioned {
                    character: character.name.clone(),
                    page: page.page,
                });
            }
        }
    }

    for page in &story.pages {
        let prompt = page.image_prompt.to_lowercase();
        for character in &story.characters {
            let described = prompt.contains(&character.description.to_lowercase());
            if prompt.contains(&character.name.to_lowercase())
                && !character.description.is_empty()
                && !described
            {
                issues.push(ConsistencyIssue::DescriptionMissing {
                    character: character.name.clone(),
                    page: page.page,
                });
            }
        }
    }

    issues
}

/// Register the story's characters and rewrite every page prompt.
pub fn enhance_story(mut story: Story, style: Style, registry: &mut CharacterRegistry) -> Story {
    for character in &story.characters {
        registry.register(character);
    }
    for page in &mut story.pages {
        page.image_prompt = enhance_image_prompt(&page.image_prompt, &story.characters, style);
    }
    story
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::story::Page;

    fn poppy() -> Character {
        Character {
            name: "Poppy".to_string(),
            description: "small fox, with red fur, wears a colorful scarf".to_string(),
        }
    }

    fn story_with(prompts: [&str; 5], texts: [&str; 5]) -> Story {
        Story {
            title: "t".to_string(),
            characters: vec![poppy()],
            pages: prompts
                .iter()
                .zip(texts)
                .zip(1u32..)
                .map(|((prompt, text), page)| Page {
                    page,
                    text: text.to_string(),
                    image_prompt: prompt.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn enhance_adds_missing_character_and_clauses() {
        let out = enhance_image_prompt("a sunny meadow", &[poppy()], Style::Cartoon);
        assert_eq!(
            out,
            "a sunny meadow, featuring Poppy, small fox, with red fur, wears a colorful scarf, \
             cartoon style, bright colors, simple shapes, child-friendly, \
             consistent character design, same character appearance, \
             detailed illustration, children's book illustration"
        );
    }

    #[test]
    fn enhance_skips_named_character_and_present_keywords() {
        let base = "poppy in a meadow, Detailed Illustration";
        let out = enhance_image_prompt(base, &[poppy()], Style::Flat);
        assert!(!out.contains("featuring"));
        assert_eq!(out.to_lowercase().matches("detailed illustration").count(), 1);
        assert!(out.contains(Style::Flat.consistency_clause()));
    }

    #[test]
    fn enhance_is_idempotent() {
        let once = enhance_image_prompt("a meadow", &[poppy()], Style::Watercolor);
        let twice = enhance_image_prompt(&once, &[poppy()], Style::Watercolor);
        assert_eq!(once, twice);
    }

    #[test]
    fn elements_from_description() {
        let e = CharacterElements::extract("A curious grey cat with green eyes, a bow tie and wings");
        assert_eq!(e.colors, vec!["green", "grey"]);
        assert_eq!(e.clothing, vec!["bow tie"]);
        assert_eq!(e.accessories, vec!["wings"]);
        assert_eq!(e.physical_features, vec!["eyes", "wings"]);
        assert_eq!(e.personality_traits, vec!["curious"]);
    }

    #[test]
    fn key_phrase_limits() {
        let phrases = key_phrases("tiny, small fox; with red fur. wears a colorful scarf, shy");
        assert_eq!(phrases, vec!["small fox", "with red fur", "wears a colorful scarf"]);

        let many = "alpha one, bravo two, charlie three, delta four, echo five, foxtrot six";
        assert_eq!(key_phrases(many).len(), 5);
    }

    #[test]
    fn key_phrases_count_characters_not_bytes() {
        assert_eq!(key_phrases("一只小狐狸, small fox"), vec!["small fox"]);
        assert_eq!(key_phrases("ćwierć, pełen uroku"), vec!["ćwierć", "pełen uroku"]);
    }

    #[test]
    fn visual_phrase_pairs() {
        assert_eq!(
            visual_consistency_phrase("a fox with red fur and a blue scarf"),
            "with red scarf, red fur"
        );
    }

    #[test]
    fn visual_phrase_falls_back_to_words() {
        assert_eq!(
            visual_consistency_phrase("a very kind little unicorn who loves flowers"),
            "a very kind little unicorn who"
        );
    }

    #[test]
    fn registry_round_trip() {
        let mut registry = CharacterRegistry::new();
        let sheet = registry.register(&poppy()).unwrap();
        assert_eq!(sheet.visual_consistency, "with red scarf, red fur");
        assert_eq!(registry.consistency_prompt("Poppy"), "with red scarf, red fur");
        assert_eq!(registry.consistency_prompt("Rex"), "");

        let blank = Character {
            name: "Ghost".to_string(),
            description: String::new(),
        };
        assert!(registry.register(&blank).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn check_finds_missing_mentions() {
        let story = story_with(
            ["meadow"; 5],
            ["Poppy ran.", "Poppy hid.", "The wind blew.", "Poppy sang.", "Poppy slept."],
        );
        assert_eq!(
            check_consistency(&story),
            vec![ConsistencyIssue::NotMentioned {
                character: "Poppy".to_string(),
                page: 3
            }]
        );
    }

    #[test]
    fn check_finds_missing_description() {
        let desc = poppy().description;
        let good = format!("Poppy, {desc}");
        let story = story_with(
            [good.as_str(), good.as_str(), "Poppy in the rain", good.as_str(), good.as_str()],
            ["Poppy"; 5],
        );
        let issues = check_consistency(&story);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].to_string(),
            "Character 'Poppy' description missing from page 3 image prompt"
        );
    }

    #[test]
    fn enhance_story_rewrites_prompts() {
        let story = story_with(["meadow"; 5], ["Poppy"; 5]);
        let mut registry = CharacterRegistry::new();
        let enhanced = enhance_story(story, Style::Painterly, &mut registry);
        assert!(registry.get("Poppy").is_some());
        for page in &enhanced.pages {
            assert!(page.image_prompt.contains("featuring Poppy"));
            assert!(page.image_prompt.contains(Style::Painterly.consistency_clause()));
        }
        assert!(check_consistency(&enhanced).is_empty());
    }
}
