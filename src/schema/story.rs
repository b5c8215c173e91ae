use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of pages in every story.
pub const PAGE_COUNT: usize = 5;

/// A character that appears in the story. The description is a
/// comma-joined clause string used verbatim in image prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: String,
}

/// One page of prose plus the prompt used to illustrate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub text: String,
    pub image_prompt: String,
}

/// The top-level story record handed to every downstream consumer.
///
/// The shape is the same whichever path produced it, so field names
/// and cardinalities are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub characters: Vec<Character>,
    pub pages: Vec<Page>,
}

/// A structural problem found by [`Story::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryViolation {
    #[error("expected 5 pages, found {0}")]
    PageCount(usize),
    #[error("page at position {position} is numbered {found}")]
    PageNumber { position: usize, found: u32 },
    #[error("story has no characters")]
    NoCharacters,
    #[error("character {index} has an empty {field}")]
    EmptyCharacterField { index: usize, field: &'static str },
}

impl Story {
    /// Check the structural invariants: exactly five pages numbered
    /// 1..=5 in order, and at least one fully described character.
    pub fn validate(&self) -> Result<(), StoryViolation> {
        if self.pages.len() != PAGE_COUNT {
            return Err(StoryViolation::PageCount(self.pages.len()));
        }
        for (i, page) in self.pages.iter().enumerate() {
            if page.page as usize != i + 1 {
                return Err(StoryViolation::PageNumber {
                    position: i + 1,
                    found: page.page,
                });
            }
        }

        if self.characters.is_empty() {
            return Err(StoryViolation::NoCharacters);
        }
        for (index, character) in self.characters.iter().enumerate() {
            if character.name.trim().is_empty() {
                return Err(StoryViolation::EmptyCharacterField {
                    index,
                    field: "name",
                });
            }
            if character.description.trim().is_empty() {
                return Err(StoryViolation::EmptyCharacterField {
                    index,
                    field: "description",
                });
            }
        }
        Ok(())
    }

    /// Look up a page by its 1-based number.
    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.page == number)
    }

    /// The first listed character.
    pub fn protagonist(&self) -> Option<&Character> {
        self.characters.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_story() -> Story {
        Story {
            title: "Poppy's Amazing Adventure".to_string(),
            characters: vec![Character {
                name: "Poppy".to_string(),
                description: "fox, shy and adventurous".to_string(),
            }],
            pages: (1..=5)
                .map(|n| Page {
                    page: n,
                    text: format!("Page {n} text."),
                    image_prompt: format!("cartoon illustration: scene {n}"),
                })
                .collect(),
        }
    }

    #[test]
    fn valid_story_passes() {
        assert_eq!(make_story().validate(), Ok(()));
    }

    #[test]
    fn wrong_page_count() {
        let mut story = make_story();
        story.pages.pop();
        assert_eq!(story.validate(), Err(StoryViolation::PageCount(4)));
    }

    #[test]
    fn gap_in_numbering() {
        let mut story = make_story();
        story.pages[2].page = 7;
        assert_eq!(
            story.validate(),
            Err(StoryViolation::PageNumber {
                position: 3,
                found: 7
            })
        );
    }

    #[test]
    fn missing_characters() {
        let mut story = make_story();
        story.characters.clear();
        assert_eq!(story.validate(), Err(StoryViolation::NoCharacters));
    }

    #[test]
    fn blank_description() {
        let mut story = make_story();
        story.characters[0].description = "   ".to_string();
        assert_eq!(
            story.validate(),
            Err(StoryViolation::EmptyCharacterField {
                index: 0,
                field: "description"
            })
        );
    }

    #[test]
    fn page_lookup() {
        let story = make_story();
        assert_eq!(story.page(4).map(|p| p.page), Some(4));
        assert!(story.page(6).is_none());
        assert_eq!(story.protagonist().map(|c| c.name.as_str()), Some("Poppy"));
    }

    #[test]
    fn json_field_names() {
        let json = serde_json::to_value(make_story()).unwrap();
        assert!(json.get("title").is_some());
        assert!(json["characters"][0].get("description").is_some());
        assert_eq!(json["pages"][0]["page"], 1);
        assert!(json["pages"][0].get("image_prompt").is_some());
    }
}
