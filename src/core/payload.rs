/// The contract with an external text-generation service.
///
/// The service is asked for a JSON story; whatever comes back is only
/// trusted after it decodes and passes [`Story::validate`].

use thiserror::Error;

use crate::schema::story::{Story, StoryViolation};
use crate::schema::style::Style;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("story source unavailable: {0}")]
    Unavailable(String),
    #[error("story source failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid story JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload story is invalid: {0}")]
    Invalid(#[from] StoryViolation),
}

/// What gets sent to a [`StorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub style: Style,
}

impl StoryRequest {
    pub fn new(prompt: &str, style: Style) -> Self {
        Self {
            system_prompt: author_instructions(style),
            user_prompt: format!("Create a story about: {prompt}"),
            style,
        }
    }
}

fn author_instructions(style: Style) -> String {
    format!(
        r#"You are a children's book author creating a 5-page illustrated story.
Generate a story in JSON format with this exact structure:
{{
    "title": "Story Title",
    "characters": [
        {{"name": "Character Name", "description": "Detailed physical description for consistent illustration"}}
    ],
    "pages": [
        {{"page": 1, "text": "Story text", "image_prompt": "Detailed visual description for {style} style illustration"}}
    ]
}}

Requirements:
- 5 pages total
- Each page text should be 50-60 words
- Characters must be consistent across all pages
- Image prompts should include character descriptions for visual consistency
- Use {style} art style
- Age appropriate for 3-8 years
- Positive, educational themes
- No copyrighted characters"#
    )
}

/// An external story author. Implementations live outside this crate.
pub trait StorySource {
    fn name(&self) -> &str;
    fn request(&self, request: &StoryRequest) -> Result<String, SourceError>;
}

/// A source that is never configured. Always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl StorySource for NoSource {
    fn name(&self) -> &str {
        "none"
    }

    fn request(&self, _request: &StoryRequest) -> Result<String, SourceError> {
        Err(SourceError::Unavailable("no story source configured".to_string()))
    }
}

/// Pull the JSON out of a model reply. A "```json" fence wins over a
/// bare "```" fence; unfenced input is returned trimmed.
pub fn extract_json_block(raw: &str) -> &str {
    let fenced = |marker: &str| {
        raw.split_once(marker).map(|(_, rest)| match rest.split_once("```") {
            Some((body, _)) => body,
            None => rest,
        })
    };

    fenced("```json")
        .or_else(|| fenced("```"))
        .unwrap_or(raw)
        .trim()
}

/// Decode and validate a model reply. Pages are put in page-number
/// order before validation.
pub fn parse_payload(raw: &str) -> Result<Story, PayloadError> {
    let mut story: Story = serde_json::from_str(extract_json_block(raw))?;
    story.pages.sort_by_key(|p| p.page);
    story.validate()?;
    Ok(story)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "title": "Poppy Shares",
        "characters": [{"name": "Poppy", "description": "small red fox"}],
        "pages": [
            {"page": 1, "text": "One", "image_prompt": "p1"},
            {"page": 2, "text": "Two", "image_prompt": "p2"},
            {"page": 3, "text": "Three", "image_prompt": "p3"},
            {"page": 4, "text": "Four", "image_prompt": "p4"},
            {"page": 5, "text": "Five", "image_prompt": "p5"}
        ]
    }"#;

    #[test]
    fn request_wording() {
        let req = StoryRequest::new("a brave bear", Style::Watercolor);
        assert_eq!(req.user_prompt, "Create a story about: a brave bear");
        assert!(req.system_prompt.contains("Use watercolor art style"));
        assert!(req.system_prompt.contains("5 pages total"));
        assert!(req.system_prompt.contains("\"image_prompt\""));
    }

    #[test]
    fn extract_prefers_json_fence() {
        let raw = "Sure!\n```json\n{\"a\": 1}\n```\nand ```other```";
        assert_eq!(extract_json_block(raw), "{\"a\": 1}");
    }

    #[test]
    fn extract_plain_fence_and_unfenced() {
        assert_eq!(extract_json_block("```\n{}\n```"), "{}");
        assert_eq!(extract_json_block("  {}  \n"), "{}");
        // Unterminated fence: everything after the marker.
        assert_eq!(extract_json_block("```json\n{}"), "{}");
    }

    #[test]
    fn parse_valid_payload() {
        let story = parse_payload(VALID).unwrap();
        assert_eq!(story.title, "Poppy Shares");
        assert_eq!(story.pages.len(), 5);
    }

    #[test]
    fn parse_sorts_pages() {
        let shuffled = VALID.replace(
            r#"{"page": 1, "text": "One", "image_prompt": "p1"},"#,
            "",
        );
        let shuffled = shuffled.replace(
            r#"{"page": 5, "text": "Five", "image_prompt": "p5"}"#,
            r#"{"page": 5, "text": "Five", "image_prompt": "p5"},
            {"page": 1, "text": "One", "image_prompt": "p1"}"#,
        );
        let story = parse_payload(&format!("```json\n{shuffled}\n```")).unwrap();
        assert_eq!(story.pages[0].text, "One");
        assert_eq!(story.pages[4].text, "Five");
    }

    #[test]
    fn parse_rejects_structure() {
        let four = VALID.replace(
            r#",
            {"page": 5, "text": "Five", "image_prompt": "p5"}"#,
            "",
        );
        assert!(matches!(
            parse_payload(&four),
            Err(PayloadError::Invalid(StoryViolation::PageCount(4)))
        ));

        let nameless = VALID.replace("\"Poppy\"", "\"\"");
        assert!(matches!(
            parse_payload(&nameless),
            Err(PayloadError::Invalid(StoryViolation::EmptyCharacterField { .. }))
        ));

        let gap = VALID.replace("\"page\": 3", "\"page\": 7");
        assert!(matches!(
            parse_payload(&gap),
            Err(PayloadError::Invalid(StoryViolation::PageNumber { .. }))
        ));
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(matches!(
            parse_payload("Once upon a time"),
            Err(PayloadError::Json(_))
        ));
        assert!(matches!(
            parse_payload(r#"{"title": "No pages"}"#),
            Err(PayloadError::Json(_))
        ));
    }

    #[test]
    fn no_source_is_unavailable() {
        let req = StoryRequest::new("x", Style::Cartoon);
        assert!(matches!(
            NoSource.request(&req),
            Err(SourceError::Unavailable(_))
        ));
    }
}
