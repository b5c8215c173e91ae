/// Generator integration tests — structural guarantees for any prompt.

use storybook_engine::core::extract::{PromptAnalyzer, DEFAULT_NAME, DEFAULT_SPECIES};
use storybook_engine::core::payload::{SourceError, StoryRequest, StorySource};
use storybook_engine::{generate_story, skeleton_story, Story, StoryGenerator, Style, PAGE_COUNT};

const PROMPTS: [&str; 10] = [
    "",
    "   ",
    "A shy fox named Poppy who learns to share sunshine with the forest",
    "a little purple unicorn with wings who loves magic",
    "A brave bear called Bruno goes on an adventure",
    "a mouse who loves music and dance",
    "teach a rabbit to read",
    "!!!???{{}}",
    "一只小狐狸",
    "The quick brown dog with a red collar helps everyone, very kind and gentle",
];

fn assert_structure(story: &Story) {
    assert_eq!(story.pages.len(), PAGE_COUNT);
    for (i, page) in story.pages.iter().enumerate() {
        assert_eq!(page.page as usize, i + 1);
        assert!(!page.text.is_empty());
        assert!(!page.image_prompt.is_empty());
    }
    assert!(!story.characters.is_empty());
    for character in &story.characters {
        assert!(!character.name.is_empty());
        assert!(!character.description.is_empty());
    }
    assert!(!story.title.is_empty());
}

#[test]
fn every_prompt_yields_a_valid_story() {
    for prompt in PROMPTS {
        for style in Style::ALL {
            let story = generate_story(prompt, style);
            assert_structure(&story);
            assert_eq!(story.validate(), Ok(()), "prompt {prompt:?}");
        }
    }
}

#[test]
fn poppy_prompt_extraction() {
    let story = generate_story(
        "A shy fox named Poppy who learns to share sunshine with the forest",
        Style::Cartoon,
    );
    let poppy = story.protagonist().unwrap();
    assert_eq!(poppy.name, "Poppy");
    assert!(poppy.description.contains("fox"));
    assert!(poppy.description.contains("shy"));
    assert_eq!(story.title, "Poppy's Amazing Adventure");
}

#[test]
fn dance_and_music_select_creativity() {
    for prompt in ["a bear who likes to dance", "a cat who plays music"] {
        let story = generate_story(prompt, Style::Cartoon);
        let all_text: String = story.pages.iter().map(|p| p.text.as_str()).collect();
        assert!(
            all_text.contains("dance teacher"),
            "creativity template not used for {prompt:?}"
        );
    }
}

#[test]
fn unrecognized_prompt_uses_defaults() {
    let analyzer = PromptAnalyzer::new().unwrap();
    let profile = analyzer.analyze("a story about the sea");
    assert_eq!(profile.name, DEFAULT_NAME);
    assert_eq!(profile.species, DEFAULT_SPECIES);

    let story = generate_story("a story about the sea", Style::Flat);
    assert_eq!(story.characters[0].name, DEFAULT_NAME);
    assert!(story.characters[0].description.starts_with(DEFAULT_SPECIES));
}

#[test]
fn output_is_byte_identical_across_calls() {
    for prompt in PROMPTS {
        let a = serde_json::to_string(&generate_story(prompt, Style::Watercolor)).unwrap();
        let b = serde_json::to_string(&generate_story(prompt, Style::Watercolor)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn style_only_changes_image_prompts() {
    let prompt = "a curious cat named Tilly";
    let cartoon = generate_story(prompt, Style::Cartoon);
    let realistic = generate_story(prompt, Style::Realistic);
    assert_eq!(cartoon.title, realistic.title);
    assert_eq!(cartoon.characters, realistic.characters);
    for (a, b) in cartoon.pages.iter().zip(&realistic.pages) {
        assert_eq!(a.text, b.text);
        assert!(a.image_prompt.starts_with("cartoon illustration:"));
        assert!(b.image_prompt.starts_with("realistic illustration:"));
    }
}

#[test]
fn wire_contract_field_names() {
    let json = serde_json::to_value(skeleton_story(Style::Cartoon)).unwrap();
    let object = json.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["characters", "pages", "title"]);
    assert!(json["characters"][0]["name"].is_string());
    assert!(json["characters"][0]["description"].is_string());
    assert_eq!(json["pages"][0]["page"], 1);
    assert!(json["pages"][0]["text"].is_string());
    assert!(json["pages"][0]["image_prompt"].is_string());
}

struct Canned(&'static str);

impl StorySource for Canned {
    fn name(&self) -> &str {
        "canned"
    }

    fn request(&self, request: &StoryRequest) -> Result<String, SourceError> {
        assert!(request.user_prompt.starts_with("Create a story about: "));
        Ok(self.0.to_string())
    }
}

#[test]
fn malformed_external_payloads_fall_back() {
    let generator = StoryGenerator::builder().build().unwrap();
    let expected = generator.generate("a brave bear", Style::Cartoon);

    let three_pages = r#"{"title": "t", "characters": [{"name": "B", "description": "bear"}],
        "pages": [{"page": 1, "text": "a", "image_prompt": "a"},
                  {"page": 2, "text": "b", "image_prompt": "b"},
                  {"page": 3, "text": "c", "image_prompt": "c"}]}"#;
    let no_characters = r#"{"title": "t", "characters": [], "pages": []}"#;

    for raw in ["", "I cannot help with that.", "```json\n{\"title\": 1}\n```", three_pages, no_characters] {
        let story = generator.generate_with_source("a brave bear", Style::Cartoon, &Canned(raw));
        assert_eq!(story, expected, "payload {raw:?} should have been rejected");
    }
}
