//! WASM bindings for storybook-engine — powers the browser demo.

use wasm_bindgen::prelude::*;

use storybook_engine::core::consistency::{
    check_consistency, enhance_story, CharacterRegistry,
};
use storybook_engine::core::extract::select_theme;
use storybook_engine::core::payload::parse_payload;
use storybook_engine::schema::theme::Theme;
use storybook_engine::{Story, StoryGenerator, Style};

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct ProfileInfo {
    name: String,
    species: String,
    description: String,
    theme: &'static str,
    theme_label: &'static str,
}

#[derive(serde::Serialize)]
struct AcceptedStory {
    /// "payload" when the supplied JSON was used, "fallback" otherwise.
    source: &'static str,
    /// Why the payload was rejected, if it was.
    rejection: Option<String>,
    story: Story,
}

#[derive(serde::Serialize)]
struct ThemeInfo {
    name: &'static str,
    label: &'static str,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// StorybookDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StorybookDemo {
    generator: StoryGenerator,
}

#[wasm_bindgen]
impl StorybookDemo {
    /// Create a demo instance with the built-in themes.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<StorybookDemo, JsError> {
        let generator = StoryGenerator::builder()
            .seed(seed)
            .build()
            .map_err(|e| JsError::new(&format!("Generator build error: {e}")))?;
        Ok(StorybookDemo { generator })
    }

    /// Generate a story for `prompt` and return it as JSON. Unknown
    /// styles fall back to cartoon.
    pub fn generate(&self, prompt: &str, style: &str) -> Result<String, JsError> {
        let style = Style::parse_or_default(style);
        let story = self.generator.generate(prompt, style);
        let story = enhance_story(story, style, &mut CharacterRegistry::new());
        to_json(&story)
    }

    /// Accept a story produced elsewhere (e.g. by a text service the page
    /// talks to). Invalid payloads are replaced by a generated story.
    pub fn accept_payload(&self, prompt: &str, style: &str, raw: &str) -> Result<String, JsError> {
        let style = Style::parse_or_default(style);
        let (source, rejection, story) = match parse_payload(raw) {
            Ok(story) => ("payload", None, story),
            Err(e) => (
                "fallback",
                Some(e.to_string()),
                self.generator.generate(prompt, style),
            ),
        };
        to_json(&AcceptedStory {
            source,
            rejection,
            story: enhance_story(story, style, &mut CharacterRegistry::new()),
        })
    }

    /// Return the extracted name, species, description and theme as JSON.
    pub fn analyze(&self, prompt: &str) -> Result<String, JsError> {
        let profile = self.generator.analyze(prompt);
        to_json(&ProfileInfo {
            name: profile.name,
            species: profile.species,
            description: profile.description,
            theme: profile.theme.name(),
            theme_label: profile.theme.label(),
        })
    }

    /// Return JSON array of consistency issues found in a story JSON.
    pub fn check_consistency(story_json: &str) -> Result<String, JsError> {
        let story: Story = serde_json::from_str(story_json)
            .map_err(|e| JsError::new(&format!("Invalid story JSON: {e}")))?;
        let issues: Vec<String> = check_consistency(&story)
            .iter()
            .map(ToString::to_string)
            .collect();
        to_json(&issues)
    }

    /// Theme identifier the prompt would be told in.
    pub fn detect_theme(prompt: &str) -> String {
        select_theme(prompt).name().to_string()
    }

    /// Return JSON array of style labels.
    pub fn styles() -> String {
        let labels: Vec<&str> = Style::ALL.iter().map(|s| s.label()).collect();
        serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
    }

    /// Return JSON array of `{name, label}` theme objects.
    pub fn themes() -> String {
        let themes: Vec<ThemeInfo> = Theme::ALL
            .iter()
            .map(|t| ThemeInfo {
                name: t.name(),
                label: t.label(),
            })
            .collect();
        serde_json::to_string(&themes).unwrap_or_else(|_| "[]".to_string())
    }
}
