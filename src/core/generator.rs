/// The fallback content generator: prompt → five-page story.
///
/// Wires together prompt analysis, theme selection, and template
/// rendering. Generation never fails: any fault degrades to a minimal
/// skeleton story that still satisfies every structural invariant.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::extract::{PromptAnalyzer, PromptProfile, DEFAULT_NAME, DEFAULT_SPECIES};
use crate::core::payload::{parse_payload, StoryRequest, StorySource};
use crate::core::template::{Bindings, TemplateError, ThemeBook};
use crate::schema::story::{Character, Page, Story, StoryViolation};
use crate::schema::style::Style;

/// Theme templates compiled into the binary.
pub const BUILTIN_THEMES: &str = include_str!("../../story_data/themes.ron");

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("no template for theme '{0}'")]
    ThemeMissing(&'static str),
    #[error("generated story is invalid: {0}")]
    Invalid(#[from] StoryViolation),
}

/// Deterministic story generator. Built via `StoryGenerator::builder()`.
#[derive(Debug, Clone)]
pub struct StoryGenerator {
    analyzer: PromptAnalyzer,
    themes: ThemeBook,
    seed: u64,
}

/// Builder for constructing a `StoryGenerator`.
pub struct StoryGeneratorBuilder {
    seed: u64,
    themes_files: Vec<PathBuf>,
    builtin_themes: bool,
    /// Directly provided themes (for testing without files).
    themes: Option<ThemeBook>,
}

impl StoryGenerator {
    pub fn builder() -> StoryGeneratorBuilder {
        StoryGeneratorBuilder {
            seed: 0,
            themes_files: Vec::new(),
            builtin_themes: true,
            themes: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn themes(&self) -> &ThemeBook {
        &self.themes
    }

    /// Analyze a prompt without generating anything.
    pub fn analyze(&self, prompt: &str) -> PromptProfile {
        self.analyzer.analyze(prompt)
    }

    /// Generate a story for `prompt`. Always returns a valid story.
    pub fn generate(&self, prompt: &str, style: Style) -> Story {
        match self.try_generate(prompt, style) {
            Ok(story) => story,
            Err(e) => {
                warn!(error = %e, "templated generation failed, using skeleton story");
                skeleton_story(style)
            }
        }
    }

    /// Ask an external source first; fall back to [`StoryGenerator::generate`]
    /// when it fails or its payload does not validate.
    pub fn generate_with_source(
        &self,
        prompt: &str,
        style: Style,
        source: &dyn StorySource,
    ) -> Story {
        let request = StoryRequest::new(prompt, style);
        match source.request(&request) {
            Ok(raw) => match parse_payload(&raw) {
                Ok(story) => {
                    info!(source = source.name(), "accepted external story");
                    return story;
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "rejected external story payload");
                }
            },
            Err(e) => {
                warn!(source = source.name(), error = %e, "external story source failed");
            }
        }
        self.generate(prompt, style)
    }

    /// The rich path. Any error here is recoverable by the caller.
    pub fn try_generate(&self, prompt: &str, style: Style) -> Result<Story, GeneratorError> {
        let profile = self.analyzer.analyze(prompt);
        let template = self
            .themes
            .get(profile.theme)
            .ok_or(GeneratorError::ThemeMissing(profile.theme.name()))?;
        info!(theme = profile.theme.name(), "generating story from template");

        let bindings = Bindings {
            name: &profile.name,
            species: &profile.species,
            description: &profile.description,
            style: style.label(),
        };

        let pages = template
            .pages
            .iter()
            .zip(1u32..)
            .map(|(page, number)| Page {
                page: number,
                text: page.text.render(&bindings),
                image_prompt: page.image_prompt(&bindings),
            })
            .collect();

        let story = Story {
            title: format!("{}'s Amazing Adventure", profile.name),
            characters: vec![Character {
                name: profile.name.clone(),
                description: profile.description.clone(),
            }],
            pages,
        };
        story.validate()?;
        Ok(story)
    }
}

impl StoryGeneratorBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Merge a theme file over the built-in themes. Later files win.
    pub fn themes_file(mut self, path: impl AsRef<Path>) -> Self {
        self.themes_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Skip the built-in themes; only files and `with_themes` are used.
    pub fn without_builtin_themes(mut self) -> Self {
        self.builtin_themes = false;
        self
    }

    /// Provide themes directly (for testing without files). Replaces
    /// the built-in themes.
    pub fn with_themes(mut self, themes: ThemeBook) -> Self {
        self.themes = Some(themes);
        self
    }

    pub fn build(self) -> Result<StoryGenerator, GeneratorError> {
        let mut themes = match self.themes {
            Some(themes) => themes,
            None if self.builtin_themes => ThemeBook::parse_ron(BUILTIN_THEMES)?,
            None => ThemeBook::default(),
        };

        for path in &self.themes_files {
            themes.merge(ThemeBook::load_from_ron(path)?);
        }

        Ok(StoryGenerator {
            analyzer: PromptAnalyzer::new()?,
            themes,
            seed: self.seed,
        })
    }
}

/// Generate with the default generator. If even that cannot be built,
/// the skeleton story is returned.
pub fn generate_story(prompt: &str, style: Style) -> Story {
    match StoryGenerator::builder().build() {
        Ok(generator) => generator.generate(prompt, style),
        Err(e) => {
            warn!(error = %e, "could not build story generator, using skeleton story");
            skeleton_story(style)
        }
    }
}

/// The last-resort story: five generic pages that need nothing but a style.
pub fn skeleton_story(style: Style) -> Story {
    let description = format!("friendly {DEFAULT_SPECIES}");
    let beats = [
        (
            format!("Once upon a time, there was a friendly {DEFAULT_SPECIES} named {DEFAULT_NAME}."),
            "smiling in a sunny meadow",
        ),
        (
            format!("One day, {DEFAULT_NAME} set out to see what lay beyond the hill."),
            "walking along a winding path",
        ),
        (
            format!("Along the way, {DEFAULT_NAME} met new friends who wanted to come along."),
            "meeting a group of forest animals",
        ),
        (
            "Together they explored, laughed, and helped each other.".to_string(),
            "exploring the forest with friends",
        ),
        (
            format!("When the sun went down, {DEFAULT_NAME} went home happy, with new friends forever."),
            "waving goodbye under a starry sky",
        ),
    ];

    Story {
        title: format!("{DEFAULT_NAME}'s Adventure"),
        characters: vec![Character {
            name: DEFAULT_NAME.to_string(),
            description: description.clone(),
        }],
        pages: beats
            .into_iter()
            .zip(1u32..)
            .map(|((text, scene), page)| Page {
                page,
                text,
                image_prompt: format!("{} illustration: {description} {scene}", style.label()),
            })
            .collect(),
    }
}
