/// The storybook pipeline: prompt → story → illustrations, narration, book.
///
/// Wires together story generation, character consistency, and the
/// rendering chains. Every stage degrades instead of failing, so a
/// request always yields a story even when nothing could be rendered.

use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::StorybookConfig;
use crate::core::consistency::{check_consistency, enhance_story, CharacterRegistry, ConsistencyIssue};
use crate::core::generator::{GeneratorError, StoryGenerator};
use crate::core::payload::StorySource;
use crate::render::{
    DocumentChain, DocumentRequest, HtmlAssembler, ImageChain, ImageRequest, MarkdownAssembler,
    NarrationChain, NarrationRequest, PlaceholderArt, ScriptNarrator,
};
use crate::schema::story::Story;

/// Everything one request produced.
#[derive(Debug, Clone)]
pub struct Production {
    pub story: Story,
    /// Page number → illustration. Pages that failed to render are absent.
    pub images: BTreeMap<u32, PathBuf>,
    /// Page number → narration file. Empty when narration is off.
    pub narration: BTreeMap<u32, PathBuf>,
    pub document: Option<PathBuf>,
    /// Consistency problems left after prompt enhancement.
    pub issues: Vec<ConsistencyIssue>,
}

/// The top-level storybook producer.
pub struct Storybook {
    generator: StoryGenerator,
    source: Option<Box<dyn StorySource>>,
    images: ImageChain,
    narration: Option<NarrationChain>,
    documents: DocumentChain,
}

impl Storybook {
    /// A storybook with no source and empty rendering chains.
    pub fn new(generator: StoryGenerator) -> Self {
        Self {
            generator,
            source: None,
            images: ImageChain::new(),
            narration: None,
            documents: DocumentChain::new(),
        }
    }

    /// The local, offline stack described by `config`: placeholder art
    /// under `images/`, narration scripts under `narration/` when
    /// enabled, and an HTML book with a Markdown fallback.
    pub fn from_config(config: &StorybookConfig) -> Result<Storybook, GeneratorError> {
        let mut builder = StoryGenerator::builder().seed(config.seed);
        if let Some(themes) = &config.themes {
            builder = builder.themes_file(themes);
        }

        let out = &config.output_dir;
        let mut storybook = Storybook::new(builder.build()?)
            .with_images(ImageChain::new().with(PlaceholderArt::new(out.join("images"), config.seed)))
            .with_documents(
                DocumentChain::new()
                    .with(HtmlAssembler::new(out))
                    .with(MarkdownAssembler::new(out)),
            );
        if config.narration {
            storybook = storybook
                .with_narration(NarrationChain::new().with(ScriptNarrator::new(out.join("narration"))));
        }
        Ok(storybook)
    }

    pub fn with_source(mut self, source: impl StorySource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_images(mut self, images: ImageChain) -> Self {
        self.images = images;
        self
    }

    pub fn with_narration(mut self, narration: NarrationChain) -> Self {
        self.narration = Some(narration);
        self
    }

    pub fn with_documents(mut self, documents: DocumentChain) -> Self {
        self.documents = documents;
        self
    }

    pub fn generator(&self) -> &StoryGenerator {
        &self.generator
    }

    /// Run one request end to end.
    pub fn produce(&self, prompt: &str, config: &StorybookConfig) -> Production {
        let style = config.style;
        let story = match &self.source {
            Some(source) => self.generator.generate_with_source(prompt, style, source.as_ref()),
            None => self.generator.generate(prompt, style),
        };

        let mut registry = CharacterRegistry::new();
        let story = enhance_story(story, style, &mut registry);
        let issues = check_consistency(&story);
        for issue in &issues {
            warn!(%issue, "consistency issue");
        }

        let mut images = BTreeMap::new();
        for page in &story.pages {
            let request = ImageRequest {
                prompt: page.image_prompt.clone(),
                style,
                size: config.image_size,
                page: page.page,
            };
            match self.images.run(&request) {
                Some(path) => {
                    images.insert(page.page, path);
                }
                None => warn!(page = page.page, "no illustration for page"),
            }
        }

        let mut narration = BTreeMap::new();
        if config.narration {
            if let Some(chain) = &self.narration {
                for page in &story.pages {
                    let request = NarrationRequest {
                        text: page.text.clone(),
                        page: page.page,
                    };
                    if let Some(path) = chain.run(&request) {
                        narration.insert(page.page, path);
                    }
                }
            }
        }

        let document = self.documents.run(&DocumentRequest {
            story: story.clone(),
            images: images.clone(),
        });
        if document.is_none() {
            warn!("no document backend succeeded");
        }

        info!(
            title = %story.title,
            images = images.len(),
            narration = narration.len(),
            "storybook produced"
        );

        Production {
            story,
            images,
            narration,
            document,
            issues,
        }
    }
}
