/// Downstream collaborators — images, narration, and the assembled book.
///
/// Each concern is a [`Provider`] from a request type to an output file.
/// Providers are stacked in a [`ProviderChain`]; the first one that
/// succeeds wins and every failure is logged before the next is tried.

pub mod document;
pub mod narrator;
pub mod placeholder;

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::schema::story::Story;
use crate::schema::style::{ImageSize, Style};

pub use document::{HtmlAssembler, MarkdownAssembler};
pub use narrator::ScriptNarrator;
pub use placeholder::PlaceholderArt;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// A backend for one rendering concern.
pub trait Provider<I, O> {
    /// Short identifier used in logs.
    fn name(&self) -> &str;
    fn provide(&self, input: &I) -> Result<O, ProviderError>;
}

/// Providers in preference order.
pub struct ProviderChain<I, O> {
    providers: Vec<Box<dyn Provider<I, O>>>,
}

impl<I, O> Default for ProviderChain<I, O> {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}

impl<I, O> ProviderChain<I, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; it is tried after all earlier ones.
    pub fn with(mut self, provider: impl Provider<I, O> + 'static) -> Self {
        self.push(provider);
        self
    }

    pub fn push(&mut self, provider: impl Provider<I, O> + 'static) {
        self.providers.push(Box::new(provider));
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Output of the first provider that succeeds, or `None` when every
    /// provider failed (or there are none).
    pub fn run(&self, input: &I) -> Option<O> {
        for provider in &self.providers {
            match provider.provide(input) {
                Ok(output) => {
                    info!(provider = provider.name(), "provider succeeded");
                    return Some(output);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, trying next");
                }
            }
        }
        None
    }
}

/// One page illustration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub style: Style,
    pub size: ImageSize,
    pub page: u32,
}

/// Read-aloud audio (or script) for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationRequest {
    pub text: String,
    pub page: u32,
}

/// The finished book. Pages without an entry in `images` are laid out
/// without an illustration.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    pub story: Story,
    pub images: BTreeMap<u32, PathBuf>,
}

pub type ImageChain = ProviderChain<ImageRequest, PathBuf>;
pub type NarrationChain = ProviderChain<NarrationRequest, PathBuf>;
pub type DocumentChain = ProviderChain<DocumentRequest, PathBuf>;
