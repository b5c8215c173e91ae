//! Run configuration, loaded from RON.
//!
//! Every field has a default, so an empty `()` file is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::style::{ImageSize, Style};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorybookConfig {
    pub style: Style,
    pub image_size: ImageSize,
    /// Write a narration script per page.
    pub narration: bool,
    pub output_dir: PathBuf,
    pub seed: u64,
    /// Theme file merged over the built-in themes.
    pub themes: Option<PathBuf>,
}

impl Default for StorybookConfig {
    fn default() -> Self {
        Self {
            style: Style::default(),
            image_size: ImageSize::default(),
            narration: true,
            output_dir: PathBuf::from("storybook_output"),
            seed: 0,
            themes: None,
        }
    }
}

impl StorybookConfig {
    pub fn load_from_ron(path: &Path) -> Result<StorybookConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<StorybookConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }
}
