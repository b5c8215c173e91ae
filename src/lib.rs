//! Storybook Engine — five-page illustrated children's stories from a prompt.
//!
//! A deterministic, template-driven generator always produces a valid
//! story; external text services can be plugged in and are trusted only
//! after their payload passes the same structural validation. Rendering
//! collaborators (illustration, narration, documents) are provider chains
//! tried in a fixed order.

pub mod config;
pub mod core;
pub mod render;
pub mod schema;

pub use crate::config::StorybookConfig;
pub use crate::core::generator::{generate_story, skeleton_story, StoryGenerator};
pub use crate::core::pipeline::{Production, Storybook};
pub use crate::schema::story::{Character, Page, Story, PAGE_COUNT};
pub use crate::schema::style::Style;
