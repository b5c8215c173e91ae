pub mod story;
pub mod style;
pub mod theme;
