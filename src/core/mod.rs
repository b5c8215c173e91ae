pub mod consistency;
pub mod extract;
pub mod generator;
pub mod narration;
pub mod payload;
pub mod pipeline;
pub mod template;
