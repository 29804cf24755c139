pub mod assets;
pub mod generator;
pub mod pipeline;
pub mod prompt;

pub use assets::section_catalog;
pub use generator::{RetryPolicy, RetryingGenerator};
pub use pipeline::SectionPipeline;
pub use prompt::PromptBuilder;
