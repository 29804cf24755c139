//! Section generation pipeline.

use crate::domain::{AppError, CaseDocument, CaseInput, GenerationConfig};
use crate::services::assets::section_catalog;
use crate::services::generator::RetryingGenerator;
use crate::services::prompt::PromptBuilder;

/// Drives prompt construction and generation for every catalog section, in
/// declaration order, and assembles the final document.
///
/// Sections are generated strictly sequentially. The first section whose
/// retry budget is exhausted aborts the run; no partial document is ever
/// returned to the caller.
pub struct SectionPipeline {
    builder: PromptBuilder,
    generator: RetryingGenerator,
    config: GenerationConfig,
}

impl SectionPipeline {
    pub fn new(generator: RetryingGenerator, config: GenerationConfig) -> Self {
        Self { builder: PromptBuilder::new(), generator, config }
    }

    /// Generate the full case study document for one intake record.
    pub fn run(&self, input: &CaseInput) -> Result<CaseDocument, AppError> {
        let mut document = CaseDocument::default();

        for section in section_catalog() {
            let prompt = self.builder.build(section, input);
            let body = self
                .generator
                .generate(&prompt, self.config.max_output_tokens)
                .map_err(|cause| AppError::SectionFailed {
                    section: section.name.clone(),
                    cause: Box::new(cause),
                })?;
            document.push(&section.name, body);
        }

        Ok(document)
    }
}
