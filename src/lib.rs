//! ptcase: Generate multi-section physiotherapy case studies through a remote
//! text-completion backend.
//!
//! The core is a sequential section pipeline: a fixed, ordered catalog of
//! section definitions is rendered into prompts, each prompt is sent to the
//! backend through a retrying generator, and the results are assembled into
//! one Markdown document. Nothing is persisted; a run either yields the full
//! document or fails with the first section's terminal error.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

use adapters::HttpTextBackend;
use ports::TextBackend;
use services::{RetryPolicy, RetryingGenerator, SectionPipeline};

pub use domain::{
    AppConfig, AppError, BackendConfig, CaseDocument, CaseInput, CaseSection, GenerationConfig,
    MAX_PATIENT_AGE, Specialization, parse_config_content,
};
pub use ports::MockTextBackend;
pub use services::section_catalog;

/// Generate a case study using the backend configured from the environment.
///
/// Reads the API key from `OPENAI_API_KEY` and issues one completion request
/// per catalog section, in order. Fails before any generation starts if the
/// key is missing.
pub fn generate_case_study(input: &CaseInput, config: &AppConfig) -> Result<CaseDocument, AppError> {
    let backend = HttpTextBackend::from_env_with_config(&config.backend)?;
    build_pipeline(Box::new(backend), config).run(input)
}

/// Generate a case study against an explicitly supplied backend.
///
/// Used for mock mode and for tests that script backend behavior.
pub fn generate_case_study_with_backend(
    input: &CaseInput,
    config: &AppConfig,
    backend: Box<dyn TextBackend>,
) -> Result<CaseDocument, AppError> {
    build_pipeline(backend, config).run(input)
}

fn build_pipeline(backend: Box<dyn TextBackend>, config: &AppConfig) -> SectionPipeline {
    let policy = RetryPolicy::from_config(&config.backend);
    SectionPipeline::new(RetryingGenerator::new(backend, policy), config.generation.clone())
}
