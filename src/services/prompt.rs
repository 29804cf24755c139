//! Prompt construction for section generation.

use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior, context};

use crate::domain::{CaseInput, SectionSpec};
use crate::services::assets;

const PROMPT_TEMPLATE_NAME: &str = "section_prompt";

/// Builds the per-section prompt sent to the text backend.
///
/// Rendering is pure string work: identical inputs always produce identical
/// prompts, and all intake fields flow through opaquely, without escaping.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Render the prompt for one section.
    pub fn build(&self, section: &SectionSpec, input: &CaseInput) -> String {
        let ctx = context! {
            section_name => section.name.as_str(),
            instruction => section.instruction.as_str(),
            age => input.age,
            background => input.background.as_str(),
            specialization => input.specialization.as_str(),
            adl_problem => input.adl_problem.as_str(),
        };

        // The template is embedded and every variable it references is bound
        // above; with both fixed at compile time, rendering cannot fail.
        template_env()
            .get_template(PROMPT_TEMPLATE_NAME)
            .and_then(|template| template.render(ctx))
            .expect("Embedded prompt template must render")
    }
}

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn template_env() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(PROMPT_TEMPLATE_NAME, assets::prompt_template())
            .expect("Embedded prompt template must be valid");
        env
    })
}
