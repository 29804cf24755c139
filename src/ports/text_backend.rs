//! Text generation backend port definition.

use crate::domain::AppError;

/// One candidate generation returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Raw generated text, untrimmed.
    pub text: String,
}

/// Raw response from one completion call.
///
/// A transport-level success may legitimately carry zero candidates; whether
/// the response is usable is judged by the retrying generator, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub candidates: Vec<Candidate>,
}

impl Completion {
    /// Convenience constructor for a single-candidate completion.
    pub fn of_text(text: impl Into<String>) -> Self {
        Self { candidates: vec![Candidate { text: text.into() }] }
    }
}

/// Port for remote text generation.
pub trait TextBackend {
    /// Request one completion for `prompt`, bounded by `max_output_tokens`.
    fn complete(&self, prompt: &str, max_output_tokens: u32) -> Result<Completion, AppError>;
}

/// Mock backend for dry runs without API calls.
#[derive(Debug, Clone, Default)]
pub struct MockTextBackend;

impl TextBackend for MockTextBackend {
    fn complete(&self, prompt: &str, max_output_tokens: u32) -> Result<Completion, AppError> {
        println!("=== MOCK MODE ===");
        println!("Would request completion:");
        println!("  Max output tokens: {}", max_output_tokens);
        println!("  Prompt length: {} chars", prompt.len());

        Ok(Completion::of_text(format!(
            "[mock completion generated at {}]",
            chrono::Utc::now().to_rfc3339()
        )))
    }
}
