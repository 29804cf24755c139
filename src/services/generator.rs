//! Retrying wrapper around the text generation backend.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::domain::{AppError, BackendConfig};
use crate::ports::{Completion, TextBackend};

const DEFAULT_MAX_DELAY_MS: u64 = 10_000;
const MAX_LOG_ERROR_CHARS: usize = 512;

/// Backoff policy for repeated generation attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.retry_delay_ms.max(1),
            max_delay_ms: DEFAULT_MAX_DELAY_MS.max(config.retry_delay_ms),
        }
    }

    fn delay_for_retry(&self, failed_attempt: u32) -> Duration {
        // attempt=1 -> base, attempt=2 -> base*2, attempt=3 -> base*4, capped.
        let exponent = failed_attempt.saturating_sub(1).min(6);
        let multiplier = 1_u64 << exponent;
        let backoff_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        let jitter_ms = compute_jitter_ms(backoff_ms);
        Duration::from_millis(backoff_ms.saturating_add(jitter_ms).min(self.max_delay_ms))
    }
}

/// Generator that retries failed backend calls with bounded exponential backoff.
///
/// Every per-attempt failure is retried identically: a response with no
/// usable text consumes an attempt the same way a transport failure does.
/// Only the final exhaustion error escapes to the caller.
pub struct RetryingGenerator {
    backend: Box<dyn TextBackend>,
    policy: RetryPolicy,
}

impl RetryingGenerator {
    pub fn new(backend: Box<dyn TextBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Request one completion, retrying until the attempt budget is exhausted.
    ///
    /// Returns the first candidate's text, trimmed and guaranteed non-empty.
    pub fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<String, AppError> {
        let mut last_error: Option<AppError> = None;

        for attempt in 1..=self.policy.max_attempts {
            match self
                .backend
                .complete(prompt, max_output_tokens)
                .and_then(validate_completion)
            {
                Ok(text) => return Ok(text),
                Err(error) => {
                    if attempt == self.policy.max_attempts {
                        return Err(AppError::GenerationFailed {
                            attempts: self.policy.max_attempts,
                            cause: Box::new(error),
                        });
                    }

                    let delay = self.policy.delay_for_retry(attempt);
                    eprintln!(
                        "Generation attempt {}/{} failed: {}. Retrying in {} ms.",
                        attempt,
                        self.policy.max_attempts,
                        format_error_for_log(&error),
                        delay.as_millis()
                    );
                    last_error = Some(error);
                    thread::sleep(delay);
                }
            }
        }

        Err(AppError::GenerationFailed {
            attempts: self.policy.max_attempts,
            cause: Box::new(last_error.unwrap_or_else(|| AppError::BackendError {
                message: "Generation failed after retries".to_string(),
                status: None,
            })),
        })
    }
}

/// Extract the first candidate's text, trimmed.
///
/// A response with no candidates, or whose first candidate is empty or
/// whitespace-only, is a retryable failure rather than a silent empty result.
fn validate_completion(completion: Completion) -> Result<String, AppError> {
    let candidate = completion.candidates.into_iter().next().ok_or_else(|| {
        AppError::EmptyCompletion("response contained no generations".to_string())
    })?;

    let text = candidate.text.trim();
    if text.is_empty() {
        return Err(AppError::EmptyCompletion(
            "first generation was empty or whitespace-only".to_string(),
        ));
    }

    Ok(text.to_string())
}

fn compute_jitter_ms(backoff_ms: u64) -> u64 {
    if backoff_ms <= 1 {
        return 0;
    }

    let jitter_cap = backoff_ms / 4; // 25% jitter upper bound
    if jitter_cap == 0 {
        return 0;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.subsec_nanos() as u64)
        .unwrap_or(0);

    nanos % jitter_cap
}

fn format_error_for_log(error: &AppError) -> String {
    match error {
        AppError::BackendError { message, status } => {
            let sanitized = sanitize_and_truncate_for_log(message);
            match status {
                Some(code) => format!("BackendError(status={}): {}", code, sanitized),
                None => format!("BackendError: {}", sanitized),
            }
        }
        _ => sanitize_and_truncate_for_log(&error.to_string()),
    }
}

fn sanitize_and_truncate_for_log(input: &str) -> String {
    let mut output = String::new();

    for (count, ch) in input.chars().enumerate() {
        if count >= MAX_LOG_ERROR_CHARS {
            break;
        }
        output.push(if ch.is_control() { ' ' } else { ch });
    }

    let mut compact = output.split_whitespace().collect::<Vec<_>>().join(" ");
    if input.chars().count() > MAX_LOG_ERROR_CHARS {
        compact.push_str(" [truncated]");
    }
    compact.trim().to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::ports::Candidate;

    struct SequenceBackend {
        attempts: Arc<AtomicUsize>,
        responses: Mutex<Vec<Result<Completion, AppError>>>,
    }

    impl SequenceBackend {
        fn new(responses: Vec<Result<Completion, AppError>>) -> Self {
            Self { attempts: Arc::new(AtomicUsize::new(0)), responses: Mutex::new(responses) }
        }

        fn attempt_counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.attempts)
        }
    }

    impl TextBackend for SequenceBackend {
        fn complete(&self, _prompt: &str, _max_output_tokens: u32) -> Result<Completion, AppError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let mut guard = self.responses.lock().expect("responses lock poisoned");
            if guard.is_empty() {
                return Err(AppError::BackendError {
                    message: "test: unexpected extra call".to_string(),
                    status: Some(500),
                });
            }
            guard.remove(0)
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy { max_attempts, base_delay_ms: 1, max_delay_ms: 2 }
    }

    fn transport_error() -> AppError {
        AppError::BackendError { message: "Server error".to_string(), status: Some(500) }
    }

    #[test]
    fn retries_transient_failures_and_succeeds() {
        let backend = SequenceBackend::new(vec![
            Err(transport_error()),
            Err(AppError::BackendError { message: "Rate limited".to_string(), status: Some(429) }),
            Ok(Completion::of_text("  generated text  ")),
        ]);
        let generator = RetryingGenerator::new(Box::new(backend), policy(3));

        let result = generator.generate("test prompt", 800);
        assert_eq!(result.unwrap(), "generated text");
    }

    #[test]
    fn empty_candidate_list_is_retried() {
        let backend = SequenceBackend::new(vec![
            Ok(Completion::default()),
            Ok(Completion::of_text("recovered")),
        ]);
        let generator = RetryingGenerator::new(Box::new(backend), policy(3));

        let result = generator.generate("test prompt", 800);
        assert_eq!(result.unwrap(), "recovered");
    }

    #[test]
    fn whitespace_only_candidate_is_retried() {
        let backend = SequenceBackend::new(vec![
            Ok(Completion::of_text("   \n\t ")),
            Ok(Completion::of_text("recovered")),
        ]);
        let generator = RetryingGenerator::new(Box::new(backend), policy(3));

        let result = generator.generate("test prompt", 800);
        assert_eq!(result.unwrap(), "recovered");
    }

    #[test]
    fn only_the_first_candidate_is_considered() {
        let backend = SequenceBackend::new(vec![Ok(Completion {
            candidates: vec![
                Candidate { text: "  ".to_string() },
                Candidate { text: "second".to_string() },
            ],
        })]);
        let generator = RetryingGenerator::new(Box::new(backend), policy(1));

        let result = generator.generate("test prompt", 800);
        match result.unwrap_err() {
            AppError::GenerationFailed { cause, .. } => {
                assert!(matches!(*cause, AppError::EmptyCompletion(_)));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn exhaustion_consumes_exactly_the_attempt_budget() {
        let backend = SequenceBackend::new(vec![
            Err(transport_error()),
            Err(transport_error()),
            Err(transport_error()),
            Err(transport_error()),
            Err(transport_error()),
        ]);
        let attempt_counter = backend.attempt_counter();
        let generator = RetryingGenerator::new(Box::new(backend), policy(5));

        let result = generator.generate("test prompt", 800);
        match result.unwrap_err() {
            AppError::GenerationFailed { attempts, cause } => {
                assert_eq!(attempts, 5);
                assert!(matches!(*cause, AppError::BackendError { status: Some(500), .. }));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(attempt_counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn delays_stay_within_policy_bounds() {
        let policy = RetryPolicy { max_attempts: 5, base_delay_ms: 1000, max_delay_ms: 10_000 };

        let mut previous_floor = 0u64;
        for attempt in 1u32..=5 {
            let delay = policy.delay_for_retry(attempt);
            assert!(delay >= Duration::from_millis(1000), "attempt {} below minimum", attempt);
            assert!(delay <= Duration::from_millis(10_000), "attempt {} above cap", attempt);

            // The pre-jitter backoff floor grows monotonically until capped.
            let floor = 1000u64.saturating_mul(1 << (attempt - 1).min(6)).min(10_000);
            assert!(floor >= previous_floor);
            previous_floor = floor;
        }
    }

    #[test]
    fn log_format_sanitizes_control_characters() {
        let err = AppError::BackendError {
            message: "bad\nerror\twith\rcontrols".to_string(),
            status: Some(500),
        };
        let formatted = format_error_for_log(&err);
        assert!(formatted.contains("BackendError(status=500):"));
        assert!(!formatted.contains('\n'));
        assert!(!formatted.contains('\r'));
    }

    #[test]
    fn log_format_truncates_long_messages() {
        let err = AppError::BackendError { message: "x".repeat(2000), status: None };
        let formatted = format_error_for_log(&err);
        assert!(formatted.ends_with("[truncated]"));
        assert!(formatted.len() < 600);
    }
}
