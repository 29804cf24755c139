//! Completion API client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::domain::{AppError, BackendConfig};
use crate::ports::{Candidate, Completion, TextBackend};

const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
const DEFAULT_STATUS_MESSAGE: &str = "Completion API request failed";

/// HTTP transport for the completion API.
///
/// This client performs a single request per call. Retry behavior is
/// implemented by the retrying generator service.
#[derive(Clone)]
pub struct HttpTextBackend {
    api_key: String,
    config: BackendConfig,
    client: Client,
}

impl std::fmt::Debug for HttpTextBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTextBackend")
            .field("api_url", &self.config.api_url)
            .field("model", &self.config.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpTextBackend {
    /// Create a new HTTP backend with the given API key and configuration.
    pub fn new(api_key: String, config: &BackendConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::BackendError {
                message: format!("Failed to create HTTP client: {}", e),
                status: None,
            })?;

        Ok(Self { api_key, config: config.clone(), client })
    }

    /// Create from environment variable with default configuration.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_env_with_config(&BackendConfig::default())
    }

    /// Create from environment variable with custom configuration.
    pub fn from_env_with_config(config: &BackendConfig) -> Result<Self, AppError> {
        let api_key = std::env::var(API_KEY_ENV_VAR)
            .map_err(|_| AppError::EnvironmentVariableMissing(API_KEY_ENV_VAR.into()))?;

        Self::new(api_key, config)
    }

    fn send_request(&self, request: &ApiRequest) -> Result<Completion, AppError> {
        let response = self
            .client
            .post(self.config.api_url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| AppError::BackendError {
                message: format!("HTTP request failed: {}", e),
                status: None,
            })?;

        let status = response.status();
        let body_text = response.text().unwrap_or_default();

        if status.is_success() {
            let api_response: ApiResponse =
                serde_json::from_str(&body_text).map_err(|e| AppError::BackendError {
                    message: format!("Failed to parse response: {}", e),
                    status: Some(status.as_u16()),
                })?;

            return Ok(Completion {
                candidates: api_response
                    .choices
                    .into_iter()
                    .map(|choice| Candidate { text: choice.text })
                    .collect(),
            });
        }

        let message = extract_error_message(&body_text).unwrap_or_else(|| {
            if !body_text.trim().is_empty() {
                body_text.clone()
            } else if status.as_u16() == 429 {
                "Rate limited".to_string()
            } else if status.is_server_error() {
                "Server error".to_string()
            } else {
                DEFAULT_STATUS_MESSAGE.to_string()
            }
        });

        Err(AppError::BackendError { message, status: Some(status.as_u16()) })
    }
}

impl TextBackend for HttpTextBackend {
    fn complete(&self, prompt: &str, max_output_tokens: u32) -> Result<Completion, AppError> {
        let request = ApiRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: max_output_tokens,
            temperature: self.config.temperature,
        };

        self.send_request(&request)
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    text: String,
}

/// Extract a human-readable message from an API error body, if present.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?;
    let trimmed = message.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
