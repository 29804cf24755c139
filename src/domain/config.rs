//! Generation configuration domain models.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;

/// Configuration for case study generation, loaded from an optional TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Completion API configuration.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Per-section generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.backend.validate()?;
        self.generation.validate()?;
        Ok(())
    }
}

/// Completion API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Completion API endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature sent with every request.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Attempt budget per section, including the first call.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay between retries in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.model.trim().is_empty() {
            return Err(AppError::InvalidConfig("model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::InvalidConfig(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(AppError::InvalidConfig("max_attempts must be greater than 0".to_string()));
        }
        if self.retry_delay_ms == 0 {
            return Err(AppError::InvalidConfig(
                "retry_delay_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_url() -> Url {
    Url::parse("https://api.openai.com/v1/completions").expect("Default API URL must be valid")
}

fn default_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    1000
}

/// Per-section generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Output-length budget per section, in tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { max_output_tokens: default_max_output_tokens() }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_output_tokens == 0 {
            return Err(AppError::InvalidConfig(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_max_output_tokens() -> u32 {
    800
}

/// Parse and validate configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend.max_attempts, 5);
        assert_eq!(config.backend.retry_delay_ms, 1000);
        assert_eq!(config.generation.max_output_tokens, 800);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config = parse_config_content(
            r#"
[backend]
model = "gpt-4o-mini"
max_attempts = 3

[generation]
max_output_tokens = 400
"#,
        )
        .unwrap();

        assert_eq!(config.backend.model, "gpt-4o-mini");
        assert_eq!(config.backend.max_attempts, 3);
        assert_eq!(config.backend.timeout_secs, 60);
        assert_eq!(config.generation.max_output_tokens, 400);
    }

    #[test]
    fn rejects_zero_attempt_budget() {
        let result = parse_config_content("[backend]\nmax_attempts = 0\n");
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = parse_config_content("[backend]\nmax_retries = 3\n");
        assert!(matches!(result, Err(AppError::TomlParseError(_))));
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let result = parse_config_content("[backend]\ntemperature = 3.5\n");
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }
}
