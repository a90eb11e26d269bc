use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::pipeline::PipelineSettings;

/// OpenAI rejects speech requests above 4096 characters
pub const OPENAI_MAX_INPUT_CHARS: usize = 4096;
/// AWS Polly rejects plain-text requests above 3000 characters
pub const POLLY_MAX_INPUT_CHARS: usize = 3000;

const MS_PER_MINUTE: u64 = 60 * 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(String),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: TtsProvider,
    pub openai_api_key: Option<String>,
    pub tts_model: String,
    pub voice: String,
    pub aws_region: String,
    pub chunk_max_chars: usize,
    pub max_segment_minutes: u64,
    pub delete_intermediate: bool,
    pub synthesis_concurrency: usize,
    pub synthesis_max_attempts: u32,
    pub synthesis_retry_backoff_ms: u64,
    pub sources_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub outputs_dir: PathBuf,
    pub done_dir: PathBuf,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TtsProvider {
    OpenAi,
    Polly,
}

impl TtsProvider {
    pub fn max_input_chars(&self) -> usize {
        match self {
            TtsProvider::OpenAi => OPENAI_MAX_INPUT_CHARS,
            TtsProvider::Polly => POLLY_MAX_INPUT_CHARS,
        }
    }

    fn default_voice(&self) -> &'static str {
        match self {
            TtsProvider::OpenAi => "shimmer",
            TtsProvider::Polly => "Joanna",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("TTS_PROVIDER")
            .unwrap_or_else(|| "openai".to_string())
            .to_lowercase()
            .as_str()
        {
            "openai" => TtsProvider::OpenAi,
            "polly" => TtsProvider::Polly,
            other => {
                return Err(ConfigError::Invalid {
                    key: "TTS_PROVIDER".to_string(),
                    message: format!("unknown provider '{}', expected openai or polly", other),
                })
            }
        };

        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());
        if provider == TtsProvider::OpenAi && openai_api_key.is_none() {
            return Err(ConfigError::Missing("OPENAI_API_KEY".to_string()));
        }

        let config = Config {
            provider,
            openai_api_key,
            tts_model: lookup("TTS_MODEL").unwrap_or_else(|| "tts-1".to_string()),
            voice: lookup("TTS_VOICE").unwrap_or_else(|| provider.default_voice().to_string()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "eu-west-1".to_string()),
            chunk_max_chars: parse_or(&lookup, "CHUNK_MAX_CHARS", 3000)?,
            max_segment_minutes: parse_or(&lookup, "MAX_SEGMENT_MINUTES", 60)?,
            delete_intermediate: lookup("DELETE_INTERMEDIATE")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            synthesis_concurrency: parse_or(&lookup, "SYNTHESIS_CONCURRENCY", 4)?,
            synthesis_max_attempts: parse_or(&lookup, "SYNTHESIS_MAX_ATTEMPTS", 3)?,
            synthesis_retry_backoff_ms: parse_or(&lookup, "SYNTHESIS_RETRY_BACKOFF_MS", 1000)?,
            sources_dir: lookup("SOURCES_DIR").unwrap_or_else(|| "sources".to_string()).into(),
            downloads_dir: lookup("DOWNLOADS_DIR")
                .unwrap_or_else(|| "downloads".to_string())
                .into(),
            outputs_dir: lookup("OUTPUTS_DIR").unwrap_or_else(|| "outputs".to_string()).into(),
            done_dir: lookup("DONE_DIR").unwrap_or_else(|| "done".to_string()).into(),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let limit = self.provider.max_input_chars();
        if self.chunk_max_chars == 0 || self.chunk_max_chars > limit {
            return Err(ConfigError::Invalid {
                key: "CHUNK_MAX_CHARS".to_string(),
                message: format!("must be between 1 and {} for this provider", limit),
            });
        }
        if self.max_segment_minutes == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_SEGMENT_MINUTES".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.max_segment_minutes.checked_mul(MS_PER_MINUTE).is_none() {
            return Err(ConfigError::Invalid {
                key: "MAX_SEGMENT_MINUTES".to_string(),
                message: "too large to express in milliseconds".to_string(),
            });
        }
        if self.synthesis_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "SYNTHESIS_CONCURRENCY".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.synthesis_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "SYNTHESIS_MAX_ATTEMPTS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            sources_dir: self.sources_dir.clone(),
            downloads_dir: self.downloads_dir.clone(),
            outputs_dir: self.outputs_dir.clone(),
            done_dir: self.done_dir.clone(),
            voice: self.voice.clone(),
            chunk_max_chars: self.chunk_max_chars,
            max_segment_ms: self.max_segment_minutes.saturating_mul(MS_PER_MINUTE),
            delete_intermediate: self.delete_intermediate,
            synthesis_concurrency: self.synthesis_concurrency,
            synthesis_max_attempts: self.synthesis_max_attempts,
            synthesis_retry_backoff: Duration::from_millis(self.synthesis_retry_backoff_ms),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
