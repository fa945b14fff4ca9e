use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Settings for the ffmpeg conversion step
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// ffmpeg binary (from DIARSCRIBE_FFMPEG, default "ffmpeg")
    pub binary: String,
    /// Kill the conversion after this long (DIARSCRIBE_FFMPEG_TIMEOUT_SECS, 0 disables)
    pub timeout: Option<Duration>,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
            timeout: Some(Duration::from_secs(600)),
        }
    }
}

impl FfmpegConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout = match env_var("DIARSCRIBE_FFMPEG_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.timeout,
        };
        Self {
            binary: env_var("DIARSCRIBE_FFMPEG").unwrap_or(defaults.binary),
            timeout,
        }
    }
}

/// Settings for the external diarization program
#[derive(Debug, Clone)]
pub struct DiarizationConfig {
    /// Program printing RTTM or JSON turns (DIARSCRIBE_DIARIZE_CMD)
    pub program: String,
    /// Extra arguments placed before the audio path (DIARSCRIBE_DIARIZE_ARGS, whitespace separated)
    pub args: Vec<String>,
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            program: "pyannote-diarize".to_string(),
            args: vec![],
        }
    }
}

impl DiarizationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            program: env_var("DIARSCRIBE_DIARIZE_CMD").unwrap_or(defaults.program),
            args: env_var("DIARSCRIBE_DIARIZE_ARGS")
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or(defaults.args),
        }
    }
}

/// Settings for the whisper.cpp command line transcriber
#[derive(Debug, Clone)]
pub struct WhisperCliConfig {
    /// whisper.cpp binary (WHISPER_CLI_BIN, default "whisper-cli")
    pub binary: String,
    /// ggml model file (WHISPER_MODEL)
    pub model: PathBuf,
    /// Spoken language, None for auto-detection
    pub language: Option<String>,
}

impl Default for WhisperCliConfig {
    fn default() -> Self {
        Self {
            binary: "whisper-cli".to_string(),
            model: PathBuf::from("models/ggml-large-v3.bin"),
            language: None,
        }
    }
}

impl WhisperCliConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            binary: env_var("WHISPER_CLI_BIN").unwrap_or(defaults.binary),
            model: env_var("WHISPER_MODEL")
                .map(PathBuf::from)
                .unwrap_or(defaults.model),
            language: env_var("WHISPER_LANGUAGE"),
        }
    }
}

/// Settings for an OpenAI-compatible transcription endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key (from OPENAI_API_KEY env var)
    pub api_key: String,
    /// Base URL up to and including the version segment
    pub base_url: String,
    /// Model to use (e.g., "whisper-1")
    pub model: String,
    pub language: Option<String>,
}

impl OpenAiConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            base_url: env_var("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: env_var("OPENAI_TRANSCRIBE_MODEL").unwrap_or_else(|| "whisper-1".to_string()),
            language: None,
        })
    }

    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            api_key,
            base_url,
            model,
            language: None,
        }
    }
}

/// Non-empty, trimmed value of an environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffmpeg_config_default() {
        let config = FfmpegConfig::default();
        assert_eq!(config.binary, "ffmpeg");
        assert_eq!(config.timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_whisper_cli_config_default() {
        let config = WhisperCliConfig::default();
        assert_eq!(config.binary, "whisper-cli");
        assert!(config.language.is_none());
    }

    #[test]
    fn test_diarization_config_default() {
        let config = DiarizationConfig::default();
        assert_eq!(config.program, "pyannote-diarize");
        assert!(config.args.is_empty());
    }
}
