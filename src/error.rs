use std::path::PathBuf;

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures that abort the transcription pipeline
///
/// None of these are retried; the pipeline stops at the first one.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("missing command `{command}` on PATH")]
    CommandMissing { command: String },

    #[error("command failed: `{command}` (status: {status}){stderr_suffix}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr_suffix: String,
    },

    #[error("command timed out after {timeout_secs}s: `{command}`")]
    CommandTimedOut { command: String, timeout_secs: u64 },

    #[error("audio conversion failed: {0}")]
    Conversion(String),

    #[error("could not decode audio: {0}")]
    Audio(#[from] hound::Error),

    #[error("diarization failed: {0}")]
    Diarization(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("document has no embedded speaker name table")]
    MissingNameTable,

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http failure: {0}")]
    Http(#[from] reqwest::Error),
}

impl PipelineError {
    pub fn from_command_failure(command: String, status: i32, stderr: &str) -> Self {
        let trimmed = stderr.trim();
        let stderr_suffix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("; stderr: {trimmed}")
        };
        Self::CommandFailed {
            command,
            status,
            stderr_suffix,
        }
    }
}
