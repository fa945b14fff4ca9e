use std::future::Future;
use std::path::{Path, PathBuf};

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::info;

use crate::config::{OpenAiConfig, WhisperCliConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::models::TranscriptSegment;
use crate::process::run_command;

/// Something that can turn a recording into timed text segments
pub trait Transcriber {
    /// Produce the complete, chronologically ordered list of segments
    fn transcribe(
        &self,
        audio: &Path,
    ) -> impl Future<Output = PipelineResult<Vec<TranscriptSegment>>> + Send;

    /// Whether to hand this backend the recording as supplied instead of the
    /// normalized WAV
    fn prefers_source_audio(&self) -> bool {
        false
    }
}

/// whisper.cpp's `whisper-cli`, writing its JSON output into a scratch directory
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    config: WhisperCliConfig,
}

impl WhisperCliTranscriber {
    pub fn new(config: WhisperCliConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, audio: &Path, output_prefix: &Path) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            self.config.model.display().to_string(),
            "-f".to_string(),
            audio.display().to_string(),
            "-oj".to_string(),
            "-of".to_string(),
            output_prefix.display().to_string(),
            "-np".to_string(),
        ];
        if let Some(language) = &self.config.language {
            args.push("-l".to_string());
            args.push(language.clone());
        }
        args
    }
}

impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio: &Path) -> PipelineResult<Vec<TranscriptSegment>> {
        info!(model = %self.config.model.display(), "Transcribing with whisper.cpp");
        let work_dir = tempfile::tempdir()?;
        let output_prefix = work_dir.path().join("transcript");
        let args = self.build_args(audio, &output_prefix);

        run_command(&self.config.binary, &args, None).await?;

        let json_path = output_prefix.with_extension("json");
        let content = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            PipelineError::Transcription(format!(
                "whisper-cli produced no output at {}: {e}",
                json_path.display()
            ))
        })?;
        let segments = parse_segments(&content)?;
        info!("Transcription produced {} segments", segments.len());
        Ok(segments)
    }
}

/// OpenAI-compatible `/audio/transcriptions` endpoint with `verbose_json` output
pub struct OpenAiTranscriber {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiTranscriber {
    pub fn new(config: OpenAiConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: OpenAiConfig, client: Client) -> Self {
        Self { client, config }
    }
}

impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio: &Path) -> PipelineResult<Vec<TranscriptSegment>> {
        info!(model = %self.config.model, "Transcribing with remote API");
        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let part = Part::bytes(bytes).file_name(file_name);
        let mut form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment");
        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }

        let url = format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Transcription(format!(
                "API error: {} - {}",
                status, body
            )));
        }

        let transcript: RawTranscript = response.json().await?;
        let segments = transcript.into_segments();
        info!("Transcription produced {} segments", segments.len());
        Ok(segments)
    }

    /// Uploads are size-limited, so the compressed original is sent as is
    fn prefers_source_audio(&self) -> bool {
        true
    }
}

/// Reads precomputed segments from a JSON file
#[derive(Debug, Clone)]
pub struct FileTranscriber {
    path: PathBuf,
}

impl FileTranscriber {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Transcriber for FileTranscriber {
    async fn transcribe(&self, _audio: &Path) -> PipelineResult<Vec<TranscriptSegment>> {
        info!("Loading transcript segments from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_segments(&content)
    }
}

/// Runtime-selected transcription backend
pub enum TranscriptionBackend {
    WhisperCli(WhisperCliTranscriber),
    OpenAi(OpenAiTranscriber),
    File(FileTranscriber),
}

impl Transcriber for TranscriptionBackend {
    async fn transcribe(&self, audio: &Path) -> PipelineResult<Vec<TranscriptSegment>> {
        match self {
            Self::WhisperCli(t) => t.transcribe(audio).await,
            Self::OpenAi(t) => t.transcribe(audio).await,
            Self::File(t) => t.transcribe(audio).await,
        }
    }

    fn prefers_source_audio(&self) -> bool {
        match self {
            Self::WhisperCli(t) => t.prefers_source_audio(),
            Self::OpenAi(t) => t.prefers_source_audio(),
            Self::File(t) => t.prefers_source_audio(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WhisperCppOffsets {
    /// Milliseconds
    from: u64,
    to: u64,
}

#[derive(Debug, Deserialize)]
struct WhisperCppSegment {
    offsets: WhisperCppOffsets,
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    start: f64,
    end: f64,
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTranscript {
    WhisperCpp { transcription: Vec<WhisperCppSegment> },
    Segments { segments: Vec<RawSegment> },
    List(Vec<RawSegment>),
}

/// Parse transcriber JSON into segments, keeping the upstream order
///
/// Accepts whisper.cpp `-oj` output (`transcription[].offsets` in ms),
/// Whisper/OpenAI `verbose_json` (`segments[]` in seconds), or a bare array
/// of `{start, end, text}`.
pub fn parse_segments(content: &str) -> PipelineResult<Vec<TranscriptSegment>> {
    let raw: RawTranscript = serde_json::from_str(content)
        .map_err(|e| PipelineError::Transcription(format!("invalid transcript JSON: {e}")))?;
    Ok(raw.into_segments())
}

impl RawTranscript {
    fn into_segments(self) -> Vec<TranscriptSegment> {
        match self {
            Self::WhisperCpp { transcription } => transcription
                .into_iter()
                .map(|s| {
                    TranscriptSegment::new(
                        s.offsets.from as f64 / 1000.0,
                        s.offsets.to as f64 / 1000.0,
                        s.text,
                    )
                })
                .collect(),
            Self::Segments { segments } | Self::List(segments) => segments
                .into_iter()
                .map(|s| TranscriptSegment::new(s.start, s.end, s.text))
                .collect(),
        }
    }
}
