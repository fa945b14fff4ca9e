pub mod adapters;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod process;
pub mod stages;

pub use adapters::{
    CommandDiarizer, DiarizationBackend, Diarizer, FileDiarizer, FileTranscriber,
    OpenAiTranscriber, Transcriber, TranscriptionBackend, WhisperCliTranscriber,
};
pub use config::{DiarizationConfig, FfmpegConfig, OpenAiConfig, WhisperCliConfig};
pub use error::{PipelineError, PipelineResult};
pub use io::{
    PromptNameProvider, TranscriptExport, TranscriptMetadata, default_document_path,
    load_waveform, parse_names_file, prompt_speaker_count, write_document,
};
pub use models::{
    AlignedBlock, AlignmentStats, SpeakerDirectory, SpeakerIdentity, SpeakerTurn, TimeInterval,
    TranscriptSegment, Waveform,
};
pub use pipeline::{ModelOutputs, diarize_and_transcribe, run_models};
pub use stages::{
    NameMap, NameProvider, NoNames, RenderConfig, align, align_with_stats, extract_speaker_names,
    normalize_audio, render_document, resolve_identities,
};
