use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use diarscribe::{
    CommandDiarizer, DiarizationBackend, DiarizationConfig, FfmpegConfig, FileDiarizer,
    FileTranscriber, NameMap, NoNames, OpenAiConfig, OpenAiTranscriber, PipelineError,
    PromptNameProvider, RenderConfig, TranscriptExport, TranscriptMetadata, TranscriptionBackend,
    WhisperCliConfig, WhisperCliTranscriber, default_document_path, diarize_and_transcribe,
    load_waveform, normalize_audio, parse_names_file, prompt_speaker_count, render_document,
    resolve_identities, write_document,
};

#[derive(Parser)]
#[command(name = "diarscribe")]
#[command(author, version, about = "Speaker-attributed HTML transcripts from audio recordings", long_about = None)]
struct Cli {
    /// Input audio file (anything ffmpeg can read)
    audio: PathBuf,

    /// Expected number of speakers (skips the prompt)
    #[arg(long)]
    num_speakers: Option<u32>,

    /// JSON file mapping speaker ids to names (skips the name prompts)
    #[arg(long)]
    names: Option<PathBuf>,

    /// Never prompt; unnamed speakers get "Speaker N"
    #[arg(long)]
    no_prompt: bool,

    /// Precomputed diarization turns (RTTM or JSON) instead of running the diarizer
    #[arg(long)]
    turns: Option<PathBuf>,

    /// Precomputed transcript segments (JSON) instead of running the transcriber
    #[arg(long)]
    segments: Option<PathBuf>,

    /// Transcription backend
    #[arg(long, value_enum, default_value_t = TranscriberKind::WhisperCli)]
    transcriber: TranscriberKind,

    /// whisper.cpp model file (overrides WHISPER_MODEL)
    #[arg(long)]
    whisper_model: Option<PathBuf>,

    /// Spoken language code, auto-detected when omitted
    #[arg(long)]
    language: Option<String>,

    /// Diarization program (overrides DIARSCRIBE_DIARIZE_CMD)
    #[arg(long)]
    diarize_cmd: Option<String>,

    /// Output HTML file (defaults to the input with an .html extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a machine-readable JSON transcript
    #[arg(long)]
    json: Option<PathBuf>,

    /// Document title
    #[arg(long, default_value = "Transcript")]
    title: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TranscriberKind {
    /// whisper.cpp command line tool
    WhisperCli,
    /// OpenAI-compatible HTTP API
    Openai,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    setup_logging(cli.verbose);

    match process_audio(cli).await {
        Ok(output) => {
            println!("\nDone! Transcript saved to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn process_audio(cli: Cli) -> Result<PathBuf> {
    if !cli.audio.exists() {
        return Err(PipelineError::InputNotFound(cli.audio).into());
    }

    let diarizer = build_diarizer(&cli);
    let transcriber = build_transcriber(&cli)?;

    // Stage 0: Normalize
    let wav_path = normalize_audio(&cli.audio, &FfmpegConfig::from_env())
        .await
        .context("Failed to prepare audio")?;
    let waveform = load_waveform(&wav_path).context("Failed to read WAV audio")?;

    let expected_speakers = match cli.num_speakers {
        Some(0) => None,
        Some(n) => Some(n),
        None if cli.no_prompt || cli.turns.is_some() => None,
        None => prompt_speaker_count(&mut std::io::stdin().lock(), &mut std::io::stdout()),
    };

    // Stage 1: Diarize, transcribe and align
    let (blocks, stats) =
        diarize_and_transcribe(&diarizer, &transcriber, &cli.audio, &waveform, expected_speakers)
            .await
            .context("Model inference failed")?;
    if blocks.is_empty() {
        warn!("No transcript text overlapped any speaker turn; the document will be empty");
    }

    // Stage 2: Speaker identities
    let directory = if let Some(path) = &cli.names {
        let mut names = NameMap(parse_names_file(path).context("Failed to load speaker names")?);
        resolve_identities(&blocks, &mut names)
    } else if cli.no_prompt {
        resolve_identities(&blocks, &mut NoNames)
    } else {
        resolve_identities(&blocks, &mut PromptNameProvider::stdio())
    };

    // Stage 3: Rendering
    let generated_at = Local::now();
    let render_config = RenderConfig {
        title: cli.title.clone(),
        generated_at: Some(generated_at),
    };
    let document = render_document(&blocks, &directory, &render_config)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_document_path(&cli.audio));
    info!("Writing HTML to {:?}...", output);
    write_document(&output, &document)?;

    if let Some(json_path) = &cli.json {
        info!("Writing JSON transcript to {:?}", json_path);
        let metadata = TranscriptMetadata {
            source_audio: cli.audio.clone(),
            generated_at,
            alignment: stats,
        };
        TranscriptExport::new(&blocks, &directory, metadata).write_json(json_path)?;
    }

    Ok(output)
}

fn build_diarizer(cli: &Cli) -> DiarizationBackend {
    if let Some(path) = &cli.turns {
        return DiarizationBackend::File(FileDiarizer::new(path));
    }

    let mut config = DiarizationConfig::from_env();
    if let Some(program) = &cli.diarize_cmd {
        config.program = program.clone();
    }
    DiarizationBackend::Command(CommandDiarizer::new(config))
}

fn build_transcriber(cli: &Cli) -> Result<TranscriptionBackend> {
    if let Some(path) = &cli.segments {
        return Ok(TranscriptionBackend::File(FileTranscriber::new(path)));
    }

    let backend = match cli.transcriber {
        TranscriberKind::WhisperCli => {
            let mut config = WhisperCliConfig::from_env();
            if let Some(model) = &cli.whisper_model {
                config.model = model.clone();
            }
            if cli.language.is_some() {
                config.language = cli.language.clone();
            }
            TranscriptionBackend::WhisperCli(WhisperCliTranscriber::new(config))
        }
        TranscriberKind::Openai => {
            let mut config = OpenAiConfig::from_env()?;
            config.language = cli.language.clone();
            TranscriptionBackend::OpenAi(OpenAiTranscriber::new(config))
        }
    };
    Ok(backend)
}
