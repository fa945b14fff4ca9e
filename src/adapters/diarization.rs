use std::future::Future;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::DiarizationConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{SpeakerTurn, Waveform};
use crate::process::run_command;

/// Something that can split a recording into speaker turns
pub trait Diarizer {
    /// Produce the complete, chronologically ordered list of turns
    fn diarize(
        &self,
        waveform: &Waveform,
        expected_speakers: Option<u32>,
    ) -> impl Future<Output = PipelineResult<Vec<SpeakerTurn>>> + Send;
}

/// Runs an external diarization program and parses its stdout
///
/// The program is invoked as
/// `PROGRAM [ARGS..] WAV --sample-rate RATE [--num-speakers N]` and must print
/// either RTTM or a JSON array of `{start, end, speaker}` objects.
#[derive(Debug, Clone)]
pub struct CommandDiarizer {
    config: DiarizationConfig,
}

impl CommandDiarizer {
    pub fn new(config: DiarizationConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, waveform: &Waveform, expected_speakers: Option<u32>) -> Vec<String> {
        let mut args = self.config.args.clone();
        args.push(waveform.path.display().to_string());
        args.push("--sample-rate".to_string());
        args.push(waveform.sample_rate.to_string());
        if let Some(n) = expected_speakers {
            args.push("--num-speakers".to_string());
            args.push(n.to_string());
        }
        args
    }
}

impl Diarizer for CommandDiarizer {
    async fn diarize(
        &self,
        waveform: &Waveform,
        expected_speakers: Option<u32>,
    ) -> PipelineResult<Vec<SpeakerTurn>> {
        info!(
            program = %self.config.program,
            expected_speakers = ?expected_speakers,
            "Running diarization"
        );
        let args = self.build_args(waveform, expected_speakers);
        let output = run_command(&self.config.program, &args, None).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let turns = parse_turns(&stdout)?;
        info!("Diarization produced {} turns", turns.len());
        Ok(turns)
    }
}

/// Reads precomputed turns from an RTTM or JSON file
#[derive(Debug, Clone)]
pub struct FileDiarizer {
    path: PathBuf,
}

impl FileDiarizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Diarizer for FileDiarizer {
    async fn diarize(
        &self,
        _waveform: &Waveform,
        _expected_speakers: Option<u32>,
    ) -> PipelineResult<Vec<SpeakerTurn>> {
        info!("Loading diarization turns from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_turns(&content)
    }
}

/// Runtime-selected diarization backend
#[derive(Debug, Clone)]
pub enum DiarizationBackend {
    Command(CommandDiarizer),
    File(FileDiarizer),
}

impl Diarizer for DiarizationBackend {
    async fn diarize(
        &self,
        waveform: &Waveform,
        expected_speakers: Option<u32>,
    ) -> PipelineResult<Vec<SpeakerTurn>> {
        match self {
            Self::Command(d) => d.diarize(waveform, expected_speakers).await,
            Self::File(d) => d.diarize(waveform, expected_speakers).await,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTurn {
    start: f64,
    end: f64,
    #[serde(alias = "label", alias = "speaker_id")]
    speaker: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTurns {
    List(Vec<RawTurn>),
    Wrapped { turns: Vec<RawTurn> },
}

/// Parse diarizer output, either JSON or RTTM, into turns sorted by start time
pub fn parse_turns(content: &str) -> PipelineResult<Vec<SpeakerTurn>> {
    let trimmed = content.trim_start();
    let mut turns = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        parse_json_turns(trimmed)?
    } else {
        parse_rttm(content)?
    };
    turns.sort_by(|a, b| a.interval.start.total_cmp(&b.interval.start));

    let malformed = turns
        .iter()
        .filter(|t| !t.interval.is_well_formed())
        .count();
    if malformed > 0 {
        warn!("{} turns end before they start and will receive no text", malformed);
    }
    let speech_secs: f64 = turns.iter().map(|t| t.interval.duration()).sum();
    debug!("Parsed {} turns covering {:.1}s of speech", turns.len(), speech_secs);

    Ok(turns)
}

fn parse_json_turns(content: &str) -> PipelineResult<Vec<SpeakerTurn>> {
    let raw: RawTurns = serde_json::from_str(content)
        .map_err(|e| PipelineError::Diarization(format!("invalid JSON turns: {e}")))?;
    let list = match raw {
        RawTurns::List(list) | RawTurns::Wrapped { turns: list } => list,
    };
    Ok(list
        .into_iter()
        .map(|t| SpeakerTurn::new(t.start, t.end, t.speaker))
        .collect())
}

/// Parse RTTM `SPEAKER` records; other record types are ignored
///
/// `SPEAKER <file> <chan> <onset> <duration> <ortho> <stype> <name> <conf> <slat>`
fn parse_rttm(content: &str) -> PipelineResult<Vec<SpeakerTurn>> {
    let mut turns = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields[0] != "SPEAKER" {
            debug!("Skipping RTTM record {:?} on line {}", fields[0], line_no + 1);
            continue;
        }
        if fields.len() < 8 {
            return Err(PipelineError::Diarization(format!(
                "RTTM line {} has {} fields, expected at least 8",
                line_no + 1,
                fields.len()
            )));
        }

        let parse = |value: &str, what: &str| {
            value.parse::<f64>().map_err(|_| {
                PipelineError::Diarization(format!(
                    "RTTM line {}: invalid {} {:?}",
                    line_no + 1,
                    what,
                    value
                ))
            })
        };
        let onset = parse(fields[3], "onset")?;
        let duration = parse(fields[4], "duration")?;

        turns.push(SpeakerTurn::new(onset, onset + duration, fields[7]));
    }

    Ok(turns)
}
