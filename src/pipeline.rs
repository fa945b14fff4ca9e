use std::path::Path;

use tracing::{debug, info};

use crate::adapters::{Diarizer, Transcriber};
use crate::error::PipelineResult;
use crate::models::{AlignedBlock, AlignmentStats, SpeakerTurn, TranscriptSegment, Waveform};
use crate::stages::align_with_stats;

/// Model outputs for one recording
#[derive(Debug, Clone)]
pub struct ModelOutputs {
    pub turns: Vec<SpeakerTurn>,
    pub segments: Vec<TranscriptSegment>,
}

/// Run diarization and transcription concurrently
///
/// The diarizer always reads the normalized `waveform`. The transcriber gets
/// `source_audio` instead when it prefers the recording as supplied.
/// Both calls must succeed; the first failure is returned and the other
/// call's result is discarded.
pub async fn run_models<D: Diarizer, T: Transcriber>(
    diarizer: &D,
    transcriber: &T,
    source_audio: &Path,
    waveform: &Waveform,
    expected_speakers: Option<u32>,
) -> PipelineResult<ModelOutputs> {
    let transcriber_input = if transcriber.prefers_source_audio() {
        source_audio
    } else {
        waveform.path.as_path()
    };
    debug!("Transcribing {:?}, diarizing {:?}", transcriber_input, waveform.path);

    info!("Running diarization and transcription...");
    let (turns, segments) = tokio::try_join!(
        diarizer.diarize(waveform, expected_speakers),
        transcriber.transcribe(transcriber_input),
    )?;
    Ok(ModelOutputs { turns, segments })
}

/// Run both models on the recording and align their outputs
pub async fn diarize_and_transcribe<D: Diarizer, T: Transcriber>(
    diarizer: &D,
    transcriber: &T,
    source_audio: &Path,
    waveform: &Waveform,
    expected_speakers: Option<u32>,
) -> PipelineResult<(Vec<AlignedBlock>, AlignmentStats)> {
    let outputs =
        run_models(diarizer, transcriber, source_audio, waveform, expected_speakers).await?;

    info!("Combining diarization and transcript...");
    let (blocks, stats) = align_with_stats(&outputs.turns, &outputs.segments);
    info!(
        "Aligned {} turns and {} segments into {} blocks ({} turns dropped, {} segments unattributed)",
        stats.turns, stats.segments, stats.blocks, stats.dropped_turns, stats.unattributed_segments
    );
    Ok((blocks, stats))
}
