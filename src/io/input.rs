use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::PipelineResult;
use crate::models::Waveform;

/// Open a WAV file and read its format header
///
/// Fails if the file is not a WAV that `hound` can decode.
pub fn load_waveform(path: &Path) -> PipelineResult<Waveform> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let waveform = Waveform {
        path: path.to_path_buf(),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        frames: reader.duration(),
    };
    debug!(
        "Loaded {:?}: {} Hz, {} channels, {:.1}s",
        path,
        waveform.sample_rate,
        waveform.channels,
        waveform.duration_secs()
    );
    Ok(waveform)
}

/// Parse speaker names from a JSON file
///
/// Expected format:
/// ```json
/// {"SPEAKER_00": "Alice Chen", "SPEAKER_01": "Bob Smith"}
/// ```
pub fn parse_names_file(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_names_json(&content)
}

/// Parse a speaker id to name JSON object
pub fn parse_names_json(json: &str) -> Result<HashMap<String, String>> {
    serde_json::from_str(json).context("Failed to parse speaker names JSON")
}
