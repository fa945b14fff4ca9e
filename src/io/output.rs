use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::{AlignedBlock, AlignmentStats, SpeakerDirectory, SpeakerIdentity};

/// Machine-readable output format
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptExport {
    /// Attributed blocks in transcript order
    pub blocks: Vec<ExportBlock>,
    /// Speaker identities, sorted by speaker id
    pub speakers: Vec<SpeakerIdentity>,
    /// Metadata about the processing
    pub metadata: TranscriptMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportBlock {
    pub speaker_id: String,
    pub display_name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptMetadata {
    pub source_audio: PathBuf,
    pub generated_at: DateTime<Local>,
    pub alignment: AlignmentStats,
}

impl TranscriptExport {
    pub fn new(
        blocks: &[AlignedBlock],
        directory: &SpeakerDirectory,
        metadata: TranscriptMetadata,
    ) -> Self {
        let blocks = blocks
            .iter()
            .map(|b| ExportBlock {
                speaker_id: b.speaker_id.clone(),
                display_name: directory
                    .get(&b.speaker_id)
                    .map(|identity| identity.display_name.clone())
                    .unwrap_or_else(|| b.speaker_id.clone()),
                text: b.text.clone(),
            })
            .collect();

        Self {
            blocks,
            speakers: directory.values().cloned().collect(),
            metadata,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Default location for the rendered document: the input with an `.html` extension
pub fn default_document_path(audio: &Path) -> PathBuf {
    audio.with_extension("html")
}

/// Write the rendered document to disk
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    file.write_all(document.as_bytes())
        .with_context(|| format!("Failed to write document: {:?}", path))?;
    Ok(())
}
