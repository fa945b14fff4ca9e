use serde::{Deserialize, Serialize};

/// Text attributed to one diarization turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedBlock {
    pub speaker_id: String,
    pub text: String,
}

impl AlignedBlock {
    pub fn new(speaker_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            text: text.into(),
        }
    }
}

/// Counters describing how an alignment pass went
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentStats {
    /// Number of input turns
    pub turns: usize,
    /// Number of input segments
    pub segments: usize,
    /// Number of blocks emitted
    pub blocks: usize,
    /// Turns dropped because no non-blank segment started inside them
    pub dropped_turns: usize,
    /// Segments whose start fell inside no turn at all
    pub unattributed_segments: usize,
    /// Segments attributed to more than one (overlapping) turn
    pub multiply_attributed_segments: usize,
}
