use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Display identity for one diarized speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerIdentity {
    pub speaker_id: String,
    /// Human-chosen name, or the positional "Speaker N" fallback
    pub display_name: String,
    /// Hue in degrees, always in `[0, 360)`
    pub color_hue: u16,
}

/// Identities keyed by speaker id, iterated in sorted id order
pub type SpeakerDirectory = BTreeMap<String, SpeakerIdentity>;

/// Positional fallback name for the speaker at 0-based `index` in sorted id order
pub fn fallback_name(index: usize) -> String {
    format!("Speaker {}", index + 1)
}

/// Stable colour hue for a speaker id
///
/// 64-bit FNV-1a over the UTF-8 bytes of the id, reduced mod 360. The same id
/// maps to the same hue in every run and on every platform.
pub fn speaker_hue(speaker_id: &str) -> u16 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = speaker_id.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    });
    (hash % 360) as u16
}
