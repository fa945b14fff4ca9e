use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::models::{AlignedBlock, SpeakerDirectory, SpeakerIdentity, fallback_name, speaker_hue};

/// Source of human-readable speaker names
///
/// Returning `None`, or a blank string, selects the positional fallback name.
pub trait NameProvider {
    fn name_for(&mut self, speaker_id: &str) -> Option<String>;
}

impl<F> NameProvider for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn name_for(&mut self, speaker_id: &str) -> Option<String> {
        self(speaker_id)
    }
}

/// Names taken from a fixed speaker id to name mapping, e.g. a names file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap(pub HashMap<String, String>);

impl NameProvider for NameMap {
    fn name_for(&mut self, speaker_id: &str) -> Option<String> {
        self.0.get(speaker_id).cloned()
    }
}

/// Never supplies a name, so every speaker gets the fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameProvider for NoNames {
    fn name_for(&mut self, _speaker_id: &str) -> Option<String> {
        None
    }
}

/// Unique speaker ids referenced by the blocks, in lexicographic order
pub fn unique_speakers(blocks: &[AlignedBlock]) -> Vec<String> {
    blocks
        .iter()
        .map(|b| b.speaker_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Perform Stage 2: build one identity per speaker referenced by the blocks
///
/// Speakers are visited in sorted id order; that order, not order of first
/// appearance, decides the "Speaker N" fallback. The provider is asked once
/// per speaker.
pub fn resolve_identities<P: NameProvider + ?Sized>(
    blocks: &[AlignedBlock],
    names: &mut P,
) -> SpeakerDirectory {
    let speakers = unique_speakers(blocks);
    info!("Resolving identities for {} speakers", speakers.len());

    speakers
        .into_iter()
        .enumerate()
        .map(|(index, speaker_id)| {
            let display_name = names
                .name_for(&speaker_id)
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| fallback_name(index));
            let color_hue = speaker_hue(&speaker_id);
            debug!(speaker = %speaker_id, name = %display_name, hue = color_hue, "Resolved speaker");

            let identity = SpeakerIdentity {
                speaker_id: speaker_id.clone(),
                display_name,
                color_hue,
            };
            (speaker_id, identity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(ids: &[&str]) -> Vec<AlignedBlock> {
        ids.iter().map(|id| AlignedBlock::new(*id, "text")).collect()
    }

    #[test]
    fn test_fallback_names_follow_sorted_order() {
        let directory = resolve_identities(&blocks(&["SPEAKER_01", "SPEAKER_00"]), &mut NoNames);

        assert_eq!(directory["SPEAKER_00"].display_name, "Speaker 1");
        assert_eq!(directory["SPEAKER_01"].display_name, "Speaker 2");
    }

    #[test]
    fn test_keys_match_block_speakers_exactly() {
        let input = blocks(&["B", "A", "B", "C", "A"]);
        let directory = resolve_identities(&input, &mut NoNames);

        let keys: Vec<&str> = directory.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        for block in &input {
            assert!(directory.contains_key(&block.speaker_id));
        }
        for (id, identity) in &directory {
            assert_eq!(&identity.speaker_id, id);
        }
    }

    #[test]
    fn test_supplied_names_are_trimmed() {
        let mut names = NameMap(HashMap::from([
            ("A".to_string(), "  Alice  ".to_string()),
            ("B".to_string(), "   ".to_string()),
        ]));
        let directory = resolve_identities(&blocks(&["A", "B"]), &mut names);

        assert_eq!(directory["A"].display_name, "Alice");
        // Blank name falls back to position
        assert_eq!(directory["B"].display_name, "Speaker 2");
    }

    #[test]
    fn test_closure_provider_asked_once_per_speaker_in_order() {
        let mut asked = Vec::new();
        let mut provider = |id: &str| {
            asked.push(id.to_string());
            (id == "SPEAKER_01").then(|| "CTO".to_string())
        };
        let directory = resolve_identities(
            &blocks(&["SPEAKER_01", "SPEAKER_00", "SPEAKER_01"]),
            &mut provider,
        );

        assert_eq!(asked, vec!["SPEAKER_00", "SPEAKER_01"]);
        assert_eq!(directory["SPEAKER_00"].display_name, "Speaker 1");
        assert_eq!(directory["SPEAKER_01"].display_name, "CTO");
    }

    #[test]
    fn test_hue_matches_speaker_hash() {
        let directory = resolve_identities(&blocks(&["X", "Y"]), &mut NoNames);
        for identity in directory.values() {
            assert!(identity.color_hue < 360);
            assert_eq!(identity.color_hue, speaker_hue(&identity.speaker_id));
        }
    }

    #[test]
    fn test_no_blocks_yields_empty_directory() {
        let directory = resolve_identities(&[], &mut NoNames);
        assert!(directory.is_empty());
    }
}
