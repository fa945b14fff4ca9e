use tracing::debug;

use crate::models::{AlignedBlock, AlignmentStats, SpeakerTurn, TranscriptSegment};

/// Perform Stage 1: attribute transcript text to diarization turns
///
/// A segment belongs to a turn when the segment's *start* lies within
/// `[turn.start, turn.end]`, inclusive on both ends. The segment's end is not
/// considered, so a segment starting before a turn is never attributed to it
/// even if it runs into the turn.
///
/// Matching texts are trimmed, blank ones dropped, and the rest joined with a
/// single space in segment order. Turns left without text produce no block.
/// Output follows input turn order. Overlapping turns may share a segment.
pub fn align(turns: &[SpeakerTurn], segments: &[TranscriptSegment]) -> Vec<AlignedBlock> {
    align_with_stats(turns, segments).0
}

/// Same as [`align`], also reporting how many turns and segments went unused
pub fn align_with_stats(
    turns: &[SpeakerTurn],
    segments: &[TranscriptSegment],
) -> (Vec<AlignedBlock>, AlignmentStats) {
    let mut attributions = vec![0usize; segments.len()];
    let mut blocks = Vec::new();

    for turn in turns {
        let mut texts: Vec<&str> = Vec::new();

        for (index, segment) in segments.iter().enumerate() {
            if !turn.interval.contains(segment.interval.start) {
                continue;
            }
            attributions[index] += 1;
            let text = segment.text.trim();
            if !text.is_empty() {
                texts.push(text);
            }
        }

        if texts.is_empty() {
            debug!(
                speaker = %turn.speaker_id,
                start = turn.interval.start,
                end = turn.interval.end,
                "Dropping turn with no transcript text"
            );
            continue;
        }

        blocks.push(AlignedBlock::new(turn.speaker_id.clone(), texts.join(" ")));
    }

    let stats = AlignmentStats {
        turns: turns.len(),
        segments: segments.len(),
        blocks: blocks.len(),
        dropped_turns: turns.len() - blocks.len(),
        unattributed_segments: attributions.iter().filter(|&&n| n == 0).count(),
        multiply_attributed_segments: attributions.iter().filter(|&&n| n > 1).count(),
    };

    (blocks, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(start: f64, end: f64, speaker: &str) -> SpeakerTurn {
        SpeakerTurn::new(start, end, speaker)
    }

    fn seg(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(start, end, text)
    }

    #[test]
    fn test_two_speakers_each_get_their_segment() {
        let turns = vec![turn(0.0, 5.0, "A"), turn(5.0, 10.0, "B")];
        let segments = vec![seg(0.0, 2.0, "hi"), seg(6.0, 8.0, "there")];

        let blocks = align(&turns, &segments);

        assert_eq!(
            blocks,
            vec![AlignedBlock::new("A", "hi"), AlignedBlock::new("B", "there")]
        );
    }

    #[test]
    fn test_segment_after_turn_end_is_not_attributed() {
        let blocks = align(&[turn(0.0, 5.0, "A")], &[seg(6.0, 8.0, "late")]);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_membership_uses_segment_start_only() {
        // Starts inside, ends well past the turn
        let blocks = align(&[turn(0.0, 5.0, "A")], &[seg(4.0, 20.0, "long tail")]);
        assert_eq!(blocks, vec![AlignedBlock::new("A", "long tail")]);

        // Starts before, ends inside
        let blocks = align(&[turn(5.0, 10.0, "B")], &[seg(4.0, 9.0, "early")]);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let turns = vec![turn(1.0, 3.0, "A")];
        let blocks = align(&turns, &[seg(1.0, 1.5, "at start"), seg(3.0, 4.0, "at end")]);
        assert_eq!(blocks, vec![AlignedBlock::new("A", "at start at end")]);
    }

    #[test]
    fn test_shared_boundary_attributes_to_both_turns() {
        let turns = vec![turn(0.0, 5.0, "A"), turn(5.0, 10.0, "B")];
        let (blocks, stats) = align_with_stats(&turns, &[seg(5.0, 6.0, "edge")]);
        assert_eq!(
            blocks,
            vec![AlignedBlock::new("A", "edge"), AlignedBlock::new("B", "edge")]
        );
        assert_eq!(stats.multiply_attributed_segments, 1);
    }

    #[test]
    fn test_texts_are_trimmed_and_space_joined_in_order() {
        let segments = vec![
            seg(0.0, 1.0, "  Hello,"),
            seg(1.0, 2.0, " how are\tyou? "),
            seg(2.0, 3.0, "\nfine\n"),
        ];
        let blocks = align(&[turn(0.0, 10.0, "A")], &segments);
        assert_eq!(blocks[0].text, "Hello, how are\tyou? fine");
    }

    #[test]
    fn test_blank_segments_are_skipped() {
        let segments = vec![seg(0.0, 1.0, "one"), seg(1.0, 2.0, "   "), seg(2.0, 3.0, "two")];
        let blocks = align(&[turn(0.0, 10.0, "A")], &segments);
        assert_eq!(blocks[0].text, "one two");
    }

    #[test]
    fn test_turn_with_only_blank_text_is_dropped() {
        let turns = vec![turn(0.0, 5.0, "A"), turn(5.0, 10.0, "B")];
        let segments = vec![seg(1.0, 2.0, " "), seg(2.0, 3.0, ""), seg(6.0, 7.0, "ok")];
        let (blocks, stats) = align_with_stats(&turns, &segments);
        assert_eq!(blocks, vec![AlignedBlock::new("B", "ok")]);
        assert_eq!(stats.dropped_turns, 1);
        assert_eq!(stats.unattributed_segments, 0);
    }

    #[test]
    fn test_output_follows_turn_order() {
        // Turns deliberately out of chronological order
        let turns = vec![turn(5.0, 10.0, "B"), turn(0.0, 5.0, "A")];
        let segments = vec![seg(1.0, 2.0, "first"), seg(6.0, 7.0, "second")];
        let blocks = align(&turns, &segments);
        assert_eq!(blocks[0], AlignedBlock::new("B", "second"));
        assert_eq!(blocks[1], AlignedBlock::new("A", "first"));
    }

    #[test]
    fn test_same_speaker_turns_are_not_merged() {
        let turns = vec![turn(0.0, 2.0, "A"), turn(2.5, 4.0, "A")];
        let segments = vec![seg(0.5, 1.0, "one"), seg(3.0, 3.5, "two")];
        let blocks = align(&turns, &segments);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_empty_inputs_yield_empty_output() {
        assert!(align(&[], &[seg(0.0, 1.0, "x")]).is_empty());
        assert!(align(&[turn(0.0, 1.0, "A")], &[]).is_empty());
        assert!(align(&[], &[]).is_empty());
    }

    #[test]
    fn test_malformed_turn_never_matches() {
        let blocks = align(&[turn(5.0, 1.0, "A")], &[seg(3.0, 4.0, "inside?")]);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_alignment_is_deterministic() {
        let turns = vec![turn(0.0, 3.0, "A"), turn(2.0, 6.0, "B"), turn(6.0, 9.0, "A")];
        let segments = vec![
            seg(0.0, 1.0, "a"),
            seg(2.5, 3.0, "b"),
            seg(4.0, 5.0, "c"),
            seg(7.0, 8.0, "d"),
        ];
        assert_eq!(align(&turns, &segments), align(&turns, &segments));
    }

    #[test]
    fn test_every_segment_starting_in_turn_is_included() {
        let turns = vec![turn(0.0, 4.0, "A"), turn(4.5, 9.0, "B")];
        let segments: Vec<_> = (0..18)
            .map(|i| {
                let start = i as f64 * 0.5;
                seg(start, start + 0.4, &format!("w{i}"))
            })
            .collect();

        let (blocks, stats) = align_with_stats(&turns, &segments);

        for (turn, block) in turns.iter().zip(&blocks) {
            let expected: Vec<&str> = segments
                .iter()
                .filter(|s| turn.interval.contains(s.interval.start))
                .map(|s| s.text.as_str())
                .collect();
            assert_eq!(block.text, expected.join(" "));
        }
        // Nothing starts in (4.0, 4.5); every start is covered
        assert_eq!(stats.unattributed_segments, 0);
        assert_eq!(stats.blocks, 2);
    }

    #[test]
    fn test_stats_count_unattributed_segments() {
        let (_, stats) = align_with_stats(
            &[turn(0.0, 1.0, "A")],
            &[seg(0.5, 0.9, "in"), seg(2.0, 3.0, "out"), seg(4.0, 5.0, "out")],
        );
        assert_eq!(
            stats,
            AlignmentStats {
                turns: 1,
                segments: 3,
                blocks: 1,
                dropped_turns: 0,
                unattributed_segments: 2,
                multiply_attributed_segments: 0,
            }
        );
    }
}
