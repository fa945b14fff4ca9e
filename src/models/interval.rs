use serde::{Deserialize, Serialize};

/// A span of audio time in seconds
///
/// Adapters only ever produce intervals with `start <= end`. Malformed
/// intervals are still representable; they simply never contain any instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
}

impl TimeInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether `instant` lies within `[start, end]`, inclusive on both ends
    pub fn contains(&self, instant: f64) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Duration in seconds, zero for malformed intervals
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }
}

/// A diarization turn: one speaker holding the floor for an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    pub interval: TimeInterval,
    /// Opaque label from the diarization model, stable within one run
    pub speaker_id: String,
}

impl SpeakerTurn {
    pub fn new(start: f64, end: f64, speaker_id: impl Into<String>) -> Self {
        Self {
            interval: TimeInterval::new(start, end),
            speaker_id: speaker_id.into(),
        }
    }
}

/// A unit of recognized speech from the transcription model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub interval: TimeInterval,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            interval: TimeInterval::new(start, end),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let interval = TimeInterval::new(1.0, 2.0);
        assert!(interval.contains(1.0));
        assert!(interval.contains(1.5));
        assert!(interval.contains(2.0));
        assert!(!interval.contains(0.999));
        assert!(!interval.contains(2.001));
    }

    #[test]
    fn test_malformed_interval_contains_nothing() {
        let interval = TimeInterval::new(5.0, 3.0);
        assert!(!interval.is_well_formed());
        assert!(!interval.contains(4.0));
        assert!(!interval.contains(5.0));
        assert!(!interval.contains(3.0));
        assert_eq!(interval.duration(), 0.0);
    }

    #[test]
    fn test_nan_is_never_contained() {
        let interval = TimeInterval::new(0.0, 10.0);
        assert!(!interval.contains(f64::NAN));
    }
}
