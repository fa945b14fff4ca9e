use std::path::PathBuf;

/// A decodable WAV file handed to the diarization stage
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// WAV file on disk
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    /// Number of frames (samples per channel)
    pub frames: u32,
}

impl Waveform {
    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        f64::from(self.frames) / f64::from(self.sample_rate)
    }
}
