pub mod diarization;
pub mod transcription;

pub use diarization::*;
pub use transcription::*;
