pub mod block;
pub mod interval;
pub mod speaker;
pub mod waveform;

pub use block::*;
pub use interval::*;
pub use speaker::*;
pub use waveform::*;
