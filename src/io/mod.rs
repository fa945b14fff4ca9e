pub mod input;
pub mod output;
pub mod prompt;

pub use input::*;
pub use output::*;
pub use prompt::*;
