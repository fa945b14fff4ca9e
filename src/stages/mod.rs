pub mod stage0_normalize;
pub mod stage1_align;
pub mod stage2_identify;
pub mod stage3_render;

pub use stage0_normalize::*;
pub use stage1_align::*;
pub use stage2_identify::*;
pub use stage3_render::*;
