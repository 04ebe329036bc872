mod blend;
mod interpolator;

pub use blend::{catmull_rom, lerp};
pub use interpolator::Interpolator;
