pub mod sequence;
pub mod selection;

pub use sequence::*;
pub use selection::*;
