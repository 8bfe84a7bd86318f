pub mod aggregator;
pub mod surface;

pub use aggregator::*;
pub use surface::*;
