pub mod transport;
pub mod scheduling;

pub use transport::*;
pub use scheduling::*;
