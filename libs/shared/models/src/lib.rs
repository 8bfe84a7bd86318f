pub mod error;
pub mod notice;
pub mod scheduling;

pub use error::SchedulingError;
pub use notice::{Notice, NoticeSeverity};
pub use scheduling::*;
