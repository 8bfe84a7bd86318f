pub mod invoices;
pub mod lifecycle;
pub mod profile;

pub use invoices::*;
pub use lifecycle::*;
pub use profile::*;
