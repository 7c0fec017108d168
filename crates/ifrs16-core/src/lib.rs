pub mod error;
pub mod lease_accounting;
pub mod time_value;
pub mod types;

pub use error::Ifrs16Error;
pub use types::*;

/// Standard result type for all lease calculations
pub type Ifrs16Result<T> = Result<T, Ifrs16Error>;
