//! Client record storage backed by SQLite.
//!
//! [`RecordStore`] owns the connection; every operation goes through it.

mod store;
pub mod uploads;

pub use store::RecordStore;
pub use uploads::secure_filename;

use crate::error::RecordError;

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;
