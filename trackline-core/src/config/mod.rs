//! Configuration types
//!
//! Plain value structures handed to the followers at construction, plus
//! the postcard-encoded tuning record (with the `serde` feature).

#[cfg(feature = "serde")]
pub mod tuning;
pub mod types;

#[cfg(feature = "serde")]
pub use tuning::{TuningError, TuningRecord, TUNING_MAX_SIZE};
pub use types::*;
