//! Session persistence client for respite
//!
//! Provides:
//! - The `SessionStore` interface used by the break controller
//! - An HTTP implementation talking to the backend
//! - An in-memory implementation for tests and offline runs
//!
//! Every operation here is best-effort from the caller's point of view:
//! the controller never waits on these results before changing local state.

mod http;
mod memory;
mod traits;

pub use http::*;
pub use memory::*;
pub use traits::*;

use std::time::Duration;
use thiserror::Error;

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

pub type StoreResult<T> = Result<T, PersistenceError>;
