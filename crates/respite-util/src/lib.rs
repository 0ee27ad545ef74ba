//! Shared utilities for respite
//!
//! This crate provides:
//! - ID types (BreakSessionId, UserId, SessionToken)
//! - Time utilities (mockable wall clock, countdown formatting)
//! - Default paths for config and data directories
//! - Redacting wrapper for API keys

mod ids;
mod paths;
mod secret;
mod time;

pub use ids::*;
pub use paths::*;
pub use secret::*;
pub use time::*;
