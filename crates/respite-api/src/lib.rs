//! Data model shared across respite crates
//!
//! - Emotion results as returned by the classifier
//! - Activities and their durations
//! - Snapshots pushed to the session store
//! - Status views for presentation

mod duration;
mod status;
mod types;

pub use duration::*;
pub use status::*;
pub use types::*;
