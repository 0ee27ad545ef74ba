//! Break session engine for respite
//!
//! This crate is the heart of respite, containing:
//! - The break session state machine (Idle -> Suggesting -> ActivityRunning -> Ending)
//! - Activity countdowns and completion tracking
//! - The async controller that schedules countdowns and mirrors progress
//!   to the session store without ever waiting on it

mod controller;
mod engine;
mod events;
mod session;

pub use controller::*;
pub use engine::*;
pub use events::*;
pub use session::*;
