//! Speech capture capability for respite
//!
//! This crate defines the interface between the break flow and whatever
//! speech-to-text facility the platform offers. It contains no platform
//! code itself: engines are injected, and `SpeechCapture` wraps one to
//! guarantee at most one capture in flight.

mod capabilities;
mod capture;
mod mock;
mod traits;

pub use capabilities::*;
pub use capture::*;
pub use mock::*;
pub use traits::*;
