//! Application layer managing the form session and terminal-side state.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the engine runs the form workflow, the app state tracks focus and input.

pub mod engine;
pub mod state;

pub use engine::*;
pub use state::*;
