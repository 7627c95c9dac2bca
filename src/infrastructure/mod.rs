//! Infrastructure layer: clock, settings and logging.

pub mod clock;
pub mod logging;
pub mod settings;

pub use clock::*;
pub use logging::*;
pub use settings::*;
