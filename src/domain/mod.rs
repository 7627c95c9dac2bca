//! Form-state domain: schemas, values, steps, progress and messages.

pub mod errors;
pub mod messages;
pub mod models;
pub mod progress;
pub mod records;
pub mod schema;
pub mod steps;
pub mod store;

pub use errors::*;
pub use messages::*;
pub use models::*;
pub use progress::*;
pub use records::*;
pub use schema::*;
pub use steps::*;
pub use store::*;
