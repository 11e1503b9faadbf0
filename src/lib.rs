// Hub client core - log lifecycle, classification views, aggregation trigger
// and the REST boundary to the hub backend.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod local_state;
pub mod models;
pub mod session;
pub mod views;

pub use error::HubError;
pub use session::{AggregateOutcome, Session};
