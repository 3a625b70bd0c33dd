//! Exchange domain - Secret Santa groups, membership and the draw
//!
//! Architecture:
//!   actions (async, take ServerDeps) → utils (pure rules) → models

pub mod actions;
pub mod errors;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use actions::*;
pub use errors::ExchangeError;
pub use models::{Assignment, Exchange, ExchangeStatus, NewExchange, Participant};
