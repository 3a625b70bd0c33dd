use thiserror::Error;

use crate::common::ExchangeId;

/// Errors surfaced by exchange actions.
///
/// "Not ready to match yet" is never an error: matching reports it as
/// `Ok(false)`.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Invalid exchange code: {0}")]
    InvalidCode(String),

    #[error("Exchange not found: {0}")]
    NotFound(ExchangeId),

    #[error("Exchange has already been matched")]
    AlreadyMatched,

    #[error("Exchange is full ({0} participants)")]
    ExchangeFull(u32),

    #[error("A wishlist is required to join")]
    EmptyWishlist,

    #[error("An exchange needs at least 2 participants, got {0}")]
    TargetTooSmall(u32),

    #[error("Budget cannot be negative")]
    InvalidBudget,

    #[error("Exchange title cannot be empty")]
    EmptyTitle,

    #[error("Only the exchange creator can do that")]
    NotCreator,

    #[error("Could not find an unused invite code after {0} attempts")]
    CodeSpaceExhausted(usize),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
