//! Exchange domain actions - business logic functions
//!
//! Actions take the `ServerDeps` container and return `ExchangeError` for
//! anything a caller can act on.

mod matching;
mod membership;

pub use matching::{check_and_trigger_matching, perform_matching, CommittedMatch};
pub use membership::{
    create_exchange, delete_exchange, find_exchange_by_code, join_exchange, leave_exchange,
    santa_target, JoinOutcome,
};
