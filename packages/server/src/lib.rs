// Secret Santa - Exchange Core
//
// Exchanges, membership and the gift draw, with chat notifications through
// an injected messenger. Actions live in domains/*/actions and receive their
// collaborators through kernel::ServerDeps.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
