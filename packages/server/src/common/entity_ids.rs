//! Typed ID definitions for the exchange domain.
//!
//! ```rust
//! use santa_core::common::{ExchangeId, UserId};
//!
//! let user_id = UserId::new();
//! let exchange_id = ExchangeId::new();
//! assert_ne!(user_id.into_uuid(), exchange_id.into_uuid());
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities (people who give and receive gifts).
pub struct User;

/// Marker type for Exchange entities (one Secret Santa event).
pub struct Exchange;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;

pub type ExchangeId = Id<Exchange>;
