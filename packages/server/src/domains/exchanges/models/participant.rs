use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ExchangeId, UserId};

/// A user's membership in one exchange.
///
/// `wishlist_text` is a snapshot taken when the user joins (or re-joins to
/// update it). `santa_for` stays `None` until the exchange is matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub exchange_id: ExchangeId,
    pub wishlist_text: String,
    pub santa_for: Option<UserId>,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(exchange_id: ExchangeId, user_id: UserId, wishlist_text: &str) -> Self {
        Self {
            user_id,
            exchange_id,
            wishlist_text: wishlist_text.trim().to_string(),
            santa_for: None,
            joined_at: Utc::now(),
        }
    }

    /// Whitespace-only wishlists count as missing.
    pub fn has_wishlist(&self) -> bool {
        !self.wishlist_text.trim().is_empty()
    }
}
