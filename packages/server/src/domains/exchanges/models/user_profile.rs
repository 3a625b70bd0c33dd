use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// The parts of a user account the exchange domain needs: who they are and
/// where to message them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    /// Set once the user links their account with the bot
    pub telegram_chat_id: Option<i64>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            telegram_chat_id: None,
        }
    }

    pub fn with_telegram_chat(mut self, chat_id: i64) -> Self {
        self.telegram_chat_id = Some(chat_id);
        self
    }
}

/// What a matched participant gets to see: who they are buying for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SantaTarget {
    pub recipient: UserProfile,
    pub wishlist_text: String,
}
