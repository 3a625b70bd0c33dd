//! Test fixtures for creating exchanges and participants.
//!
//! Fixtures go through the real actions where they can, and straight to the
//! store when a test needs a state the actions refuse to produce (a blank
//! wishlist, for instance).

use rust_decimal::Decimal;
use santa_core::common::UserId;
use santa_core::domains::exchanges::actions::{create_exchange, join_exchange};
use santa_core::domains::exchanges::models::{Exchange, NewExchange, Participant, UserProfile};
use santa_core::kernel::BaseExchangeStore;

use super::TestHarness;

impl TestHarness {
    /// Register a user profile, optionally linked to a chat.
    pub async fn create_user(&self, name: &str, chat_id: Option<i64>) -> UserProfile {
        let mut user = UserProfile::new(name);
        user.telegram_chat_id = chat_id;
        self.store()
            .insert_user(&user)
            .await
            .expect("Failed to insert user");
        user
    }

    /// An OPEN exchange with a registered creator
    pub async fn open_exchange(&self, target_count: u32) -> Exchange {
        let creator = self.create_user("Organizer", Some(1)).await;
        create_exchange(
            NewExchange {
                title: "Team gift swap".to_string(),
                description: "Keep it fun".to_string(),
                budget: Decimal::new(30, 0),
                target_count,
                creator_id: creator.id,
            },
            self.deps(),
        )
        .await
        .expect("Failed to create exchange")
    }

    /// Join through the action with a non-blank wishlist
    pub async fn join(&self, exchange: &Exchange, name: &str) -> UserId {
        let user = self.create_user(name, None).await;
        join_exchange(
            &exchange.code,
            user.id,
            &format!("{}'s wishlist", name),
            self.deps(),
        )
        .await
        .expect("Failed to join exchange");
        user.id
    }

    /// Insert a participant directly, bypassing join validation
    pub async fn seat(&self, exchange: &Exchange, wishlist: &str) -> UserId {
        let user = self.create_user("Seated", None).await;
        self.store()
            .upsert_participant(&Participant::new(exchange.id, user.id, wishlist))
            .await
            .expect("Failed to seat participant");
        user.id
    }

    pub async fn participants(&self, exchange: &Exchange) -> Vec<Participant> {
        self.store()
            .list_participants(exchange.id)
            .await
            .expect("Failed to list participants")
    }

    pub async fn reload(&self, exchange: &Exchange) -> Exchange {
        self.store()
            .find_exchange(exchange.id)
            .await
            .expect("Failed to load exchange")
            .expect("Exchange missing")
    }
}
