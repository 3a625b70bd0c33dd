// Trait definitions for dependency injection
//
// These are the collaborators the exchange domain talks to. Business rules
// (eligibility, derangement, membership) live in domain functions that use
// these traits, never in the implementations.
//
// Naming convention: Base* for trait names (e.g., BaseExchangeStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{ExchangeId, UserId};
use crate::domains::exchanges::models::{Assignment, Exchange, Participant, UserProfile};
use crate::domains::notifications::models::{DeliveryReport, MembershipChange};

// =============================================================================
// Exchange Store Trait (Persistence collaborator)
// =============================================================================

#[async_trait]
pub trait BaseExchangeStore: Send + Sync {
    async fn insert_exchange(&self, exchange: &Exchange) -> Result<()>;

    async fn find_exchange(&self, id: ExchangeId) -> Result<Option<Exchange>>;

    /// Look up by normalized (upper case) invite code
    async fn find_exchange_by_code(&self, code: &str) -> Result<Option<Exchange>>;

    async fn code_exists(&self, code: &str) -> Result<bool> {
        Ok(self.find_exchange_by_code(code).await?.is_some())
    }

    /// Remove the exchange and all its participants. Returns false if absent.
    async fn delete_exchange(&self, id: ExchangeId) -> Result<bool>;

    /// Participants in join order
    async fn list_participants(&self, exchange_id: ExchangeId) -> Result<Vec<Participant>>;

    async fn find_participant(
        &self,
        exchange_id: ExchangeId,
        user_id: UserId,
    ) -> Result<Option<Participant>>;

    /// Insert, or replace the participant with the same (exchange, user).
    /// Replacing keeps the original join position.
    async fn upsert_participant(&self, participant: &Participant) -> Result<()>;

    async fn remove_participant(&self, exchange_id: ExchangeId, user_id: UserId) -> Result<bool>;

    /// Atomically write every participant's recipient and flip the exchange
    /// to MATCHED.
    ///
    /// Compare-and-swap on status: returns `Ok(false)` without writing if the
    /// exchange is no longer OPEN. Errors (also without writing) if the
    /// assignment does not cover exactly the current participants or is not
    /// a derangement.
    async fn commit_match(&self, exchange_id: ExchangeId, assignment: &Assignment) -> Result<bool>;

    async fn insert_user(&self, user: &UserProfile) -> Result<()>;

    async fn find_user(&self, id: UserId) -> Result<Option<UserProfile>>;
}

// =============================================================================
// Messenger Trait (Infrastructure - chat delivery)
// =============================================================================

#[async_trait]
pub trait BaseMessenger: Send + Sync {
    /// Called once at startup
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// Called once at shutdown
    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}

// =============================================================================
// Match Notifier Trait (Notification collaborator)
// =============================================================================

#[async_trait]
pub trait BaseMatchNotifier: Send + Sync {
    /// Tell every giver who they drew. Called once per successful match,
    /// after the match is committed.
    async fn notify_matches(
        &self,
        exchange: &Exchange,
        assignment: &Assignment,
    ) -> Result<DeliveryReport>;

    /// Tell the exchange creator someone joined or left.
    async fn notify_membership(
        &self,
        exchange: &Exchange,
        change: MembershipChange,
        participant_name: &str,
        participant_count: usize,
    ) -> Result<DeliveryReport>;
}
