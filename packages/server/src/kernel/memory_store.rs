//! In-process exchange store.
//!
//! Backs the CLI and the test suite. All state sits behind one `RwLock`, so
//! `commit_match` validates and writes under a single write guard and is
//! all-or-nothing.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::BaseExchangeStore;
use crate::common::{ExchangeId, UserId};
use crate::domains::exchanges::models::{
    Assignment, Exchange, ExchangeStatus, Participant, UserProfile,
};

#[derive(Default)]
struct StoreState {
    exchanges: HashMap<ExchangeId, Exchange>,
    /// Join order is the Vec order
    participants: HashMap<ExchangeId, Vec<Participant>>,
    users: HashMap<UserId, UserProfile>,
}

#[derive(Clone, Default)]
pub struct InMemoryExchangeStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryExchangeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseExchangeStore for InMemoryExchangeStore {
    async fn insert_exchange(&self, exchange: &Exchange) -> Result<()> {
        let mut state = self.state.write().await;
        if state.exchanges.contains_key(&exchange.id) {
            bail!("Exchange {} already exists", exchange.id);
        }
        if state.exchanges.values().any(|e| e.code == exchange.code) {
            bail!("Invite code {} already in use", exchange.code);
        }
        state.exchanges.insert(exchange.id, exchange.clone());
        state.participants.insert(exchange.id, Vec::new());
        Ok(())
    }

    async fn find_exchange(&self, id: ExchangeId) -> Result<Option<Exchange>> {
        Ok(self.state.read().await.exchanges.get(&id).cloned())
    }

    async fn find_exchange_by_code(&self, code: &str) -> Result<Option<Exchange>> {
        Ok(self
            .state
            .read()
            .await
            .exchanges
            .values()
            .find(|e| e.code == code)
            .cloned())
    }

    async fn delete_exchange(&self, id: ExchangeId) -> Result<bool> {
        let mut state = self.state.write().await;
        state.participants.remove(&id);
        Ok(state.exchanges.remove(&id).is_some())
    }

    async fn list_participants(&self, exchange_id: ExchangeId) -> Result<Vec<Participant>> {
        Ok(self
            .state
            .read()
            .await
            .participants
            .get(&exchange_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_participant(
        &self,
        exchange_id: ExchangeId,
        user_id: UserId,
    ) -> Result<Option<Participant>> {
        Ok(self
            .state
            .read()
            .await
            .participants
            .get(&exchange_id)
            .and_then(|ps| ps.iter().find(|p| p.user_id == user_id))
            .cloned())
    }

    async fn upsert_participant(&self, participant: &Participant) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(participants) = state.participants.get_mut(&participant.exchange_id) else {
            bail!("Exchange {} not found", participant.exchange_id);
        };

        match participants
            .iter_mut()
            .find(|p| p.user_id == participant.user_id)
        {
            Some(existing) => {
                *existing = Participant {
                    joined_at: existing.joined_at,
                    ..participant.clone()
                }
            }
            None => participants.push(participant.clone()),
        }
        Ok(())
    }

    async fn remove_participant(&self, exchange_id: ExchangeId, user_id: UserId) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(participants) = state.participants.get_mut(&exchange_id) else {
            return Ok(false);
        };
        let before = participants.len();
        participants.retain(|p| p.user_id != user_id);
        Ok(participants.len() != before)
    }

    async fn commit_match(&self, exchange_id: ExchangeId, assignment: &Assignment) -> Result<bool> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(exchange) = state.exchanges.get_mut(&exchange_id) else {
            bail!("Exchange {} not found", exchange_id);
        };
        if exchange.status != ExchangeStatus::Open {
            return Ok(false);
        }

        if !assignment.is_valid_derangement() {
            bail!("Refusing to commit an assignment that is not a derangement");
        }

        let participants = state.participants.entry(exchange_id).or_default();
        let members: HashSet<UserId> = participants.iter().map(|p| p.user_id).collect();
        let givers: HashSet<UserId> = assignment.givers().collect();
        if members.len() != participants.len() || members != givers {
            bail!("Assignment does not cover the current participants");
        }

        // Validated above, so every lookup below succeeds
        for participant in participants.iter_mut() {
            participant.santa_for = assignment.recipient_for(participant.user_id);
        }
        exchange.status = ExchangeStatus::Matched;

        Ok(true)
    }

    async fn insert_user(&self, user: &UserProfile) -> Result<()> {
        self.state
            .write()
            .await
            .users
            .insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserProfile>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}
