//! `BaseMatchNotifier` over a chat messenger.
//!
//! Every send is best-effort: a participant without a linked chat is skipped,
//! and a rejected send or a failed profile lookup is logged and counted while
//! the rest still go out.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domains::exchanges::models::{Assignment, Exchange};
use crate::domains::notifications::messages::{match_alert, membership_update};
use crate::domains::notifications::models::{DeliveryReport, MembershipChange};
use crate::kernel::{BaseExchangeStore, BaseMatchNotifier, BaseMessenger};

pub struct MessengerNotifier {
    messenger: Arc<dyn BaseMessenger>,
    store: Arc<dyn BaseExchangeStore>,
}

impl MessengerNotifier {
    pub fn new(messenger: Arc<dyn BaseMessenger>, store: Arc<dyn BaseExchangeStore>) -> Self {
        Self { messenger, store }
    }

    async fn deliver(&self, chat_id: i64, text: &str, report: &mut DeliveryReport) {
        match self.messenger.send_message(chat_id, text).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                warn!(chat_id, error = %e, "Failed to deliver notification");
                report.failed += 1;
            }
        }
    }
}

#[async_trait]
impl BaseMatchNotifier for MessengerNotifier {
    async fn notify_matches(
        &self,
        exchange: &Exchange,
        assignment: &Assignment,
    ) -> Result<DeliveryReport> {
        let mut report = DeliveryReport::default();

        for (giver_id, recipient_id) in assignment.pairs() {
            let chat_id = match self.store.find_user(*giver_id).await {
                Ok(user) => user.and_then(|u| u.telegram_chat_id),
                Err(e) => {
                    warn!(user_id = %giver_id, error = %e, "Failed to load giver profile");
                    report.failed += 1;
                    continue;
                }
            };
            let Some(chat_id) = chat_id else {
                debug!(user_id = %giver_id, "No linked chat, skipping match notification");
                report.skipped += 1;
                continue;
            };

            let recipient = match self.store.find_user(*recipient_id).await {
                Ok(Some(recipient)) => recipient,
                Ok(None) => {
                    warn!(user_id = %recipient_id, "Recipient profile missing, skipping");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(user_id = %recipient_id, error = %e, "Failed to load recipient profile");
                    report.failed += 1;
                    continue;
                }
            };

            let wishlist = match self.store.find_participant(exchange.id, *recipient_id).await {
                Ok(participant) => participant.map(|p| p.wishlist_text).unwrap_or_default(),
                Err(e) => {
                    warn!(user_id = %recipient_id, error = %e, "Failed to load wishlist");
                    report.failed += 1;
                    continue;
                }
            };

            let text = match_alert(&exchange.title, &recipient.name, &wishlist);
            self.deliver(chat_id, &text, &mut report).await;
        }

        info!(
            exchange_id = %exchange.id,
            attempted = report.attempted(),
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            "Match notifications dispatched"
        );
        Ok(report)
    }

    async fn notify_membership(
        &self,
        exchange: &Exchange,
        change: MembershipChange,
        participant_name: &str,
        participant_count: usize,
    ) -> Result<DeliveryReport> {
        let mut report = DeliveryReport::default();

        let chat_id = self
            .store
            .find_user(exchange.creator_id)
            .await?
            .and_then(|creator| creator.telegram_chat_id);

        match chat_id {
            Some(chat_id) => {
                let text = membership_update(
                    change,
                    participant_name,
                    &exchange.title,
                    participant_count,
                    exchange.target_count,
                );
                self.deliver(chat_id, &text, &mut report).await;
            }
            None => report.skipped += 1,
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ExchangeId, UserId};
    use crate::domains::exchanges::models::{ExchangeStatus, Participant, UserProfile};
    use crate::kernel::{InMemoryExchangeStore, SpyMessenger};
    use chrono::Utc;
    use rust_decimal::Decimal;

    /// Delegates to an in-memory store, but profile lookups for one user fail.
    struct BrokenProfileStore {
        inner: InMemoryExchangeStore,
        broken_user: UserId,
    }

    #[async_trait]
    impl BaseExchangeStore for BrokenProfileStore {
        async fn insert_exchange(&self, exchange: &Exchange) -> Result<()> {
            self.inner.insert_exchange(exchange).await
        }

        async fn find_exchange(&self, id: ExchangeId) -> Result<Option<Exchange>> {
            self.inner.find_exchange(id).await
        }

        async fn find_exchange_by_code(&self, code: &str) -> Result<Option<Exchange>> {
            self.inner.find_exchange_by_code(code).await
        }

        async fn delete_exchange(&self, id: ExchangeId) -> Result<bool> {
            self.inner.delete_exchange(id).await
        }

        async fn list_participants(&self, exchange_id: ExchangeId) -> Result<Vec<Participant>> {
            self.inner.list_participants(exchange_id).await
        }

        async fn find_participant(
            &self,
            exchange_id: ExchangeId,
            user_id: UserId,
        ) -> Result<Option<Participant>> {
            self.inner.find_participant(exchange_id, user_id).await
        }

        async fn upsert_participant(&self, participant: &Participant) -> Result<()> {
            self.inner.upsert_participant(participant).await
        }

        async fn remove_participant(
            &self,
            exchange_id: ExchangeId,
            user_id: UserId,
        ) -> Result<bool> {
            self.inner.remove_participant(exchange_id, user_id).await
        }

        async fn commit_match(
            &self,
            exchange_id: ExchangeId,
            assignment: &Assignment,
        ) -> Result<bool> {
            self.inner.commit_match(exchange_id, assignment).await
        }

        async fn insert_user(&self, user: &UserProfile) -> Result<()> {
            self.inner.insert_user(user).await
        }

        async fn find_user(&self, id: UserId) -> Result<Option<UserProfile>> {
            if id == self.broken_user {
                anyhow::bail!("profile storage unavailable");
            }
            self.inner.find_user(id).await
        }
    }

    #[tokio::test]
    async fn test_store_error_for_one_giver_does_not_stop_the_rest() {
        let inner = InMemoryExchangeStore::new();
        let users = [
            UserProfile::new("Ana").with_telegram_chat(1),
            UserProfile::new("Ben").with_telegram_chat(2),
            UserProfile::new("Cleo").with_telegram_chat(3),
        ];
        for user in &users {
            inner.insert_user(user).await.unwrap();
        }
        let exchange = Exchange {
            id: ExchangeId::new(),
            code: "ABC-123".to_string(),
            title: "Neighbours".to_string(),
            description: String::new(),
            budget: Decimal::new(15, 0),
            target_count: 3,
            status: ExchangeStatus::Matched,
            creator_id: users[0].id,
            created_at: Utc::now(),
        };

        // Ana -> Ben -> Cleo -> Ana; Ana's own profile cannot be read
        let givers: Vec<UserId> = users.iter().map(|u| u.id).collect();
        let assignment =
            Assignment::from_positions(&givers, &[givers[1], givers[2], givers[0]]);
        let store = Arc::new(BrokenProfileStore {
            inner,
            broken_user: users[0].id,
        });
        let messenger = Arc::new(SpyMessenger::new());
        let notifier = MessengerNotifier::new(messenger.clone(), store);

        let report = notifier.notify_matches(&exchange, &assignment).await.unwrap();

        // Ana's lookup fails as giver; Cleo's fails because Ana is her recipient
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(messenger.sent_to(2).len(), 1);
        assert!(messenger.sent_to(2)[0].contains("*Cleo*"));
    }
}
