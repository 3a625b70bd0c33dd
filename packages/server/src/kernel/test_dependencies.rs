// TestDependencies - spy and failing collaborators for tests
//
// Wired into ServerDeps the same way production collaborators are, so tests
// exercise the real actions against an in-memory store.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{BaseMatchNotifier, BaseMessenger, InMemoryExchangeStore, ServerDeps};
use crate::config::MatchingSettings;
use crate::domains::exchanges::models::{Assignment, Exchange};
use crate::domains::notifications::{DeliveryReport, MembershipChange, MessengerNotifier};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Spy Messenger
// =============================================================================

/// A message captured by SpyMessenger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentChatMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Records every message; sends to chats listed in `failing_chats` error out.
#[derive(Default)]
pub struct SpyMessenger {
    sent: Mutex<Vec<SentChatMessage>>,
    failing_chats: Mutex<HashSet<i64>>,
    fail_connect: bool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl SpyMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to `chat_id` fail
    pub fn failing_for(self, chat_id: i64) -> Self {
        locked(&self.failing_chats).insert(chat_id);
        self
    }

    /// Make `connect` fail (after counting the attempt)
    pub fn failing_connect(self) -> Self {
        Self {
            fail_connect: true,
            ..self
        }
    }

    pub fn sent(&self) -> Vec<SentChatMessage> {
        locked(&self.sent).clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        locked(&self.sent)
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseMessenger for SpyMessenger {
    async fn connect(&self) -> Result<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            bail!("bot token rejected");
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        if locked(&self.failing_chats).contains(&chat_id) {
            bail!("chat {} unreachable", chat_id);
        }
        locked(&self.sent).push(SentChatMessage {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Spy Notifier
// =============================================================================

/// A `notify_matches` call captured by SpyNotifier
#[derive(Debug, Clone)]
pub struct MatchNotification {
    pub exchange: Exchange,
    pub assignment: Assignment,
}

/// A `notify_membership` call captured by SpyNotifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipNotification {
    pub change: MembershipChange,
    pub participant_name: String,
    pub participant_count: usize,
}

/// Records notifier calls; optionally fails every one of them.
#[derive(Default)]
pub struct SpyNotifier {
    matches: Mutex<Vec<MatchNotification>>,
    memberships: Mutex<Vec<MembershipNotification>>,
    fail: bool,
}

impl SpyNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every call returns an error (after recording it)
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn match_calls(&self) -> Vec<MatchNotification> {
        locked(&self.matches).clone()
    }

    pub fn membership_calls(&self) -> Vec<MembershipNotification> {
        locked(&self.memberships).clone()
    }
}

#[async_trait]
impl BaseMatchNotifier for SpyNotifier {
    async fn notify_matches(
        &self,
        exchange: &Exchange,
        assignment: &Assignment,
    ) -> Result<DeliveryReport> {
        locked(&self.matches).push(MatchNotification {
            exchange: exchange.clone(),
            assignment: assignment.clone(),
        });
        if self.fail {
            bail!("notification channel down");
        }
        Ok(DeliveryReport {
            sent: assignment.len(),
            ..DeliveryReport::default()
        })
    }

    async fn notify_membership(
        &self,
        _exchange: &Exchange,
        change: MembershipChange,
        participant_name: &str,
        participant_count: usize,
    ) -> Result<DeliveryReport> {
        locked(&self.memberships).push(MembershipNotification {
            change,
            participant_name: participant_name.to_string(),
            participant_count,
        });
        if self.fail {
            bail!("notification channel down");
        }
        Ok(DeliveryReport {
            sent: 1,
            ..DeliveryReport::default()
        })
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// ServerDeps plus handles on the in-memory collaborators behind it.
pub struct TestDependencies {
    pub store: Arc<InMemoryExchangeStore>,
    pub notifier: Arc<SpyNotifier>,
    pub deps: ServerDeps,
}

impl TestDependencies {
    /// In-memory store, spy notifier, seeded RNG.
    pub fn new() -> Self {
        Self::with_notifier(SpyNotifier::new())
    }

    pub fn with_notifier(notifier: SpyNotifier) -> Self {
        Self::with_settings(notifier, MatchingSettings::default())
    }

    pub fn with_settings(notifier: SpyNotifier, settings: MatchingSettings) -> Self {
        let store = Arc::new(InMemoryExchangeStore::new());
        let notifier = Arc::new(notifier);
        let deps = ServerDeps::new(store.clone(), notifier.clone(), settings).with_seed(7);
        Self {
            store,
            notifier,
            deps,
        }
    }

    /// Real MessengerNotifier over a spy messenger, for message-level tests.
    pub fn messenger_backed(
        messenger: Arc<SpyMessenger>,
    ) -> (ServerDeps, Arc<InMemoryExchangeStore>) {
        let store = Arc::new(InMemoryExchangeStore::new());
        let notifier = Arc::new(MessengerNotifier::new(messenger, store.clone()));
        let deps =
            ServerDeps::new(store.clone(), notifier, MatchingSettings::default()).with_seed(7);
        (deps, store)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
