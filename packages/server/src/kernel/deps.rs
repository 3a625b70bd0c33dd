//! Server dependencies for domain actions (using traits for testability)
//!
//! `ServerDeps` is the container every exchange action receives. All external
//! collaborators are trait objects so tests can swap in spies.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use telegram::models::ParseMode;
use telegram::TelegramService;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::MatchingSettings;
use crate::kernel::{BaseExchangeStore, BaseMatchNotifier, BaseMessenger, ExchangeLocks};

// =============================================================================
// TelegramService Adapter (implements BaseMessenger trait)
// =============================================================================

/// Wrapper around TelegramService that implements BaseMessenger
pub struct TelegramMessenger {
    service: Arc<TelegramService>,
    /// Configured bot username, checked against `getMe` on connect
    expected_username: Option<String>,
}

impl TelegramMessenger {
    pub fn new(service: Arc<TelegramService>, expected_username: Option<String>) -> Self {
        Self {
            service,
            expected_username,
        }
    }
}

#[async_trait]
impl BaseMessenger for TelegramMessenger {
    async fn connect(&self) -> Result<()> {
        let me = self
            .service
            .get_me()
            .await
            .map_err(|e| anyhow::anyhow!("Telegram bot token rejected: {}", e))?;
        let username = me.username.as_deref().unwrap_or("<none>");
        info!(bot_id = me.id, username, "Telegram bot connected");

        if let Some(expected) = &self.expected_username {
            if !expected.trim_start_matches('@').eq_ignore_ascii_case(username) {
                warn!(
                    expected = %expected,
                    actual = username,
                    "TELEGRAM_BOT_USERNAME does not match the bot behind the token"
                );
            }
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        info!("Telegram bot disconnected");
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.service
            .send_message(chat_id, text, Some(ParseMode::Markdown))
            .await
            .map(|_| ())
            .map_err(anyhow::Error::from)
    }
}

// =============================================================================
// NoopMessenger (bot disabled)
// =============================================================================

/// Used when no bot token is configured. Drops every message.
pub struct NoopMessenger;

#[async_trait]
impl BaseMessenger for NoopMessenger {
    async fn connect(&self) -> Result<()> {
        info!("Telegram bot token not configured. Bot disabled.");
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, _text: &str) -> Result<()> {
        debug!(chat_id, "Bot disabled, dropping message");
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies accessible to exchange actions
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseExchangeStore>,
    pub notifier: Arc<dyn BaseMatchNotifier>,
    /// Serializes check-then-match per exchange
    pub locks: ExchangeLocks,
    pub settings: MatchingSettings,
    rng: Arc<Mutex<fastrand::Rng>>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseExchangeStore>,
        notifier: Arc<dyn BaseMatchNotifier>,
        settings: MatchingSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            locks: ExchangeLocks::new(),
            settings,
            rng: Arc::new(Mutex::new(fastrand::Rng::new())),
        }
    }

    /// Make every draw and invite code reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(fastrand::Rng::with_seed(seed))),
            ..self
        }
    }

    /// An independent generator for one operation, derived from the shared one.
    pub async fn fork_rng(&self) -> fastrand::Rng {
        self.rng.lock().await.fork()
    }
}
