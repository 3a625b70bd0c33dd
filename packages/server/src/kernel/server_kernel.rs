// ServerKernel - owns the collaborators and their lifecycle
//
// Built once at startup. `start()` connects the messenger, `shutdown()`
// disconnects it; in between, `deps()` hands the action container out.

use anyhow::{Context, Result};
use std::sync::Arc;
use telegram::{TelegramOptions, TelegramService};
use tracing::info;

use super::{
    BaseExchangeStore, BaseMessenger, InMemoryExchangeStore, NoopMessenger, ServerDeps,
    TelegramMessenger,
};
use crate::config::Config;
use crate::domains::notifications::MessengerNotifier;

pub struct ServerKernel {
    pub messenger: Arc<dyn BaseMessenger>,
    pub deps: ServerDeps,
}

impl ServerKernel {
    pub fn new(
        store: Arc<dyn BaseExchangeStore>,
        messenger: Arc<dyn BaseMessenger>,
        config: &Config,
    ) -> Self {
        let notifier = Arc::new(MessengerNotifier::new(messenger.clone(), store.clone()));
        Self {
            messenger,
            deps: ServerDeps::new(store, notifier, config.matching),
        }
    }

    /// In-memory store, Telegram when a token is configured, otherwise no bot.
    pub fn from_config(config: &Config) -> Self {
        info!(bot_enabled = config.bot_enabled(), "Building server kernel");
        let messenger: Arc<dyn BaseMessenger> = match &config.telegram_bot_token {
            Some(token) => Arc::new(TelegramMessenger::new(
                Arc::new(TelegramService::new(TelegramOptions::new(token.clone()))),
                config.telegram_bot_username.clone(),
            )),
            None => Arc::new(NoopMessenger),
        };
        Self::new(Arc::new(InMemoryExchangeStore::new()), messenger, config)
    }

    pub async fn start(&self) -> Result<()> {
        self.messenger
            .connect()
            .await
            .context("Failed to connect messenger")?;
        info!("Server kernel started");
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.messenger
            .disconnect()
            .await
            .context("Failed to disconnect messenger")?;
        info!("Server kernel stopped");
        Ok(())
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }
}
