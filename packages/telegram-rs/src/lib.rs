// Minimal Telegram Bot API client: just enough to verify a token and push text messages.
// https://core.telegram.org/bots/api

pub mod models;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{ApiResponse, BotUser, ParseMode, SendMessageRequest, SentMessage};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Transport or decoding failure. The URL is stripped: it embeds the token.
    #[error("Request to Telegram failed: {0}")]
    Request(reqwest::Error),

    #[error("Telegram returned an error ({code}): {description}")]
    Api { code: i32, description: String },

    #[error("Telegram response for {0} had no result")]
    MissingResult(&'static str),
}

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
    pub api_base: String,
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.without_url())
    }
}

impl TelegramOptions {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{base}/bot{token}/{method}",
            base = self.options.api_base.trim_end_matches('/'),
            token = self.options.bot_token,
            method = method
        )
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        // Telegram reports failures inside the envelope, with a non-2xx status
        let envelope = response.json::<ApiResponse<T>>().await?;
        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or_default(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        envelope.result.ok_or(TelegramError::MissingResult(method))
    }

    /// Fetch the bot account. Used at startup to check the token is valid.
    pub async fn get_me(&self) -> Result<BotUser, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage, TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
        };
        self.call("sendMessage", &body).await
    }
}
