//! Minimal Telegram Bot API client.
//!
//! Covers the four methods a webhook-driven bot needs: sending and editing
//! messages, acknowledging inline-button presses, and registering the webhook.
//!
//! ```rust,ignore
//! use telegram::{TelegramOptions, TelegramService};
//!
//! let bot = TelegramService::new(TelegramOptions::new(token))?;
//! let sent = bot.send_message(chat_id, "Hello", None).await?;
//! bot.edit_message_text(chat_id, sent.message_id, "Hello again", None).await?;
//! ```

pub mod error;
pub mod models;

pub use error::{Result, TelegramError};
pub use models::*;

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Upper bound on one Bot API call, connect to last body byte
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PARSE_MODE_HTML: &str = "HTML";

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl TelegramOptions {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Result<Self> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self { options, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.options.api_url.trim_end_matches('/'),
            self.options.bot_token,
            method
        )
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T>
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

        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await?;

        if !envelope.ok {
            let description = envelope.description.unwrap_or_default();
            tracing::warn!(method, %status, %description, "Bot API call rejected");
            return Err(TelegramError::Api {
                status: envelope.error_code.unwrap_or(status.as_u16()),
                description,
            });
        }

        envelope.result.ok_or(TelegramError::MissingResult(method))
    }

    /// Send an HTML-formatted message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: Some(PARSE_MODE_HTML),
            reply_markup: keyboard,
            disable_web_page_preview: true,
        };
        self.call("sendMessage", &request).await
    }

    /// Replace the text (and keyboard) of a message the bot sent earlier.
    /// Passing `None` as keyboard removes the existing one.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        let request = EditMessageTextRequest {
            chat_id,
            message_id,
            text,
            parse_mode: Some(PARSE_MODE_HTML),
            reply_markup: keyboard,
        };
        // editMessageText answers with the edited Message (or `true` for inline messages)
        let _: serde_json::Value = self.call("editMessageText", &request).await?;
        Ok(())
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        let request = AnswerCallbackQueryRequest {
            callback_query_id,
            text,
            show_alert,
        };
        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }

    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<()> {
        let request = SetWebhookRequest {
            url,
            secret_token,
            allowed_updates: &["message", "callback_query"],
        };
        let _: bool = self.call("setWebhook", &request).await?;
        tracing::info!(url, "Webhook registered");
        Ok(())
    }
}
