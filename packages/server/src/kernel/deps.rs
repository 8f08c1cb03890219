//! Server dependencies for effects (using traits for testability)
//!
//! This module provides the central dependency container used by the intake
//! domain. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use chrono::FixedOffset;
use std::sync::Arc;
use telegram::{InlineKeyboardButton, InlineKeyboardMarkup, TelegramService};

use crate::common::{ButtonAction, Keyboard, Texts};
use crate::domains::intake::store::{MemoryCooldownTracker, MemorySessionStore};
use crate::kernel::{BaseCooldownTracker, BaseMessenger, BaseSessionStore, MessageHandle};

// =============================================================================
// TelegramService Adapter (implements BaseMessenger trait)
// =============================================================================

/// Wrapper around TelegramService that implements BaseMessenger trait
pub struct TelegramAdapter(pub Arc<TelegramService>);

impl TelegramAdapter {
    pub fn new(service: Arc<TelegramService>) -> Self {
        Self(service)
    }
}

fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: keyboard
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match &button.action {
                        ButtonAction::Callback(token) => {
                            InlineKeyboardButton::callback(&button.label, token)
                        }
                        ButtonAction::Url(url) => InlineKeyboardButton::url(&button.label, url),
                    })
                    .collect()
            })
            .collect(),
    }
}

#[async_trait]
impl BaseMessenger for TelegramAdapter {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageHandle> {
        let markup = keyboard.map(to_markup);
        let message = self
            .0
            .send_message(chat_id, text, markup.as_ref())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(MessageHandle {
            chat_id: message.chat.id,
            message_id: message.message_id,
        })
    }

    async fn edit_message(
        &self,
        handle: &MessageHandle,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let markup = keyboard.map(to_markup);
        self.0
            .edit_message_text(handle.chat_id, handle.message_id, text, markup.as_ref())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        self.0
            .answer_callback_query(callback_id, text, show_alert)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// IntakeSettings
// =============================================================================

/// Operator-facing knobs of the intake flow.
#[derive(Debug, Clone)]
pub struct IntakeSettings {
    /// Chat that receives finished applications
    pub admin_chat_id: i64,
    /// Shown to applicants in the cooldown notice
    pub cooldown_hours: u32,
    /// Zone the report timestamp is rendered in
    pub report_offset: FixedOffset,
    pub report_tz_label: String,
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to effects (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub messenger: Arc<dyn BaseMessenger>,
    pub sessions: Arc<dyn BaseSessionStore>,
    pub cooldown: Arc<dyn BaseCooldownTracker>,
    pub texts: Arc<Texts>,
    pub settings: IntakeSettings,
}

impl ServerDeps {
    pub fn new(
        messenger: Arc<dyn BaseMessenger>,
        sessions: Arc<dyn BaseSessionStore>,
        cooldown: Arc<dyn BaseCooldownTracker>,
        texts: Arc<Texts>,
        settings: IntakeSettings,
    ) -> Self {
        Self {
            messenger,
            sessions,
            cooldown,
            texts,
            settings,
        }
    }

    /// Process-local session and cooldown stores
    pub fn in_memory(
        messenger: Arc<dyn BaseMessenger>,
        texts: Arc<Texts>,
        settings: IntakeSettings,
    ) -> Self {
        let cooldown = Arc::new(MemoryCooldownTracker::with_hours(settings.cooldown_hours));
        Self::new(
            messenger,
            Arc::new(MemorySessionStore::new()),
            cooldown,
            texts,
            settings,
        )
    }
}
