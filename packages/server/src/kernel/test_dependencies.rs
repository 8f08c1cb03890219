// TestDependencies - mock implementations for testing
//
// Provides a recording messenger plus in-memory stores that can be injected
// into the intake engine for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::FixedOffset;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseMessenger, IntakeSettings, MessageHandle, ServerDeps};
use crate::common::{Keyboard, Texts};
use crate::domains::intake::models::APPLICATION_FORM;
use crate::domains::intake::store::{MemoryCooldownTracker, MemorySessionStore};
use crate::domains::intake::IntakeEngine;

/// Operator chat used by test settings
pub const TEST_ADMIN_CHAT_ID: i64 = -100_500;

// =============================================================================
// Mock Messenger
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub handle: MessageHandle,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedMessage {
    pub handle: MessageHandle,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAnswer {
    pub callback_id: String,
    pub text: Option<String>,
    pub show_alert: bool,
}

pub struct MockMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    edits: Arc<Mutex<Vec<EditedMessage>>>,
    callback_answers: Arc<Mutex<Vec<CallbackAnswer>>>,
    failing_chats: Arc<Mutex<HashSet<i64>>>,
    keyboard_rejecting_chats: Arc<Mutex<HashSet<i64>>>,
    slow_chats: Arc<Mutex<HashMap<i64, Duration>>>,
    next_message_id: AtomicI64,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            edits: Arc::new(Mutex::new(Vec::new())),
            callback_answers: Arc::new(Mutex::new(Vec::new())),
            failing_chats: Arc::new(Mutex::new(HashSet::new())),
            keyboard_rejecting_chats: Arc::new(Mutex::new(HashSet::new())),
            slow_chats: Arc::new(Mutex::new(HashMap::new())),
            next_message_id: AtomicI64::new(1),
        }
    }

    /// Make every send to `chat_id` fail
    pub fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().unwrap().insert(chat_id);
    }

    /// Let sends to `chat_id` succeed again
    pub fn heal_chat(&self, chat_id: i64) {
        self.failing_chats.lock().unwrap().remove(&chat_id);
    }

    /// Make sends to `chat_id` that carry a keyboard fail, the way the Bot API
    /// refuses a user link the target's privacy settings forbid
    pub fn reject_keyboards_to(&self, chat_id: i64) {
        self.keyboard_rejecting_chats.lock().unwrap().insert(chat_id);
    }

    /// Hold every send to `chat_id` for `delay` after it has been recorded
    pub fn delay_chat(&self, chat_id: i64, delay: Duration) {
        self.slow_chats.lock().unwrap().insert(chat_id, delay);
    }

    /// Get all messages that were sent, in order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Get the messages sent to one chat
    pub fn sent_to(&self, chat_id: i64) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.handle.chat_id == chat_id)
            .cloned()
            .collect()
    }

    /// Most recent message sent to one chat
    pub fn last_sent_to(&self, chat_id: i64) -> Option<SentMessage> {
        self.sent_to(chat_id).pop()
    }

    pub fn edits(&self) -> Vec<EditedMessage> {
        self.edits.lock().unwrap().clone()
    }

    pub fn callback_answers(&self) -> Vec<CallbackAnswer> {
        self.callback_answers.lock().unwrap().clone()
    }

    /// Forget everything recorded so far
    pub fn reset(&self) {
        self.sent.lock().unwrap().clear();
        self.edits.lock().unwrap().clear();
        self.callback_answers.lock().unwrap().clear();
    }

    fn check_chat(&self, chat_id: i64) -> Result<()> {
        if self.failing_chats.lock().unwrap().contains(&chat_id) {
            anyhow::bail!("mock delivery failure for chat {}", chat_id);
        }
        Ok(())
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMessenger for MockMessenger {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageHandle> {
        self.check_chat(chat_id)?;
        if keyboard.is_some() && self.keyboard_rejecting_chats.lock().unwrap().contains(&chat_id) {
            anyhow::bail!("mock: Bad Request: BUTTON_USER_PRIVACY_RESTRICTED");
        }

        let handle = MessageHandle {
            chat_id,
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
        };
        self.sent.lock().unwrap().push(SentMessage {
            handle,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });

        let delay = self.slow_chats.lock().unwrap().get(&chat_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(handle)
    }

    async fn edit_message(
        &self,
        handle: &MessageHandle,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        self.check_chat(handle.chat_id)?;

        self.edits.lock().unwrap().push(EditedMessage {
            handle: *handle,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        self.callback_answers.lock().unwrap().push(CallbackAnswer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
            show_alert,
        });
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub messenger: Arc<MockMessenger>,
    pub sessions: Arc<MemorySessionStore>,
    pub cooldown: Arc<MemoryCooldownTracker>,
    pub texts: Arc<Texts>,
    pub settings: IntakeSettings,
}

impl TestDependencies {
    /// English texts, 12h cooldown, reports in UTC+3 labelled MSK
    pub fn new() -> Self {
        Self {
            messenger: Arc::new(MockMessenger::new()),
            sessions: Arc::new(MemorySessionStore::new()),
            cooldown: Arc::new(MemoryCooldownTracker::default()),
            texts: Arc::new(Texts::bundled("en").unwrap()),
            settings: IntakeSettings {
                admin_chat_id: TEST_ADMIN_CHAT_ID,
                cooldown_hours: 12,
                report_offset: FixedOffset::east_opt(3 * 3600).unwrap(),
                report_tz_label: "MSK".to_string(),
            },
        }
    }

    /// Set the language the bot falls back to
    pub fn default_language(mut self, language: &str) -> Self {
        self.texts = Arc::new(Texts::bundled(language).unwrap());
        self
    }

    /// Set the resubmission window
    pub fn cooldown_hours(mut self, hours: u32) -> Self {
        self.cooldown = Arc::new(MemoryCooldownTracker::with_hours(hours));
        self.settings.cooldown_hours = hours;
        self
    }

    /// Convert into ServerDeps sharing these mocks
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.messenger,
            self.sessions,
            self.cooldown,
            self.texts,
            self.settings,
        )
    }

    /// Convert into an engine running the clan application form
    pub fn into_engine(self) -> Arc<IntakeEngine> {
        Arc::new(IntakeEngine::new(self.into_deps(), APPLICATION_FORM))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
