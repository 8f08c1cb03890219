// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The form machine and submission dispatch are domain code that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMessenger, BaseSessionStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::Keyboard;
use crate::domains::intake::models::{ApplicantId, Session};

// =============================================================================
// Messaging Channel Trait (Infrastructure - chat transport)
// =============================================================================

/// A message the bot sent, addressable for later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    pub chat_id: i64,
    pub message_id: i64,
}

#[async_trait]
pub trait BaseMessenger: Send + Sync {
    /// Send an HTML message, optionally with an inline keyboard
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageHandle>;

    /// Replace a sent message's text; `None` removes its keyboard
    async fn edit_message(
        &self,
        handle: &MessageHandle,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()>;

    /// Acknowledge a button press, optionally with a toast or a blocking alert
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()>;
}

// =============================================================================
// Session Store Trait (Infrastructure - per-applicant form state)
// =============================================================================

/// One live session per applicant. In-memory today; a durable backend can be
/// swapped in without touching the form machine.
#[async_trait]
pub trait BaseSessionStore: Send + Sync {
    /// Existing session, or a fresh idle one. Never fails.
    async fn get(&self, applicant: ApplicantId) -> Session;

    /// Replace the stored session.
    async fn put(&self, applicant: ApplicantId, session: Session);

    /// Drop answers and go idle, keeping the language choice.
    async fn clear(&self, applicant: ApplicantId);
}

// =============================================================================
// Cooldown Tracker Trait (Infrastructure - resubmission window)
// =============================================================================

#[async_trait]
pub trait BaseCooldownTracker: Send + Sync {
    /// True when the applicant has never submitted, or the window has passed.
    async fn can_submit(&self, applicant: ApplicantId, now: DateTime<Utc>) -> bool;

    /// Remember a successful submission, overwriting any previous one.
    async fn record_submission(&self, applicant: ApplicantId, now: DateTime<Utc>);
}
