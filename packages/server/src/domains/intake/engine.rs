//! Intake engine - runs one inbound update through the form.
//!
//! Flow per update: private-chat gate (group chatter is ignored, commands get
//! a notice) → per-applicant lock → load session →
//! machine decides → save session → effects execute → button acknowledged.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domains::intake::edges::{Inbound, Origin};
use crate::domains::intake::effects::{execute, EffectContext};
use crate::domains::intake::events::FormEvent;
use crate::domains::intake::machines::FormMachine;
use crate::domains::intake::models::{Applicant, ApplicantId, FieldDef};
use crate::kernel::{KeyedLocks, MessageHandle, ServerDeps};

pub struct IntakeEngine {
    deps: ServerDeps,
    machine: FormMachine,
    locks: KeyedLocks<ApplicantId>,
}

impl IntakeEngine {
    pub fn new(deps: ServerDeps, fields: &'static [FieldDef]) -> Self {
        let machine = FormMachine::new(fields, deps.texts.clone());
        Self {
            deps,
            machine,
            locks: KeyedLocks::new(),
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }

    pub async fn handle(&self, inbound: Inbound) -> Result<()> {
        self.handle_at(inbound, Utc::now()).await
    }

    /// Handle an update as if it arrived at `now`.
    pub async fn handle_at(&self, inbound: Inbound, now: DateTime<Utc>) -> Result<()> {
        let Inbound {
            applicant,
            chat,
            origin,
            event,
        } = inbound;

        let (callback_id, button_message) = match origin {
            Origin::Button {
                callback_id,
                message,
            } => (Some(callback_id), message),
            Origin::Message => (None, None),
        };

        if !chat.is_private {
            let addressed = callback_id.is_some()
                || event.as_ref().is_some_and(FormEvent::is_addressed_to_bot);
            if !addressed {
                debug!(chat_id = chat.id, "Ignoring group chatter");
                return Ok(());
            }
            debug!(chat_id = chat.id, "Refusing form outside a private chat");
            return self.private_only(&applicant, chat.id, callback_id.as_deref()).await;
        }

        let outcome = match &event {
            Some(event) => self.apply(&applicant, chat.id, button_message, event, now).await,
            None => Ok(None),
        };

        match callback_id {
            // Every button press is answered exactly once, even when handling failed
            Some(callback_id) => {
                let alert = outcome.as_ref().ok().and_then(|alert| alert.as_deref());
                if let Err(e) = self
                    .deps
                    .messenger
                    .answer_callback(&callback_id, alert, alert.is_some())
                    .await
                {
                    warn!(error = %e, "Failed to answer button press");
                }
            }
            None => {
                if let Ok(Some(alert)) = &outcome {
                    self.deps.messenger.send_message(chat.id, alert, None).await?;
                }
            }
        }

        outcome.map(|_| ())
    }

    async fn apply(
        &self,
        applicant: &Applicant,
        chat_id: i64,
        origin: Option<MessageHandle>,
        event: &FormEvent,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let _guard = self.locks.lock(&applicant.id).await;

        let mut session = self.deps.sessions.get(applicant.id).await;
        let step_before = session.step;
        let commands = self.machine.decide(&mut session, event);
        debug!(
            applicant_id = applicant.id,
            ?event,
            from = ?step_before,
            to = ?session.step,
            commands = commands.len(),
            "Form event decided"
        );
        if commands.is_empty() {
            return Ok(None);
        }

        self.deps.sessions.put(applicant.id, session.clone()).await;

        let language = self.deps.texts.resolve(session.language.as_deref());
        let ctx = EffectContext {
            applicant,
            chat_id,
            origin,
            language,
            fields: self.machine.fields(),
            now,
        };
        execute(&self.deps, &ctx, &session.answers, commands).await
    }

    async fn private_only(
        &self,
        applicant: &Applicant,
        chat_id: i64,
        callback_id: Option<&str>,
    ) -> Result<()> {
        let session = self.deps.sessions.get(applicant.id).await;
        let language = self.deps.texts.resolve(session.language.as_deref());
        let text = self.deps.texts.text(language, "private_only");

        match callback_id {
            Some(callback_id) => {
                self.deps
                    .messenger
                    .answer_callback(callback_id, Some(&text), true)
                    .await
            }
            None => self
                .deps
                .messenger
                .send_message(chat_id, &text, None)
                .await
                .map(|_| ()),
        }
    }
}
