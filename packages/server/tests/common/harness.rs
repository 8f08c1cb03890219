//! Test harness driving the intake engine with mock dependencies.
//!
//! Each test gets a fresh engine with its own recording messenger and
//! in-memory stores; nothing is shared between tests.

use anyhow::{Context, Result};
use axum::Router;
use chrono::{DateTime, Utc};
use intake_core::domains::intake::{inbound_from_update, IntakeEngine, Session};
use intake_core::kernel::{
    BaseSessionStore, MockMessenger, TestDependencies, TEST_ADMIN_CHAT_ID,
};
use intake_core::server::build_router;
use std::sync::Arc;
use telegram::Update;
use test_context::AsyncTestContext;

use super::{button_press, group_text, private_text, Answer, VALID_ANSWERS};

pub const WEBHOOK_PATH: &str = "/tg/webhook";

/// Test harness that owns one engine and its mocks.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     ctx.send_text(APPLICANT_ID, "/start").await.unwrap();
/// }
/// ```
pub struct TestHarness {
    pub deps: TestDependencies,
    pub engine: Arc<IntakeEngine>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self::new()
    }

    async fn teardown(self) {
        // Mocks are dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_deps(TestDependencies::new())
    }

    pub fn with_deps(deps: TestDependencies) -> Self {
        let engine = deps.clone().into_engine();
        Self { deps, engine }
    }

    pub fn messenger(&self) -> &MockMessenger {
        &self.deps.messenger
    }

    /// Router over this harness's engine
    pub fn router(&self, secret: Option<&str>) -> Router {
        build_router(
            self.engine.clone(),
            WEBHOOK_PATH,
            secret.map(str::to_string),
        )
    }

    pub async fn session(&self, applicant: i64) -> Session {
        self.deps.sessions.get(applicant).await
    }

    /// Messages the operator chat received
    pub fn reports(&self) -> Vec<String> {
        self.messenger()
            .sent_to(TEST_ADMIN_CHAT_ID)
            .into_iter()
            .map(|m| m.text)
            .collect()
    }

    /// Texts of messages sent to a chat, in order
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.messenger()
            .sent_to(chat_id)
            .into_iter()
            .map(|m| m.text)
            .collect()
    }

    // =========================================================================
    // Drivers
    // =========================================================================

    pub async fn deliver(&self, update: Update, now: DateTime<Utc>) -> Result<()> {
        let inbound = inbound_from_update(update).context("update was dropped at the edge")?;
        self.engine.handle_at(inbound, now).await
    }

    pub async fn send_text(&self, applicant: i64, text: &str) -> Result<()> {
        self.send_text_at(applicant, text, Utc::now()).await
    }

    pub async fn send_text_at(&self, applicant: i64, text: &str, now: DateTime<Utc>) -> Result<()> {
        self.deliver(private_text(applicant, text), now).await
    }

    pub async fn send_group_text(&self, applicant: i64, chat_id: i64, text: &str) -> Result<()> {
        self.deliver(group_text(applicant, chat_id, text), Utc::now()).await
    }

    /// Press a button on the latest message the applicant received
    pub async fn press(&self, applicant: i64, data: &str) -> Result<()> {
        self.press_at(applicant, data, Utc::now()).await
    }

    pub async fn press_at(&self, applicant: i64, data: &str, now: DateTime<Utc>) -> Result<()> {
        let message_id = self
            .messenger()
            .last_sent_to(applicant)
            .map(|m| m.handle.message_id)
            .unwrap_or(1);
        self.press_on(applicant, message_id, data, now).await
    }

    /// Press a button on a specific earlier message
    pub async fn press_on(
        &self,
        applicant: i64,
        message_id: i64,
        data: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.deliver(
            button_press(applicant, applicant, "private", message_id, data),
            now,
        )
        .await
    }

    /// Answer the first `count` fields with valid values
    pub async fn answer_fields(&self, applicant: i64, count: usize, now: DateTime<Utc>) -> Result<()> {
        for answer in VALID_ANSWERS.iter().take(count) {
            match answer {
                Answer::Text(text) => self.send_text_at(applicant, text, now).await?,
                Answer::Button(data) => self.press_at(applicant, data, now).await?,
            }
        }
        Ok(())
    }

    /// /start and answer every field; ends on the preview
    pub async fn fill_form(&self, applicant: i64, now: DateTime<Utc>) -> Result<()> {
        self.send_text_at(applicant, "/start", now).await?;
        self.answer_fields(applicant, VALID_ANSWERS.len(), now).await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
