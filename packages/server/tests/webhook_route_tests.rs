//! HTTP surface: health probes and the webhook receiver.

mod common;

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use chrono::Utc;
use common::{button_payload, text_payload, TestHarness, APPLICANT_ID, WEBHOOK_PATH};
use intake_core::domains::intake::Step;
use intake_core::kernel::{BaseCooldownTracker, TEST_ADMIN_CHAT_ID};
use intake_core::server::routes::SECRET_TOKEN_HEADER;
use test_context::test_context;
use tokio_test::assert_ok;
use tower::ServiceExt;

fn webhook_request(body: String, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(SECRET_TOKEN_HEADER, secret);
    }
    builder.body(Body::from(body)).unwrap()
}

fn start_update() -> String {
    text_payload(APPLICANT_ID, APPLICANT_ID, "private", "/start").to_string()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn health_answers_get_and_head(ctx: &TestHarness) {
    for (method, uri) in [(Method::GET, "/"), (Method::GET, "/health"), (Method::HEAD, "/")] {
        let response = ctx
            .router(None)
            .oneshot(Request::builder().method(method.clone()).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{method} {uri}");

        if method == Method::GET {
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json, serde_json::json!({"ok": true}));
        }
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn webhook_runs_update_through_engine(ctx: &TestHarness) {
    let response = ctx
        .router(None)
        .oneshot(webhook_request(start_update(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.session(APPLICANT_ID).await.step, Step::Field(0));
    assert_eq!(
        ctx.texts_to(APPLICANT_ID),
        vec!["<b>1/11</b> In-game nickname?".to_string()]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn webhook_rejects_wrong_secret(ctx: &TestHarness) {
    for secret in [None, Some("guess")] {
        let response = ctx
            .router(Some("s3cret"))
            .oneshot(webhook_request(start_update(), secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    assert!(ctx.messenger().sent().is_empty());

    let response = ctx
        .router(Some("s3cret"))
        .oneshot(webhook_request(start_update(), Some("s3cret")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.messenger().sent().len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn webhook_acknowledges_garbage_and_ignored_updates(ctx: &TestHarness) {
    let bodies = [
        "not json".to_string(),
        serde_json::json!({"update_id": 5, "edited_message": {}}).to_string(),
    ];
    for body in bodies {
        let response = ctx
            .router(None)
            .oneshot(webhook_request(body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert!(ctx.messenger().sent().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn webhook_swallows_engine_failures(ctx: &TestHarness) {
    ctx.messenger().fail_chat(APPLICANT_ID);

    let response = ctx
        .router(None)
        .oneshot(webhook_request(start_update(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // The transition was saved before the reply failed
    assert_eq!(ctx.session(APPLICANT_ID).await.step, Step::Field(0));
}

#[test_context(TestHarness)]
#[tokio::test(start_paused = true)]
async fn slow_report_delivery_still_completes_submission(ctx: &TestHarness) {
    assert_ok!(ctx.fill_form(APPLICANT_ID, Utc::now()).await);
    let preview = ctx.messenger().last_sent_to(APPLICANT_ID).unwrap();
    ctx.messenger().delay_chat(TEST_ADMIN_CHAT_ID, Duration::from_secs(40));

    let confirm = button_payload(
        APPLICANT_ID,
        APPLICANT_ID,
        "private",
        preview.handle.message_id,
        "confirm",
    );
    let response = ctx
        .router(None)
        .oneshot(webhook_request(confirm.to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.reports().len(), 1);
    assert!(ctx.session(APPLICANT_ID).await.is_idle());
    assert!(!ctx.deps.cooldown.can_submit(APPLICANT_ID, Utc::now()).await);
}
