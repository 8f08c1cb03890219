use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
};
use telegram::Update;
use tracing::{debug, error, warn};

use crate::domains::intake::inbound_from_update;
use crate::server::app::AxumAppState;

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Webhook receiver for Bot API updates
///
/// Anything that is not a usable update is acknowledged and dropped, and a
/// failure while handling is logged rather than returned: a non-2xx answer
/// makes the platform redeliver the same update.
pub async fn webhook_handler(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(expected) = state.webhook_secret.as_deref() {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected) {
            warn!("Webhook call with missing or wrong secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Unparseable webhook payload");
            return StatusCode::OK;
        }
    };
    let update_id = update.update_id;

    let Some(inbound) = inbound_from_update(update) else {
        debug!(update_id, "Ignoring update");
        return StatusCode::OK;
    };

    if let Err(e) = state.engine.handle(inbound).await {
        error!(update_id, error = ?e, "Failed to handle update");
    }

    StatusCode::OK
}
