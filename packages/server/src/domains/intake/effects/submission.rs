//! Submission dispatch - cooldown gate, operator report, bookkeeping.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::domains::intake::actions::{contact_applicant_keyboard, render_report};
use crate::domains::intake::commands::Qualification;
use crate::domains::intake::models::{Answers, Applicant, FieldDef};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Report delivered, cooldown recorded, session cleared
    Delivered,
    /// Blocked by the resubmission window; nothing was sent or changed
    CoolingDown,
}

/// Deliver a finished application to the operator chat.
///
/// The cooldown is checked before anything is sent. The submission only
/// counts (cooldown recorded, session cleared) once the operator message has
/// gone out; a delivery failure is returned and leaves the session intact so
/// the applicant can confirm again. If the report is refused with its contact
/// button it is sent once more without it.
pub async fn dispatch(
    deps: &ServerDeps,
    fields: &[FieldDef],
    applicant: &Applicant,
    answers: &Answers,
    qualification: Qualification,
    now: DateTime<Utc>,
) -> Result<DispatchOutcome> {
    if !deps.cooldown.can_submit(applicant.id, now).await {
        info!(applicant_id = applicant.id, "Submission blocked by cooldown");
        return Ok(DispatchOutcome::CoolingDown);
    }

    let settings = &deps.settings;
    let language = deps.texts.default_language();
    let report = render_report(
        fields,
        &deps.texts,
        language,
        applicant,
        answers,
        qualification,
        now.with_timezone(&settings.report_offset),
        &settings.report_tz_label,
    );
    let keyboard = contact_applicant_keyboard(&deps.texts, language, applicant);

    let sent = deps
        .messenger
        .send_message(settings.admin_chat_id, &report, Some(&keyboard))
        .await;
    if let Err(e) = sent {
        // The contact button can be refused on its own (user privacy settings)
        warn!(applicant_id = applicant.id, error = %e, "Report with contact button refused, sending plain");
        deps.messenger
            .send_message(settings.admin_chat_id, &report, None)
            .await
            .map_err(|e| {
                error!(applicant_id = applicant.id, error = %e, "Failed to deliver application");
                e.context("Failed to deliver application to operators")
            })?;
    }

    deps.cooldown.record_submission(applicant.id, now).await;
    deps.sessions.clear(applicant.id).await;

    info!(applicant_id = applicant.id, ?qualification, "Application delivered");
    Ok(DispatchOutcome::Delivered)
}
