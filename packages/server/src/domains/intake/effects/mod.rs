//! Intake effects - execute the commands the form machine decided on.

pub mod submission;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::warn;

pub use submission::{dispatch, DispatchOutcome};

use crate::domains::intake::commands::{FormCommand, Qualification};
use crate::domains::intake::models::{Answers, Applicant, FieldDef};
use crate::kernel::{MessageHandle, ServerDeps};

/// Everything effects need to know about the update being handled.
pub struct EffectContext<'a> {
    pub applicant: &'a Applicant,
    pub chat_id: i64,
    /// Message carrying the pressed button, when the update is a button press
    pub origin: Option<MessageHandle>,
    pub language: &'a str,
    pub fields: &'a [FieldDef],
    pub now: DateTime<Utc>,
}

/// Run commands in order.
///
/// Returns the text of a blocking alert the caller must attach to the
/// button acknowledgement, if any.
pub async fn execute(
    deps: &ServerDeps,
    ctx: &EffectContext<'_>,
    answers: &Answers,
    commands: Vec<FormCommand>,
) -> Result<Option<String>> {
    let mut alert = None;

    for command in commands {
        match command {
            FormCommand::Reply { text, keyboard } => {
                deps.messenger
                    .send_message(ctx.chat_id, &text, keyboard.as_ref())
                    .await?;
            }

            FormCommand::MarkPicked { text } => match ctx.origin {
                Some(handle) => {
                    // Cosmetic; the answer is already stored
                    if let Err(e) = deps.messenger.edit_message(&handle, &text, None).await {
                        warn!(error = %e, "Failed to mark picked answer");
                    }
                }
                None => {
                    deps.messenger.send_message(ctx.chat_id, &text, None).await?;
                }
            },

            FormCommand::Submit { qualification } => {
                let outcome = dispatch(
                    deps,
                    ctx.fields,
                    ctx.applicant,
                    answers,
                    qualification,
                    ctx.now,
                )
                .await?;
                alert = acknowledge(deps, ctx, outcome, qualification).await?;
            }
        }
    }

    Ok(alert)
}

async fn acknowledge(
    deps: &ServerDeps,
    ctx: &EffectContext<'_>,
    outcome: DispatchOutcome,
    qualification: Qualification,
) -> Result<Option<String>> {
    let texts = &deps.texts;

    match (outcome, qualification) {
        (DispatchOutcome::Delivered, Qualification::Qualified) => {
            let text = texts.text(ctx.language, "submitted");
            // The preview is replaced so its buttons cannot be pressed again
            let edited = match ctx.origin {
                Some(handle) => match deps.messenger.edit_message(&handle, &text, None).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(error = %e, "Failed to replace preview");
                        false
                    }
                },
                None => false,
            };
            if !edited {
                deps.messenger.send_message(ctx.chat_id, &text, None).await?;
            }
            Ok(None)
        }

        (DispatchOutcome::Delivered, Qualification::NotConfirmed) => {
            deps.messenger
                .send_message(ctx.chat_id, &texts.text(ctx.language, "rejected_discipline"), None)
                .await?;
            Ok(None)
        }

        (DispatchOutcome::CoolingDown, Qualification::Qualified) => {
            Ok(Some(cooldown_notice(deps, ctx.language)))
        }

        // The form already ended on the disqualifying answer; close it either way
        (DispatchOutcome::CoolingDown, Qualification::NotConfirmed) => {
            deps.sessions.clear(ctx.applicant.id).await;
            deps.messenger
                .send_message(ctx.chat_id, &cooldown_notice(deps, ctx.language), None)
                .await?;
            Ok(None)
        }
    }
}

fn cooldown_notice(deps: &ServerDeps, language: &str) -> String {
    let hours = deps.settings.cooldown_hours.to_string();
    deps.texts
        .render(language, "cooldown", &[("hours", hours.as_str())])
}
