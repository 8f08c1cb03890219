//! Preview and operator-report rendering.
//!
//! Both walk the field table in order, so the layout follows the form
//! definition and every applicant-supplied string is escaped exactly once here.

use chrono::{DateTime, FixedOffset};

use crate::common::utils::escape_html;
use crate::common::{Button, Keyboard, Texts};
use crate::domains::intake::commands::Qualification;
use crate::domains::intake::models::{AnswerValue, Answers, Applicant, Contact, FieldDef};

const MISSING_VALUE: &str = "—";

/// Human-readable, HTML-safe form of one answer.
pub fn display_value(def: &FieldDef, value: &AnswerValue, texts: &Texts, language: &str) -> String {
    match value {
        AnswerValue::Text(text) => escape_html(text),
        AnswerValue::Number(n) => n.to_string(),
        AnswerValue::Choice(choice) => match def.option(*choice) {
            Some(option) => texts.text(language, option.label_key),
            None => choice.token().to_string(),
        },
        AnswerValue::Contact(Contact::Provided(handle)) => escape_html(handle),
        AnswerValue::Contact(Contact::NotProvided) => texts.text(language, "contact.none"),
    }
}

/// One labelled line per field, in form order.
pub fn answer_lines(
    fields: &[FieldDef],
    answers: &Answers,
    texts: &Texts,
    language: &str,
) -> Vec<String> {
    fields
        .iter()
        .map(|def| {
            let value = answers
                .get(def.field)
                .map(|v| display_value(def, &v, texts, language))
                .unwrap_or_else(|| MISSING_VALUE.to_string());
            format!("🔹 {}: <b>{}</b>", texts.text(language, def.label_key), value)
        })
        .collect()
}

pub fn render_preview(fields: &[FieldDef], answers: &Answers, texts: &Texts, language: &str) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        texts.text(language, "preview.title"),
        answer_lines(fields, answers, texts, language).join("\n"),
        texts.text(language, "preview.hint"),
    )
}

fn applicant_name(applicant: &Applicant) -> String {
    let name = applicant
        .full_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .map(escape_html)
        .unwrap_or_else(|| MISSING_VALUE.to_string());

    match applicant.username.as_deref() {
        Some(username) if !username.is_empty() => {
            format!("{}, @{}", name, escape_html(username))
        }
        _ => name,
    }
}

/// The message the operator channel receives.
#[allow(clippy::too_many_arguments)]
pub fn render_report(
    fields: &[FieldDef],
    texts: &Texts,
    language: &str,
    applicant: &Applicant,
    answers: &Answers,
    qualification: Qualification,
    submitted_at: DateTime<FixedOffset>,
    tz_label: &str,
) -> String {
    let title_key = match qualification {
        Qualification::Qualified => "report.title",
        Qualification::NotConfirmed => "report.title_not_confirmed",
    };
    let name = applicant_name(applicant);
    let id = applicant.id.to_string();
    let time = format!("{} {}", submitted_at.format("%d.%m.%Y %H:%M"), tz_label);

    format!(
        "{}\n{}\n\n{}\n\n{}",
        texts.text(language, title_key),
        texts.render(
            language,
            "report.applicant",
            &[("name", name.as_str()), ("id", id.as_str())]
        ),
        answer_lines(fields, answers, texts, language).join("\n"),
        texts.render(language, "report.time", &[("time", time.as_str())]),
    )
}

/// Single button opening a private chat with the applicant. A public
/// username link works regardless of privacy settings; the id deep link is the
/// fallback for applicants without one.
pub fn contact_applicant_keyboard(texts: &Texts, language: &str, applicant: &Applicant) -> Keyboard {
    let url = match applicant.username.as_deref() {
        Some(username) if !username.is_empty() => format!("https://t.me/{}", username),
        _ => format!("tg://user?id={}", applicant.id),
    };
    Keyboard::new().row(vec![Button::url(
        texts.text(language, "button.contact_applicant"),
        url,
    )])
}
