//! Answer validation and contact normalization.
//!
//! Pure functions: a raw text answer goes in, a typed value or a `Rejection`
//! comes out. Nothing here fails hard; every rejection is answered by
//! re-asking the same step.

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::utils::truncate_chars;

use super::models::{AnswerValue, Contact, FieldKind};

/// Longest raw contact kept when the input is not a valid handle.
pub const CONTACT_FALLBACK_MAX_CHARS: usize = 64;

/// Case-insensitive answers meaning "I have no contact to give".
const NO_CONTACT_TOKENS: &[&str] = &["no", "none", "nope", "-", "нет", "нету", "ні", "немає"];

lazy_static! {
    // Link schemes, bare www., platform share links, and @-mentions
    static ref LINK_OR_MENTION_REGEX: Regex =
        Regex::new(r"(?i)(https?://|www\.|t\.me/|telegram\.me/|@)").unwrap();

    // Optional scheme + platform share-link prefix
    static ref SHARE_PREFIX_REGEX: Regex =
        Regex::new(r"(?i)^(?:https?://)?(?:www\.)?(?:t\.me|telegram\.me|telegram\.dog)/").unwrap();

    static ref SCHEME_REGEX: Regex = Regex::new(r"(?i)^https?://").unwrap();

    static ref HANDLE_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]{5,32}$").unwrap();
}

/// Why an answer was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    ContainsLinkOrMention,
    TooShort,
    TooLong,
    NotANumber,
    OutOfRange,
    /// Free text sent where only a button answer is accepted
    NotAChoice,
}

pub fn contains_link_or_mention(text: &str) -> bool {
    LINK_OR_MENTION_REGEX.is_match(text)
}

/// Validate `raw` against the rules of a field kind.
pub fn validate(kind: &FieldKind, raw: &str) -> Result<AnswerValue, Rejection> {
    match *kind {
        FieldKind::FreeText {
            min_chars,
            max_chars,
        } => validate_free_text(raw, min_chars, max_chars).map(AnswerValue::Text),
        FieldKind::Numeric { min, max } => validate_number(raw, min, max).map(AnswerValue::Number),
        FieldKind::Contact => validate_contact(raw).map(AnswerValue::Contact),
        FieldKind::FixedChoice { .. } => Err(Rejection::NotAChoice),
    }
}

pub fn validate_free_text(raw: &str, min_chars: usize, max_chars: usize) -> Result<String, Rejection> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Rejection::Empty);
    }
    if contains_link_or_mention(text) {
        return Err(Rejection::ContainsLinkOrMention);
    }

    let len = text.chars().count();
    if len < min_chars {
        return Err(Rejection::TooShort);
    }
    if len > max_chars {
        return Err(Rejection::TooLong);
    }
    Ok(text.to_string())
}

pub fn validate_number(raw: &str, min: u32, max: u32) -> Result<u32, Rejection> {
    let text = raw.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(Rejection::NotANumber);
    }

    // All digits, so the only parse failure left is overflow
    let value: u32 = text.parse().map_err(|_| Rejection::OutOfRange)?;
    if value < min || value > max {
        return Err(Rejection::OutOfRange);
    }
    Ok(value)
}

pub fn validate_contact(raw: &str) -> Result<Contact, Rejection> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Rejection::Empty);
    }

    let lowered = text.to_lowercase();
    if NO_CONTACT_TOKENS.contains(&lowered.as_str()) {
        return Ok(Contact::NotProvided);
    }

    Ok(Contact::Provided(normalize_contact(text)))
}

/// Canonicalize a contact string into `@handle` form.
///
/// Accepts `handle`, `@handle`, `t.me/handle`, `https://t.me/handle` and
/// similar. Anything that does not reduce to a valid handle is returned
/// trimmed and truncated instead of being refused.
pub fn normalize_contact(raw: &str) -> String {
    let trimmed = raw.trim();

    let without_prefix = SHARE_PREFIX_REGEX.replace(trimmed, "");
    let without_scheme = SCHEME_REGEX.replace(&without_prefix, "");
    let candidate = without_scheme.trim();
    let candidate = candidate.strip_prefix('@').unwrap_or(candidate);

    if HANDLE_REGEX.is_match(candidate) {
        format!("@{}", candidate)
    } else {
        truncate_chars(trimmed, CONTACT_FALLBACK_MAX_CHARS)
    }
}
