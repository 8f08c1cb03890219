use thiserror::Error;

use crate::domains::intake::models::Choice;

/// Everything an applicant can do to the form.
///
/// Slash commands and button payloads are parsed into this type once, at the
/// edge; the machine never sees raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// `/start` or the "apply" button: begin (or begin again) at step 1
    Start,
    /// `/help`: show the main menu
    ShowMenu,
    /// `/language` or the language button: show the language picker
    ShowLanguages,
    SelectLanguage(String),
    /// Free text typed while the form is open
    TextAnswer(String),
    /// Fixed-choice button rendered for field `step`
    Choice { step: usize, choice: Choice },
    /// Go back one field. `None` (typed `/back`) means "from wherever I am".
    Back { step: Option<usize> },
    Confirm,
    Restart,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("unknown button token: {0}")]
    Unknown(String),

    #[error("malformed button token: {0}")]
    Malformed(String),
}

impl FormEvent {
    /// Interpret a text message. Slash commands map to their events; any other
    /// text is an answer.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(command) = trimmed.strip_prefix('/') {
            // "/start@ClanBot payload" → "start"
            let name = command
                .split_whitespace()
                .next()
                .unwrap_or("")
                .split('@')
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();

            match name.as_str() {
                "start" => return Self::Start,
                "cancel" => return Self::Cancel,
                "back" => return Self::Back { step: None },
                "language" | "lang" => return Self::ShowLanguages,
                "help" | "menu" => return Self::ShowMenu,
                _ => {}
            }
        }
        Self::TextAnswer(text.to_string())
    }

    /// Parse a button payload.
    pub fn from_callback_data(data: &str) -> Result<Self, TokenError> {
        let mut parts = data.split(':');
        let head = parts.next().unwrap_or("");
        let event = match head {
            "start" => Self::Start,
            "confirm" => Self::Confirm,
            "restart" => Self::Restart,
            "cancel" => Self::Cancel,
            "menu" => match parts.next() {
                Some("lang") => Self::ShowLanguages,
                _ => return Err(TokenError::Malformed(data.to_string())),
            },
            "lang" => match parts.next() {
                Some(tag) if !tag.is_empty() => Self::SelectLanguage(tag.to_string()),
                _ => return Err(TokenError::Malformed(data.to_string())),
            },
            "back" => Self::Back {
                step: Some(parse_step(parts.next(), data)?),
            },
            "pick" => {
                let step = parse_step(parts.next(), data)?;
                let choice = parts
                    .next()
                    .and_then(Choice::from_token)
                    .ok_or_else(|| TokenError::Malformed(data.to_string()))?;
                Self::Choice { step, choice }
            }
            _ => return Err(TokenError::Unknown(data.to_string())),
        };

        if parts.next().is_some() {
            return Err(TokenError::Malformed(data.to_string()));
        }
        Ok(event)
    }

    /// True for anything but free text: slash commands and button presses are
    /// addressed to the bot, plain text may just be conversation.
    pub fn is_addressed_to_bot(&self) -> bool {
        !matches!(self, Self::TextAnswer(_))
    }

    /// Button payload for this event, if it can be sent from a button.
    pub fn callback_data(&self) -> Option<String> {
        match self {
            Self::Start => Some("start".to_string()),
            Self::ShowLanguages => Some("menu:lang".to_string()),
            Self::SelectLanguage(tag) => Some(format!("lang:{}", tag)),
            Self::Choice { step, choice } => Some(format!("pick:{}:{}", step, choice.token())),
            Self::Back { step: Some(step) } => Some(format!("back:{}", step)),
            Self::Confirm => Some("confirm".to_string()),
            Self::Restart => Some("restart".to_string()),
            Self::Cancel => Some("cancel".to_string()),
            Self::ShowMenu | Self::TextAnswer(_) | Self::Back { step: None } => None,
        }
    }
}

fn parse_step(part: Option<&str>, data: &str) -> Result<usize, TokenError> {
    part.and_then(|s| s.parse().ok())
        .ok_or_else(|| TokenError::Malformed(data.to_string()))
}
