use crate::common::Keyboard;

/// How a finished form is reported to the operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualification {
    /// Confirmed from the preview
    Qualified,
    /// Ended early on a disqualifying answer (discipline declined)
    NotConfirmed,
}

/// Form domain commands - intent for IO, decided by the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    /// Send a new message to the applicant
    Reply {
        text: String,
        keyboard: Option<Keyboard>,
    },
    /// Rewrite the pressed prompt to show the picked answer and drop its buttons
    MarkPicked { text: String },
    /// Hand the collected answers to submission dispatch
    Submit { qualification: Qualification },
}

impl FormCommand {
    pub fn reply(text: impl Into<String>, keyboard: Option<Keyboard>) -> Self {
        Self::Reply {
            text: text.into(),
            keyboard,
        }
    }
}
