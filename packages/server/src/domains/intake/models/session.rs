use super::answers::{AnswerValue, Answers};
use super::field::Field;

/// Stable numeric account id of the applicant.
pub type ApplicantId = i64;

/// Who is filling the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applicant {
    pub id: ApplicantId,
    pub full_name: Option<String>,
    pub username: Option<String>,
}

impl Applicant {
    pub fn new(id: ApplicantId) -> Self {
        Self {
            id,
            full_name: None,
            username: None,
        }
    }
}

/// Position in the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Step {
    /// No form in progress (never started, cancelled, or submitted)
    #[default]
    Idle,
    /// Waiting for the answer to the field at this index
    Field(usize),
    /// All fields answered, preview shown
    Confirmation,
}

/// Per-applicant conversation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub step: Step,
    pub answers: Answers,
    /// Selected locale tag; `None` means the default language
    pub language: Option<String>,
}

impl Session {
    pub fn set_field(&mut self, field: Field, value: AnswerValue) {
        self.answers.set(field, value);
    }

    pub fn clear_field(&mut self, field: Field) {
        self.answers.clear(field);
    }

    pub fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    /// Drop answers and go idle. The language choice survives.
    pub fn clear(&mut self) {
        self.step = Step::Idle;
        self.answers = Answers::default();
    }

    pub fn is_idle(&self) -> bool {
        self.step == Step::Idle
    }
}
