//! The application form: an ordered table of field definitions.
//!
//! This table is configuration, not state. Adding a step means adding a
//! `Field` variant, an `Answers` slot, a row here, and the matching text keys
//! in `locales/*.json`; the state machine walks whatever the table holds.

/// Every question the form can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Nickname,
    Class,
    Level,
    PrimeTime,
    MainQuest,
    PreviousClans,
    VoiceChat,
    Referral,
    Contact,
    About,
    Discipline,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Self::Nickname => "nickname",
            Self::Class => "class",
            Self::Level => "level",
            Self::PrimeTime => "prime_time",
            Self::MainQuest => "main_quest",
            Self::PreviousClans => "previous_clans",
            Self::VoiceChat => "voice_chat",
            Self::Referral => "referral",
            Self::Contact => "contact",
            Self::About => "about",
            Self::Discipline => "discipline",
        }
    }
}

/// Answer to a fixed-choice step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    Yes,
    No,
    InProgress,
}

impl Choice {
    /// Compact token used inside button payloads.
    pub fn token(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::InProgress => "progress",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "progress" => Some(Self::InProgress),
            _ => None,
        }
    }
}

/// One button of a fixed-choice step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub choice: Choice,
    pub label_key: &'static str,
    /// `false` ends the form immediately with a "not qualified" report.
    pub qualifies: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed text, no links and no `@` mentions; length counted in characters.
    FreeText { min_chars: usize, max_chars: usize },
    /// Decimal digits only, inside a closed range.
    Numeric { min: u32, max: u32 },
    /// A contact handle; exempt from the link/mention ban.
    Contact,
    FixedChoice { options: &'static [ChoiceOption] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub field: Field,
    pub kind: FieldKind,
    pub prompt_key: &'static str,
    pub reject_key: &'static str,
    pub label_key: &'static str,
}

impl FieldDef {
    pub fn option(&self, choice: Choice) -> Option<&'static ChoiceOption> {
        match self.kind {
            FieldKind::FixedChoice { options } => options.iter().find(|o| o.choice == choice),
            _ => None,
        }
    }
}

const YES_NO: &[ChoiceOption] = &[
    ChoiceOption { choice: Choice::Yes, label_key: "choice.yes", qualifies: true },
    ChoiceOption { choice: Choice::No, label_key: "choice.no", qualifies: true },
];

const YES_NO_IN_PROGRESS: &[ChoiceOption] = &[
    ChoiceOption { choice: Choice::Yes, label_key: "choice.yes", qualifies: true },
    ChoiceOption { choice: Choice::No, label_key: "choice.no", qualifies: true },
    ChoiceOption { choice: Choice::InProgress, label_key: "choice.in_progress", qualifies: true },
];

const AGREEMENT: &[ChoiceOption] = &[
    ChoiceOption { choice: Choice::Yes, label_key: "choice.agree", qualifies: true },
    ChoiceOption { choice: Choice::No, label_key: "choice.decline", qualifies: false },
];

macro_rules! field {
    ($field:ident, $key:literal, $kind:expr) => {
        FieldDef {
            field: Field::$field,
            kind: $kind,
            prompt_key: concat!("prompt.", $key),
            reject_key: concat!("reject.", $key),
            label_key: concat!("label.", $key),
        }
    };
}

/// The clan application, in the order it is asked.
pub static APPLICATION_FORM: &[FieldDef] = &[
    field!(Nickname, "nickname", FieldKind::FreeText { min_chars: 2, max_chars: 32 }),
    field!(Class, "class", FieldKind::FreeText { min_chars: 2, max_chars: 32 }),
    field!(Level, "level", FieldKind::Numeric { min: 1, max: 99 }),
    field!(PrimeTime, "prime_time", FieldKind::FreeText { min_chars: 3, max_chars: 64 }),
    field!(MainQuest, "main_quest", FieldKind::FixedChoice { options: YES_NO_IN_PROGRESS }),
    field!(PreviousClans, "previous_clans", FieldKind::FreeText { min_chars: 2, max_chars: 200 }),
    field!(VoiceChat, "voice_chat", FieldKind::FixedChoice { options: YES_NO }),
    field!(Referral, "referral", FieldKind::FreeText { min_chars: 2, max_chars: 100 }),
    field!(Contact, "contact", FieldKind::Contact),
    field!(About, "about", FieldKind::FreeText { min_chars: 10, max_chars: 300 }),
    field!(Discipline, "discipline", FieldKind::FixedChoice { options: AGREEMENT }),
];
