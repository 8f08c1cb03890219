use super::field::{Choice, Field};

/// A captured contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contact {
    /// Canonical `@handle`, or the trimmed raw input when it is not a handle
    Provided(String),
    /// The applicant explicitly said they have none
    NotProvided,
}

/// One validated answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Text(String),
    Number(u32),
    Choice(Choice),
    Contact(Contact),
}

/// Answers collected so far, one slot per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    pub nickname: Option<String>,
    pub class: Option<String>,
    pub level: Option<u32>,
    pub prime_time: Option<String>,
    pub main_quest: Option<Choice>,
    pub previous_clans: Option<String>,
    pub voice_chat: Option<Choice>,
    pub referral: Option<String>,
    pub contact: Option<Contact>,
    pub about: Option<String>,
    pub discipline: Option<Choice>,
}

impl AnswerValue {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn into_number(self) -> Option<u32> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    fn into_choice(self) -> Option<Choice> {
        match self {
            Self::Choice(c) => Some(c),
            _ => None,
        }
    }

    fn into_contact(self) -> Option<Contact> {
        match self {
            Self::Contact(c) => Some(c),
            _ => None,
        }
    }
}

impl Answers {
    /// Store `value` in the slot for `field`. A value of the wrong shape
    /// leaves the slot empty.
    pub fn set(&mut self, field: Field, value: AnswerValue) {
        match field {
            Field::Nickname => self.nickname = value.into_text(),
            Field::Class => self.class = value.into_text(),
            Field::Level => self.level = value.into_number(),
            Field::PrimeTime => self.prime_time = value.into_text(),
            Field::MainQuest => self.main_quest = value.into_choice(),
            Field::PreviousClans => self.previous_clans = value.into_text(),
            Field::VoiceChat => self.voice_chat = value.into_choice(),
            Field::Referral => self.referral = value.into_text(),
            Field::Contact => self.contact = value.into_contact(),
            Field::About => self.about = value.into_text(),
            Field::Discipline => self.discipline = value.into_choice(),
        }
    }

    pub fn get(&self, field: Field) -> Option<AnswerValue> {
        match field {
            Field::Nickname => self.nickname.clone().map(AnswerValue::Text),
            Field::Class => self.class.clone().map(AnswerValue::Text),
            Field::Level => self.level.map(AnswerValue::Number),
            Field::PrimeTime => self.prime_time.clone().map(AnswerValue::Text),
            Field::MainQuest => self.main_quest.map(AnswerValue::Choice),
            Field::PreviousClans => self.previous_clans.clone().map(AnswerValue::Text),
            Field::VoiceChat => self.voice_chat.map(AnswerValue::Choice),
            Field::Referral => self.referral.clone().map(AnswerValue::Text),
            Field::Contact => self.contact.clone().map(AnswerValue::Contact),
            Field::About => self.about.clone().map(AnswerValue::Text),
            Field::Discipline => self.discipline.map(AnswerValue::Choice),
        }
    }

    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Nickname => self.nickname = None,
            Field::Class => self.class = None,
            Field::Level => self.level = None,
            Field::PrimeTime => self.prime_time = None,
            Field::MainQuest => self.main_quest = None,
            Field::PreviousClans => self.previous_clans = None,
            Field::VoiceChat => self.voice_chat = None,
            Field::Referral => self.referral = None,
            Field::Contact => self.contact = None,
            Field::About => self.about = None,
            Field::Discipline => self.discipline = None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let mut answers = Answers::default();
        answers.set(Field::Level, AnswerValue::Number(78));
        answers.set(Field::VoiceChat, AnswerValue::Choice(Choice::No));

        assert_eq!(answers.get(Field::Level), Some(AnswerValue::Number(78)));
        assert_eq!(answers.get(Field::VoiceChat), Some(AnswerValue::Choice(Choice::No)));
        assert_eq!(answers.get(Field::Nickname), None);
    }

    #[test]
    fn mismatched_value_leaves_slot_empty() {
        let mut answers = Answers::default();
        answers.set(Field::Level, AnswerValue::Text("seventy".into()));
        assert!(answers.is_empty());
    }

    #[test]
    fn clear_empties_one_slot() {
        let mut answers = Answers::default();
        answers.set(Field::Nickname, AnswerValue::Text("Ragnar".into()));
        answers.set(Field::Class, AnswerValue::Text("Mage".into()));

        answers.clear(Field::Class);

        assert_eq!(answers.class, None);
        assert_eq!(answers.nickname.as_deref(), Some("Ragnar"));
    }
}
