//! Application form machine.
//!
//! Machines are pure decision makers - they turn events into commands.
//! NO IO, NO async. The machine mutates the applicant's `Session` in place and
//! returns the commands effects must run; the caller persists the session.
//!
//! # Transitions
//!
//! ```text
//! Idle ──start──▶ Field(0) ──valid──▶ Field(1) ─ … ─▶ Field(n-1) ──valid──▶ Confirmation
//!                  │  ▲                                  │                    │
//!                  └──┘ invalid (re-ask)                 │ disqualifying      ├─confirm──▶ Submit(Qualified)
//!                                                        ▼ choice             ├─restart──▶ Field(0)
//!                                                  Submit(NotConfirmed)       └─cancel───▶ Idle
//! ```
//!
//! `back` moves Field(i) → Field(i-1) and forgets the answer to i-1.
//! Button events carry the step they were rendered for; a press whose step is
//! not the current one is a stale button and changes nothing.

use std::sync::Arc;

use crate::common::{Button, Keyboard, Texts};
use crate::domains::intake::actions::{display_value, render_preview};
use crate::domains::intake::commands::{FormCommand, Qualification};
use crate::domains::intake::events::FormEvent;
use crate::domains::intake::models::{AnswerValue, Choice, FieldDef, FieldKind, Session, Step};
use crate::domains::intake::validation::validate;

pub struct FormMachine {
    fields: &'static [FieldDef],
    texts: Arc<Texts>,
}

impl FormMachine {
    pub fn new(fields: &'static [FieldDef], texts: Arc<Texts>) -> Self {
        Self { fields, texts }
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    pub fn decide(&self, session: &mut Session, event: &FormEvent) -> Vec<FormCommand> {
        match event {
            FormEvent::Start => self.restart(session),

            FormEvent::ShowMenu => vec![self.menu(session)],

            FormEvent::ShowLanguages => vec![self.language_picker(session)],

            FormEvent::SelectLanguage(tag) => {
                if !self.texts.supports(tag) {
                    return vec![];
                }
                session.language = Some(tag.clone());
                let mut commands = vec![FormCommand::reply(
                    self.texts.text(tag, "language.set"),
                    None,
                )];
                commands.push(self.current_view(session));
                commands
            }

            FormEvent::Cancel => {
                session.clear();
                let lang = self.language(session);
                vec![FormCommand::reply(
                    self.texts.text(&lang, "cancelled"),
                    Some(self.menu_keyboard(&lang)),
                )]
            }

            FormEvent::TextAnswer(text) => match session.step {
                Step::Idle => vec![self.menu(session)],
                Step::Confirmation => {
                    let lang = self.language(session);
                    vec![
                        FormCommand::reply(self.texts.text(&lang, "use_buttons"), None),
                        self.preview(session),
                    ]
                }
                Step::Field(index) => self.answer_text(session, index, text),
            },

            FormEvent::Choice { step, choice } => match session.step {
                Step::Field(index) if index == *step => self.answer_choice(session, index, *choice),
                _ => vec![],
            },

            FormEvent::Back { step } => match (session.step, step) {
                (Step::Field(index), None) => self.back(session, index),
                (Step::Field(index), Some(pressed)) if index == *pressed => self.back(session, index),
                // `/back` with nothing to go back to: show where the applicant is
                (_, None) => vec![self.current_view(session)],
                _ => vec![],
            },

            FormEvent::Confirm => match session.step {
                Step::Confirmation => vec![FormCommand::Submit {
                    qualification: Qualification::Qualified,
                }],
                _ => vec![],
            },

            FormEvent::Restart => match session.step {
                Step::Confirmation => self.restart(session),
                _ => vec![],
            },
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn restart(&self, session: &mut Session) -> Vec<FormCommand> {
        session.clear();
        session.set_step(Step::Field(0));
        vec![self.prompt(session, 0)]
    }

    fn answer_text(&self, session: &mut Session, index: usize, text: &str) -> Vec<FormCommand> {
        let Some(def) = self.fields.get(index) else {
            return self.out_of_form(session);
        };

        match validate(&def.kind, text) {
            Ok(value) => {
                session.set_field(def.field, value);
                vec![self.advance(session, index)]
            }
            Err(rejection) => {
                tracing::debug!(field = def.field.key(), ?rejection, "Answer rejected");
                let lang = self.language(session);
                let keyboard = match def.kind {
                    FieldKind::FixedChoice { .. } => Some(self.prompt_keyboard(&lang, index)),
                    _ => None,
                };
                vec![FormCommand::reply(self.texts.text(&lang, def.reject_key), keyboard)]
            }
        }
    }

    fn answer_choice(&self, session: &mut Session, index: usize, choice: Choice) -> Vec<FormCommand> {
        let Some(def) = self.fields.get(index) else {
            return self.out_of_form(session);
        };
        // A choice that is not on this step's keyboard is a forged or stale payload
        let Some(option) = def.option(choice) else {
            return vec![];
        };

        let value = AnswerValue::Choice(choice);
        let lang = self.language(session);
        let picked = FormCommand::MarkPicked {
            text: self.texts.render(
                &lang,
                "picked",
                &[
                    ("prompt", self.prompt_text(&lang, index).as_str()),
                    ("value", display_value(def, &value, &self.texts, &lang).as_str()),
                ],
            ),
        };
        session.set_field(def.field, value);

        if !option.qualifies {
            return vec![
                picked,
                FormCommand::Submit {
                    qualification: Qualification::NotConfirmed,
                },
            ];
        }
        vec![picked, self.advance(session, index)]
    }

    fn advance(&self, session: &mut Session, index: usize) -> FormCommand {
        let next = index + 1;
        if next < self.fields.len() {
            session.set_step(Step::Field(next));
            self.prompt(session, next)
        } else {
            session.set_step(Step::Confirmation);
            self.preview(session)
        }
    }

    fn back(&self, session: &mut Session, index: usize) -> Vec<FormCommand> {
        if index == 0 {
            return vec![self.prompt(session, 0)];
        }
        let previous = index - 1;
        if let Some(def) = self.fields.get(index) {
            session.clear_field(def.field);
        }
        if let Some(def) = self.fields.get(previous) {
            session.clear_field(def.field);
        }
        session.set_step(Step::Field(previous));
        vec![self.prompt(session, previous)]
    }

    /// A step index past the end of the table can only come from a session
    /// written against a longer form; start over rather than guess.
    fn out_of_form(&self, session: &mut Session) -> Vec<FormCommand> {
        tracing::warn!(step = ?session.step, "Session step outside the form, restarting");
        self.restart(session)
    }

    // =========================================================================
    // Views
    // =========================================================================

    fn language(&self, session: &Session) -> String {
        self.texts.resolve(session.language.as_deref()).to_string()
    }

    fn current_view(&self, session: &Session) -> FormCommand {
        match session.step {
            Step::Idle => self.menu(session),
            Step::Field(index) => self.prompt(session, index),
            Step::Confirmation => self.preview(session),
        }
    }

    fn menu(&self, session: &Session) -> FormCommand {
        let lang = self.language(session);
        FormCommand::reply(self.texts.text(&lang, "menu"), Some(self.menu_keyboard(&lang)))
    }

    fn menu_keyboard(&self, lang: &str) -> Keyboard {
        Keyboard::new()
            .row(vec![button(self.texts.text(lang, "button.apply"), &FormEvent::Start)])
            .row(vec![button(
                self.texts.text(lang, "button.language"),
                &FormEvent::ShowLanguages,
            )])
    }

    fn language_picker(&self, session: &Session) -> FormCommand {
        let lang = self.language(session);
        let buttons = self
            .texts
            .languages()
            .map(|tag| {
                button(
                    self.texts.text(tag, "language.name"),
                    &FormEvent::SelectLanguage(tag.to_string()),
                )
            })
            .collect();
        FormCommand::reply(
            self.texts.text(&lang, "language.pick"),
            Some(Keyboard::new().row(buttons)),
        )
    }

    fn prompt_text(&self, lang: &str, index: usize) -> String {
        let Some(def) = self.fields.get(index) else {
            return String::new();
        };
        let current = (index + 1).to_string();
        let total = self.fields.len().to_string();
        self.texts.render(
            lang,
            "prompt.format",
            &[
                ("current", current.as_str()),
                ("total", total.as_str()),
                ("prompt", self.texts.text(lang, def.prompt_key).as_str()),
            ],
        )
    }

    fn prompt(&self, session: &Session, index: usize) -> FormCommand {
        let lang = self.language(session);
        FormCommand::reply(
            self.prompt_text(&lang, index),
            Some(self.prompt_keyboard(&lang, index)),
        )
    }

    fn prompt_keyboard(&self, lang: &str, index: usize) -> Keyboard {
        let choices = match self.fields.get(index).map(|def| def.kind) {
            Some(FieldKind::FixedChoice { options }) => options
                .iter()
                .map(|option| {
                    button(
                        self.texts.text(lang, option.label_key),
                        &FormEvent::Choice {
                            step: index,
                            choice: option.choice,
                        },
                    )
                })
                .collect(),
            _ => vec![],
        };

        let mut navigation = Vec::new();
        if index > 0 {
            navigation.push(button(
                self.texts.text(lang, "button.back"),
                &FormEvent::Back { step: Some(index) },
            ));
        }
        navigation.push(button(self.texts.text(lang, "button.cancel"), &FormEvent::Cancel));

        Keyboard::new().row(choices).row(navigation)
    }

    fn preview(&self, session: &Session) -> FormCommand {
        let lang = self.language(session);
        let keyboard = Keyboard::new()
            .row(vec![button(self.texts.text(&lang, "button.confirm"), &FormEvent::Confirm)])
            .row(vec![
                button(self.texts.text(&lang, "button.restart"), &FormEvent::Restart),
                button(self.texts.text(&lang, "button.cancel"), &FormEvent::Cancel),
            ]);
        FormCommand::reply(
            render_preview(self.fields, &session.answers, &self.texts, &lang),
            Some(keyboard),
        )
    }
}

fn button(label: String, event: &FormEvent) -> Button {
    Button::callback(label, event.callback_data().unwrap_or_default())
}
