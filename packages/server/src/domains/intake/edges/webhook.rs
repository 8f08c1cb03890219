//! Webhook edge - turns a transport update into an intake event.

use telegram::{ChatKind, Message, Update, User};

use crate::domains::intake::events::FormEvent;
use crate::domains::intake::models::Applicant;
use crate::kernel::MessageHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatContext {
    pub id: i64,
    pub is_private: bool,
}

/// Where the update came from; button presses must be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Message,
    Button {
        callback_id: String,
        /// The message carrying the pressed button, if still addressable
        message: Option<MessageHandle>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub applicant: Applicant,
    pub chat: ChatContext,
    pub origin: Origin,
    /// `None` for button payloads the bot does not understand
    pub event: Option<FormEvent>,
}

fn applicant_from(user: &User) -> Applicant {
    Applicant {
        id: user.id,
        full_name: Some(user.full_name()),
        username: user.username.clone(),
    }
}

fn chat_from(message: &Message) -> ChatContext {
    ChatContext {
        id: message.chat.id,
        is_private: message.chat.kind == ChatKind::Private,
    }
}

/// Map an update to an inbound event. Updates without a sender, bot senders,
/// messages without text, and update kinds the form does not use yield `None`.
pub fn inbound_from_update(update: Update) -> Option<Inbound> {
    if let Some(query) = update.callback_query {
        if query.from.is_bot {
            return None;
        }
        let event = match query.data.as_deref() {
            Some(data) => match FormEvent::from_callback_data(data) {
                Ok(event) => Some(event),
                Err(err) => {
                    tracing::debug!(error = %err, "Ignoring button payload");
                    None
                }
            },
            None => None,
        };
        // Without the originating message the private-chat check falls back to
        // the sender's own chat, which is always private.
        let chat = query.message.as_ref().map(chat_from).unwrap_or(ChatContext {
            id: query.from.id,
            is_private: true,
        });
        let message = query.message.as_ref().map(|m| MessageHandle {
            chat_id: m.chat.id,
            message_id: m.message_id,
        });

        return Some(Inbound {
            applicant: applicant_from(&query.from),
            chat,
            origin: Origin::Button {
                callback_id: query.id,
                message,
            },
            event,
        });
    }

    let message = update.message?;
    let user = message.from.as_ref()?;
    if user.is_bot {
        return None;
    }
    // Stickers, photos and service messages are not answers
    let text = message.text.as_deref()?;

    Some(Inbound {
        applicant: applicant_from(user),
        chat: chat_from(&message),
        origin: Origin::Message,
        event: Some(FormEvent::from_text(text)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(json: serde_json::Value) -> Update {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn private_text_message() {
        let inbound = inbound_from_update(update(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "from": {"id": 42, "is_bot": false, "first_name": "Ann", "last_name": "Lee", "username": "annlee"},
                "chat": {"id": 42, "type": "private"},
                "text": "Ragnar"
            }
        })))
        .unwrap();

        assert_eq!(inbound.applicant.id, 42);
        assert_eq!(inbound.applicant.full_name.as_deref(), Some("Ann Lee"));
        assert_eq!(inbound.chat, ChatContext { id: 42, is_private: true });
        assert_eq!(inbound.origin, Origin::Message);
        assert_eq!(inbound.event, Some(FormEvent::TextAnswer("Ragnar".into())));
    }

    #[test]
    fn group_command_is_not_private() {
        let inbound = inbound_from_update(update(serde_json::json!({
            "update_id": 2,
            "message": {
                "message_id": 11,
                "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
                "chat": {"id": -1001, "type": "supergroup"},
                "text": "/start@ClanBot"
            }
        })))
        .unwrap();

        assert!(!inbound.chat.is_private);
        assert_eq!(inbound.event, Some(FormEvent::Start));
    }

    #[test]
    fn button_press_keeps_callback_and_message() {
        let inbound = inbound_from_update(update(serde_json::json!({
            "update_id": 3,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
                "message": {"message_id": 77, "chat": {"id": 42, "type": "private"}, "text": "5/11"},
                "data": "pick:4:yes"
            }
        })))
        .unwrap();

        assert_eq!(
            inbound.origin,
            Origin::Button {
                callback_id: "cb-1".into(),
                message: Some(MessageHandle { chat_id: 42, message_id: 77 }),
            }
        );
        assert_eq!(
            inbound.event,
            Some(FormEvent::Choice { step: 4, choice: crate::domains::intake::models::Choice::Yes })
        );
    }

    #[test]
    fn unknown_payload_still_yields_button_origin() {
        let inbound = inbound_from_update(update(serde_json::json!({
            "update_id": 4,
            "callback_query": {
                "id": "cb-2",
                "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
                "data": "legacy_button"
            }
        })))
        .unwrap();

        assert!(matches!(inbound.origin, Origin::Button { message: None, .. }));
        assert_eq!(inbound.chat, ChatContext { id: 42, is_private: true });
        assert_eq!(inbound.event, None);
    }

    #[test]
    fn non_text_message_is_dropped() {
        let inbound = inbound_from_update(update(serde_json::json!({
            "update_id": 5,
            "message": {
                "message_id": 12,
                "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
                "chat": {"id": 42, "type": "private"}
            }
        })));

        assert!(inbound.is_none());
    }

    #[test]
    fn senderless_and_bot_updates_are_dropped() {
        assert!(inbound_from_update(update(serde_json::json!({"update_id": 6}))).is_none());
        assert!(inbound_from_update(update(serde_json::json!({
            "update_id": 7,
            "message": {"message_id": 1, "chat": {"id": -5, "type": "channel"}, "text": "news"}
        })))
        .is_none());
        assert!(inbound_from_update(update(serde_json::json!({
            "update_id": 8,
            "message": {
                "message_id": 1,
                "from": {"id": 9, "is_bot": true, "first_name": "Bot"},
                "chat": {"id": 9, "type": "private"},
                "text": "hi"
            }
        })))
        .is_none());
    }
}
