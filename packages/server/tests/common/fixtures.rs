//! Update payloads and form answers shared by the integration tests.

use serde_json::{json, Value};
use telegram::Update;

/// Applicant used by most scenarios; private chat id equals the user id
pub const APPLICANT_ID: i64 = 42;

/// A group the bot was added to
pub const GROUP_CHAT_ID: i64 = -100_777;

/// One step of filling the form.
#[derive(Debug, Clone, Copy)]
pub enum Answer {
    Text(&'static str),
    Button(&'static str),
}

/// Valid answers for every field, in form order. The last one agrees to the
/// rules, so the form ends on the preview.
pub const VALID_ANSWERS: &[Answer] = &[
    Answer::Text("Ragnar"),
    Answer::Text("Mage"),
    Answer::Text("78"),
    Answer::Text("19:00-23:00"),
    Answer::Button("pick:4:progress"),
    Answer::Text("none before"),
    Answer::Button("pick:6:yes"),
    Answer::Text("forum"),
    Answer::Text("t.me/validname123"),
    Answer::Text("Friendly raider from EU"),
    Answer::Button("pick:10:yes"),
];

fn user(id: i64) -> Value {
    json!({
        "id": id,
        "is_bot": false,
        "first_name": "Ann",
        "last_name": "Lee",
        "username": "annlee",
        "language_code": "en"
    })
}

fn parse(value: Value) -> Update {
    serde_json::from_value(value).expect("fixture update must parse")
}

pub fn text_payload(user_id: i64, chat_id: i64, chat_type: &str, text: &str) -> Value {
    json!({
        "update_id": 1000,
        "message": {
            "message_id": 1,
            "from": user(user_id),
            "chat": {"id": chat_id, "type": chat_type},
            "date": 1714550400,
            "text": text
        }
    })
}

/// Text typed by `user_id` in their private chat
pub fn private_text(user_id: i64, text: &str) -> Update {
    parse(text_payload(user_id, user_id, "private", text))
}

pub fn group_text(user_id: i64, chat_id: i64, text: &str) -> Update {
    parse(text_payload(user_id, chat_id, "supergroup", text))
}

pub fn button_payload(user_id: i64, chat_id: i64, chat_type: &str, message_id: i64, data: &str) -> Value {
    json!({
        "update_id": 1001,
        "callback_query": {
            "id": format!("cb-{}-{}", message_id, data),
            "from": user(user_id),
            "message": {
                "message_id": message_id,
                "chat": {"id": chat_id, "type": chat_type},
                "date": 1714550400,
                "text": "prompt"
            },
            "chat_instance": "1",
            "data": data
        }
    })
}

/// Button press on `message_id` in `chat_id`
pub fn button_press(user_id: i64, chat_id: i64, chat_type: &str, message_id: i64, data: &str) -> Update {
    parse(button_payload(user_id, chat_id, chat_type, message_id, data))
}
