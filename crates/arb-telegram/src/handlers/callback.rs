use teloxide::types::CallbackQuery;

use arb_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{ButtonPress, IncomingUpdate},
};

pub(super) fn to_update(q: &CallbackQuery) -> IncomingUpdate {
    IncomingUpdate::ButtonPress(ButtonPress {
        from_user_id: UserId(q.from.id.0 as i64),
        callback_id: q.id.clone(),
        callback_data: q.data.clone().unwrap_or_default(),
        message: q.message.as_ref().map(|m| MessageRef {
            chat_id: ChatId(m.chat.id.0),
            message_id: MessageId(m.id.0),
        }),
    })
}
