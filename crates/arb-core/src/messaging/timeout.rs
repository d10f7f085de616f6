use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::timeout;

use crate::{
    domain::{ChatId, MediaRef, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    Result,
};

/// MessagingPort decorator that bounds every outbound call.
///
/// An elapsed call is reported as `Error::Delivery`, same as a failed one.
/// Nothing is retried here.
pub struct TimeboxedMessenger {
    inner: Arc<dyn MessagingPort>,
    limit: Duration,
}

impl TimeboxedMessenger {
    pub fn new(inner: Arc<dyn MessagingPort>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(&self, op: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.limit, fut).await {
            Ok(res) => res,
            Err(_) => Err(Error::Delivery(format!(
                "{op} timed out after {:?}",
                self.limit
            ))),
        }
    }
}

#[async_trait]
impl MessagingPort for TimeboxedMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        self.bounded("send_text", self.inner.send_text(chat_id, text))
            .await
    }

    async fn send_voice(&self, chat_id: ChatId, media: &MediaRef) -> Result<MessageRef> {
        self.bounded("send_voice", self.inner.send_voice(chat_id, media))
            .await
    }

    async fn send_video_note(&self, chat_id: ChatId, media: &MediaRef) -> Result<MessageRef> {
        self.bounded("send_video_note", self.inner.send_video_note(chat_id, media))
            .await
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        self.bounded("send_menu", self.inner.send_menu(chat_id, html, keyboard))
            .await
    }

    async fn edit_menu(
        &self,
        msg: MessageRef,
        html: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        self.bounded("edit_menu", self.inner.edit_menu(msg, html, keyboard))
            .await
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.bounded(
            "answer_callback_query",
            self.inner.answer_callback_query(callback_id, text),
        )
        .await
    }
}
