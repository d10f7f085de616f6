//! Hand-written port fakes shared by the relay unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, Content, MediaRef, MessageId, MessageRef, UserId},
    errors::Error,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    store::{CorrelationRecord, CorrelationStore, NewCorrelation, UserRecord},
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Text(ChatId, String),
    Voice(ChatId, MediaRef),
    VideoNote(ChatId, MediaRef),
    Menu(ChatId, String, InlineKeyboard),
    Edit(MessageRef, String, Option<InlineKeyboard>),
    CallbackAnswer(String),
}

/// Records every outbound call. Message ids are handed out from 501 upward.
pub struct FakeMessenger {
    next_id: Mutex<i32>,
    sent: Mutex<Vec<Sent>>,
    failing_chats: Mutex<HashSet<i64>>,
}

impl Default for FakeMessenger {
    fn default() -> Self {
        Self {
            next_id: Mutex::new(501),
            sent: Mutex::new(Vec::new()),
            failing_chats: Mutex::new(HashSet::new()),
        }
    }
}

impl FakeMessenger {
    pub fn fail_chat(&self, chat_id: ChatId) {
        self.failing_chats.lock().unwrap().insert(chat_id.0);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: ChatId) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| match s {
                Sent::Text(c, _) | Sent::Voice(c, _) | Sent::VideoNote(c, _) => *c == chat_id,
                Sent::Menu(c, _, _) => *c == chat_id,
                Sent::Edit(m, _, _) => m.chat_id == chat_id,
                Sent::CallbackAnswer(_) => false,
            })
            .collect()
    }

    pub fn texts_to(&self, chat_id: ChatId) -> Vec<String> {
        self.sent_to(chat_id)
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(_, t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn record(&self, chat_id: ChatId, item: Sent) -> Result<MessageRef> {
        if self.failing_chats.lock().unwrap().contains(&chat_id.0) {
            return Err(Error::Delivery(format!("chat {} unreachable", chat_id.0)));
        }
        self.sent.lock().unwrap().push(item);
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(id),
        })
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        self.record(chat_id, Sent::Text(chat_id, text.to_string()))
    }

    async fn send_voice(&self, chat_id: ChatId, media: &MediaRef) -> Result<MessageRef> {
        self.record(chat_id, Sent::Voice(chat_id, media.clone()))
    }

    async fn send_video_note(&self, chat_id: ChatId, media: &MediaRef) -> Result<MessageRef> {
        self.record(chat_id, Sent::VideoNote(chat_id, media.clone()))
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        self.record(chat_id, Sent::Menu(chat_id, html.to_string(), keyboard))
    }

    async fn edit_menu(
        &self,
        msg: MessageRef,
        html: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        self.record(msg.chat_id, Sent::Edit(msg, html.to_string(), keyboard))
            .map(|_| ())
    }

    async fn answer_callback_query(&self, callback_id: &str, _text: Option<&str>) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::CallbackAnswer(callback_id.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct StoreInner {
    users: HashMap<UserId, UserRecord>,
    records: Vec<CorrelationRecord>,
}

/// In-memory store honouring the same contract as the SQLite one.
#[derive(Default)]
pub struct FakeStore {
    inner: Mutex<StoreInner>,
    down: AtomicBool,
}

impl FakeStore {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<CorrelationRecord> {
        self.inner.lock().unwrap().records.clone()
    }

    fn check_up(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(Error::Storage("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CorrelationStore for FakeStore {
    async fn ensure_user(&self, user_id: UserId) -> Result<()> {
        self.check_up()?;
        self.inner
            .lock()
            .unwrap()
            .users
            .entry(user_id)
            .or_insert_with(|| UserRecord {
                user_id,
                last_answer: None,
                created_at: "2026-01-01T00:00:00Z".to_string(),
            });
        Ok(())
    }

    async fn create_correlation(&self, record: NewCorrelation) -> Result<()> {
        self.check_up()?;
        let mut inner = self.inner.lock().unwrap();
        if inner
            .records
            .iter()
            .any(|r| r.relayed_message_id == record.relayed_message_id)
        {
            return Err(Error::DuplicateKey(record.relayed_message_id));
        }
        inner.records.push(CorrelationRecord {
            relayed_message_id: record.relayed_message_id,
            user_id: record.user_id,
            origin_message_id: record.origin_message_id,
            content_kind: record.content_kind,
            original_text: record.original_text,
            response: None,
            is_read: false,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        });
        Ok(())
    }

    async fn record_response(
        &self,
        relayed_message_id: MessageId,
        response: &Content,
    ) -> Result<UserId> {
        self.check_up()?;
        let mut inner = self.inner.lock().unwrap();
        let rec = inner
            .records
            .iter_mut()
            .find(|r| r.relayed_message_id == relayed_message_id)
            .ok_or(Error::NotFound(relayed_message_id))?;
        rec.response = Some(response.clone());
        rec.is_read = false;
        let user_id = rec.user_id;
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.last_answer = Some(response.payload().to_string());
        }
        Ok(user_id)
    }

    async fn fetch_and_mark_pending(&self, user_id: UserId) -> Result<Vec<Content>> {
        self.check_up()?;
        let mut inner = self.inner.lock().unwrap();
        let mut out = Vec::new();
        for rec in inner.records.iter_mut() {
            if rec.user_id == user_id && rec.is_pending() {
                rec.is_read = true;
                out.extend(rec.response.clone());
            }
        }
        Ok(out)
    }

    async fn correlation(&self, relayed_message_id: MessageId) -> Result<Option<CorrelationRecord>> {
        self.check_up()?;
        Ok(self
            .inner
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.relayed_message_id == relayed_message_id)
            .cloned())
    }

    async fn user(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        self.check_up()?;
        Ok(self.inner.lock().unwrap().users.get(&user_id).cloned())
    }
}
