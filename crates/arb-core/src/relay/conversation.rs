//! Per-user dialog state. Kept in memory only; a restart returns everyone to
//! `Idle`.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::UserId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingProblemText,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversationEvent {
    /// "Write a problem" pressed.
    WriteProblemSelected,
    /// Supported content was relayed.
    ContentRelayed,
    UnsupportedContent,
    /// Relay failed on storage or transport; the user may resend.
    RelayFailed,
    /// "Back", `/start` or `/cancel`.
    Cancelled,
}

impl ConversationState {
    pub fn on(self, event: ConversationEvent) -> Self {
        use ConversationEvent::*;
        use ConversationState::*;

        match (self, event) {
            (_, WriteProblemSelected) => AwaitingProblemText,
            (_, Cancelled) => Idle,
            (AwaitingProblemText, ContentRelayed) => Idle,
            (state, UnsupportedContent | RelayFailed) => state,
            (Idle, ContentRelayed) => Idle,
        }
    }
}

#[derive(Default)]
pub struct ConversationStates {
    inner: Mutex<HashMap<UserId, ConversationState>>,
}

impl ConversationStates {
    pub async fn get(&self, user_id: UserId) -> ConversationState {
        self.inner
            .lock()
            .await
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    /// Apply `event` and return the new state. Idle users are not kept in the map.
    pub async fn apply(&self, user_id: UserId, event: ConversationEvent) -> ConversationState {
        let mut map = self.inner.lock().await;
        let next = map.get(&user_id).copied().unwrap_or_default().on(event);
        if next == ConversationState::Idle {
            map.remove(&user_id);
        } else {
            map.insert(user_id, next);
        }
        next
    }
}
