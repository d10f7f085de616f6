use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::{
    domain::{ChatId, Content, ContentKind, MessageRef, UserId},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ButtonPress, Command, IncomingContent, IncomingUpdate, NewMessage, ReplyMessage},
    },
    relay::{
        conversation::{ConversationEvent, ConversationState, ConversationStates},
        menu::{MenuAction, Screen},
        pending::PendingResponses,
        resolver::ReplyResolver,
        router::RelayRouter,
    },
    store::CorrelationStore,
    texts, Result,
};

/// Command names the service acts on. Anything else is handled as text.
pub const COMMANDS: &[&str] = &["start", "cancel"];

/// Entry point for inbound events.
///
/// Component failures are turned into user-facing text here. `handle` only
/// returns an error when rendering a menu itself failed.
pub struct RelayService {
    moderator_chat: ChatId,
    messenger: Arc<dyn MessagingPort>,
    router: RelayRouter,
    resolver: ReplyResolver,
    pending: PendingResponses,
    conversations: ConversationStates,
}

impl RelayService {
    pub fn new(
        moderator_chat: ChatId,
        store: Arc<dyn CorrelationStore>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            moderator_chat,
            router: RelayRouter::new(moderator_chat, store.clone(), messenger.clone()),
            resolver: ReplyResolver::new(store.clone(), messenger.clone()),
            pending: PendingResponses::new(store, messenger.clone()),
            messenger,
            conversations: ConversationStates::default(),
        }
    }

    pub async fn conversation_state(&self, user_id: UserId) -> ConversationState {
        self.conversations.get(user_id).await
    }

    pub async fn handle(&self, update: IncomingUpdate) -> Result<()> {
        match update {
            IncomingUpdate::Command(cmd) => self.on_command(cmd).await,
            IncomingUpdate::ButtonPress(press) => self.on_button(press).await,
            IncomingUpdate::ReplyMessage(reply) if reply.chat_id == self.moderator_chat => {
                self.on_moderator_reply(reply).await;
                Ok(())
            }
            IncomingUpdate::ReplyMessage(reply) => {
                self.on_user_message(reply.into_new_message()).await
            }
            // Moderator chat chatter that is not a reply.
            IncomingUpdate::NewMessage(msg) if msg.chat_id == self.moderator_chat => Ok(()),
            IncomingUpdate::NewMessage(msg) => self.on_user_message(msg).await,
        }
    }

    async fn on_command(&self, cmd: Command) -> Result<()> {
        if cmd.chat_id != cmd.from_user_id.private_chat() {
            return Ok(());
        }
        match cmd.name.as_str() {
            "start" | "cancel" => {
                self.conversations
                    .apply(cmd.from_user_id, ConversationEvent::Cancelled)
                    .await;
                self.show(cmd.chat_id, None, Screen::Main).await
            }
            other => {
                // Users in the middle of writing may start a line with a slash.
                debug!(command = other, "unknown command treated as text");
                self.on_user_message(NewMessage {
                    chat_id: cmd.chat_id,
                    message_id: cmd.message_id,
                    from_user_id: cmd.from_user_id,
                    content: Content::Text(cmd.text).into(),
                })
                .await
            }
        }
    }

    async fn on_button(&self, press: ButtonPress) -> Result<()> {
        if let Err(e) = self
            .messenger
            .answer_callback_query(&press.callback_id, None)
            .await
        {
            warn!(error = %e, "failed to answer callback query");
        }

        let Some(action) = MenuAction::parse(&press.callback_data) else {
            debug!(data = %press.callback_data, "unknown callback data ignored");
            return Ok(());
        };

        let user_id = press.from_user_id;
        let chat_id = user_id.private_chat();

        match action {
            MenuAction::AboutCommunity => {
                self.show(chat_id, press.message, Screen::AboutCommunity)
                    .await
            }
            MenuAction::AboutPsychologist => {
                self.show(chat_id, press.message, Screen::AboutPsychologist)
                    .await
            }
            MenuAction::WriteProblem => {
                self.conversations
                    .apply(user_id, ConversationEvent::WriteProblemSelected)
                    .await;
                self.show(chat_id, press.message, Screen::WriteProblem).await
            }
            MenuAction::BackToMain => {
                self.conversations
                    .apply(user_id, ConversationEvent::Cancelled)
                    .await;
                self.show(chat_id, press.message, Screen::Main).await
            }
            MenuAction::CheckResponse => {
                match self.pending.check(user_id).await {
                    Ok(0) => self.notify(chat_id, texts::NO_RESPONSES).await,
                    Ok(_) => {}
                    Err(e) => self.report(chat_id, &e).await,
                }
                // Fresh menu below the delivered responses.
                self.show(chat_id, None, Screen::Main).await
            }
        }
    }

    async fn on_user_message(&self, msg: NewMessage) -> Result<()> {
        let user_id = msg.from_user_id;
        if msg.chat_id != user_id.private_chat() {
            return Ok(());
        }

        if self.conversations.get(user_id).await == ConversationState::Idle {
            self.notify(msg.chat_id, texts::USE_MENU).await;
            return self.show(msg.chat_id, None, Screen::Main).await;
        }

        match self
            .router
            .relay(user_id, msg.message_id, &msg.content)
            .await
        {
            Ok(outcome) => {
                self.conversations
                    .apply(user_id, ConversationEvent::ContentRelayed)
                    .await;
                let confirmation = match outcome.content_kind {
                    ContentKind::Text => texts::RELAYED_TEXT_CONFIRMATION,
                    ContentKind::Voice | ContentKind::VideoNote => {
                        texts::RELAYED_MEDIA_CONFIRMATION
                    }
                };
                self.notify(msg.chat_id, confirmation).await;
                self.show(msg.chat_id, None, Screen::Main).await
            }
            Err(e) => {
                let event = match e {
                    Error::UnsupportedContent(_) => ConversationEvent::UnsupportedContent,
                    _ => ConversationEvent::RelayFailed,
                };
                self.conversations.apply(user_id, event).await;
                self.report(msg.chat_id, &e).await;
                Ok(())
            }
        }
    }

    async fn on_moderator_reply(&self, reply: ReplyMessage) {
        let IncomingContent::Supported(content) = &reply.content else {
            debug!(
                replied_to_message_id = reply.replied_to_message_id.0,
                "unsupported moderator reply ignored"
            );
            return;
        };

        match self
            .resolver
            .resolve_reply(reply.replied_to_message_id, content)
            .await
        {
            Ok(_) => {}
            Err(e) => {
                error!(
                    replied_to_message_id = reply.replied_to_message_id.0,
                    error = %e,
                    "failed to record moderator reply"
                );
                self.report(self.moderator_chat, &e).await;
            }
        }
    }

    /// Edit the menu message in place when we have it, else send a new one.
    async fn show(&self, chat_id: ChatId, msg: Option<MessageRef>, screen: Screen) -> Result<()> {
        if let Some(msg) = msg {
            match self
                .messenger
                .edit_menu(msg, screen.html(), Some(screen.keyboard()))
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) => debug!(error = %e, "menu edit failed; sending a new one"),
            }
        }
        self.messenger
            .send_menu(chat_id, screen.html(), screen.keyboard())
            .await
            .map(|_| ())
    }

    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_text(chat_id, text).await {
            warn!(chat_id = chat_id.0, error = %e, "failed to send notice");
        }
    }

    async fn report(&self, chat_id: ChatId, err: &Error) {
        if let Some(notice) = err.user_notice() {
            self.notify(chat_id, notice).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaRef, MessageId};
    use crate::relay::fakes::{FakeMessenger, FakeStore, Sent};

    const MODS: ChatId = ChatId(-100);
    const USER: UserId = UserId(7);

    fn setup() -> (Arc<FakeStore>, Arc<FakeMessenger>, RelayService) {
        let store = Arc::new(FakeStore::default());
        let messenger = Arc::new(FakeMessenger::default());
        let service = RelayService::new(MODS, store.clone(), messenger.clone());
        (store, messenger, service)
    }

    fn press(data: &str) -> IncomingUpdate {
        IncomingUpdate::ButtonPress(ButtonPress {
            from_user_id: USER,
            callback_id: format!("cb-{data}"),
            callback_data: data.to_string(),
            message: Some(MessageRef {
                chat_id: USER.private_chat(),
                message_id: MessageId(1),
            }),
        })
    }

    fn user_message(id: i32, content: IncomingContent) -> IncomingUpdate {
        IncomingUpdate::NewMessage(NewMessage {
            chat_id: USER.private_chat(),
            message_id: MessageId(id),
            from_user_id: USER,
            content,
        })
    }

    fn moderator_reply(replied_to: i32, content: Content) -> IncomingUpdate {
        IncomingUpdate::ReplyMessage(ReplyMessage {
            chat_id: MODS,
            message_id: MessageId(900),
            from_user_id: UserId(42),
            replied_to_message_id: MessageId(replied_to),
            content: content.into(),
        })
    }

    fn command(name: &str, text: &str) -> IncomingUpdate {
        IncomingUpdate::Command(Command {
            chat_id: USER.private_chat(),
            message_id: MessageId(20),
            from_user_id: USER,
            name: name.to_string(),
            text: text.to_string(),
        })
    }

    #[tokio::test]
    async fn start_renders_main_menu_and_resets_state() {
        let (_store, messenger, service) = setup();
        service.handle(press("write_problem")).await.unwrap();

        service
            .handle(command("start", "/start"))
            .await
            .unwrap();

        assert_eq!(service.conversation_state(USER).await, ConversationState::Idle);
        assert!(matches!(
            messenger.sent().last(),
            Some(Sent::Menu(_, html, _)) if html == texts::START_MESSAGE
        ));
    }

    #[tokio::test]
    async fn button_press_is_acknowledged_and_edits_in_place() {
        let (_store, messenger, service) = setup();

        service.handle(press("about_community")).await.unwrap();

        let sent = messenger.sent();
        assert_eq!(sent[0], Sent::CallbackAnswer("cb-about_community".to_string()));
        assert!(matches!(
            &sent[1],
            Sent::Edit(_, html, Some(_)) if html == texts::ABOUT_COMMUNITY
        ));
    }

    #[tokio::test]
    async fn message_while_idle_is_not_relayed() {
        let (store, messenger, service) = setup();

        service
            .handle(user_message(5, Content::Text("hello".to_string()).into()))
            .await
            .unwrap();

        assert!(store.records().is_empty());
        assert!(messenger.sent_to(MODS).is_empty());
        assert_eq!(
            messenger.texts_to(USER.private_chat()),
            vec![texts::USE_MENU.to_string()]
        );
    }

    #[tokio::test]
    async fn full_text_round_trip() {
        let (store, messenger, service) = setup();

        service.handle(press("write_problem")).await.unwrap();
        assert_eq!(
            service.conversation_state(USER).await,
            ConversationState::AwaitingProblemText
        );

        service
            .handle(user_message(10, Content::Text("I feel anxious".to_string()).into()))
            .await
            .unwrap();
        assert_eq!(service.conversation_state(USER).await, ConversationState::Idle);

        let relayed = store.records()[0].relayed_message_id;
        service
            .handle(moderator_reply(
                relayed.0,
                Content::Text("Let's talk about it".to_string()),
            ))
            .await
            .unwrap();

        let texts_to_user = messenger.texts_to(USER.private_chat());
        assert!(texts_to_user.contains(&texts::RELAYED_TEXT_CONFIRMATION.to_string()));
        assert!(texts_to_user
            .contains(&"Вы получили ответ от психолога:\n\nLet's talk about it".to_string()));

        // First check re-delivers the unread reply, second finds nothing.
        service.handle(press("check_response")).await.unwrap();
        service.handle(press("check_response")).await.unwrap();
        let texts_to_user = messenger.texts_to(USER.private_chat());
        assert!(texts_to_user.contains(&"Ответ психолога:\n\nLet's talk about it".to_string()));
        assert_eq!(texts_to_user.last(), Some(&texts::NO_RESPONSES.to_string()));
    }

    #[tokio::test]
    async fn unsupported_content_keeps_waiting() {
        let (store, messenger, service) = setup();
        service.handle(press("write_problem")).await.unwrap();

        service
            .handle(user_message(
                11,
                IncomingContent::Unsupported {
                    kind: "sticker".to_string(),
                },
            ))
            .await
            .unwrap();

        assert_eq!(
            service.conversation_state(USER).await,
            ConversationState::AwaitingProblemText
        );
        assert!(store.records().is_empty());
        assert_eq!(
            messenger.texts_to(USER.private_chat()),
            vec![texts::UNSUPPORTED_CONTENT.to_string()]
        );
    }

    #[tokio::test]
    async fn storage_outage_shows_temporarily_unavailable() {
        let (store, messenger, service) = setup();
        service.handle(press("write_problem")).await.unwrap();
        store.set_down(true);

        service
            .handle(user_message(12, Content::Voice(MediaRef("v".to_string())).into()))
            .await
            .unwrap();

        assert_eq!(
            service.conversation_state(USER).await,
            ConversationState::AwaitingProblemText
        );
        assert_eq!(
            messenger.texts_to(USER.private_chat()),
            vec![texts::TEMPORARILY_UNAVAILABLE.to_string()]
        );
    }

    #[tokio::test]
    async fn moderator_chatter_and_untracked_replies_are_ignored() {
        let (store, messenger, service) = setup();

        service
            .handle(IncomingUpdate::NewMessage(NewMessage {
                chat_id: MODS,
                message_id: MessageId(77),
                from_user_id: UserId(42),
                content: Content::Text("morning all".to_string()).into(),
            }))
            .await
            .unwrap();
        service
            .handle(moderator_reply(12345, Content::Text("hm?".to_string())))
            .await
            .unwrap();

        assert!(messenger.sent().is_empty());
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn back_cancels_waiting_for_problem() {
        let (_store, _messenger, service) = setup();
        service.handle(press("write_problem")).await.unwrap();
        service.handle(press("back_to_main")).await.unwrap();
        assert_eq!(service.conversation_state(USER).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn unknown_command_while_writing_is_relayed_as_text() {
        let (store, messenger, service) = setup();
        service.handle(press("write_problem")).await.unwrap();

        service
            .handle(command("help", "/help I feel anxious"))
            .await
            .unwrap();

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].origin_message_id, MessageId(20));
        assert_eq!(
            records[0].original_text.as_deref(),
            Some("/help I feel anxious")
        );
        assert_eq!(
            messenger.texts_to(MODS),
            vec!["Анонимное сообщение:\n\n/help I feel anxious".to_string()]
        );
        assert_eq!(service.conversation_state(USER).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn unknown_command_while_idle_gets_the_menu_hint() {
        let (store, messenger, service) = setup();

        service.handle(command("help", "/help")).await.unwrap();

        assert!(store.records().is_empty());
        assert_eq!(
            messenger.texts_to(USER.private_chat()),
            vec![texts::USE_MENU.to_string()]
        );
    }
}
