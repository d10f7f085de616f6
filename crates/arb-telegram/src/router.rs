use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use arb_core::{
    config::Config,
    messaging::{port::MessagingPort, timeout::TimeboxedMessenger},
    relay::service::RelayService,
    store::CorrelationStore,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RelayService>,
}

/// Long-poll Telegram until Ctrl-C.
///
/// Teloxide runs updates from the same chat one after another, which keeps a
/// single user's conversation transitions ordered.
pub async fn run_polling(cfg: Arc<Config>, store: Arc<dyn CorrelationStore>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!(bot = %me.username(), "relay bot started"),
        Err(e) => warn!(error = %e, "get_me failed; continuing"),
    }
    info!(moderator_chat = cfg.moderator_chat_id.0, "forwarding to moderator chat");

    // Every transport call is bounded; the adapter itself keeps a single 429 retry.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> =
        Arc::new(TimeboxedMessenger::new(raw_messenger, cfg.transport_timeout));

    let state = Arc::new(AppState {
        service: Arc::new(RelayService::new(cfg.moderator_chat_id, store, messenger)),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("dispatcher stopped");
    Ok(())
}
