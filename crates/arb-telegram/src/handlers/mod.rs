//! Telegram update handlers.
//!
//! Each handler is a thin adapter that translates the Telegram update into an
//! `arb-core` inbound event and hands it to the relay service. Nothing here
//! decides what to reply.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};
use tracing::warn;

use arb_core::messaging::types::IncomingUpdate;

use crate::router::AppState;

mod callback;
mod message;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    dispatch(&state, callback::to_update(&q)).await;
    Ok(())
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    // Channel posts carry no sender.
    let Some(update) = message::to_update(&msg) else {
        return Ok(());
    };
    dispatch(&state, update).await;
    Ok(())
}

async fn dispatch(state: &AppState, update: IncomingUpdate) {
    if let Err(e) = state.service.handle(update).await {
        warn!(error = %e, "update handling failed");
    }
}
