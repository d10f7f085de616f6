use std::sync::Arc;

use arb_core::{config::Config, store::CorrelationStore};
use arb_sqlite::SqliteStore;

#[tokio::main]
async fn main() -> Result<(), arb_core::Error> {
    arb_core::logging::init("arb")?;

    let cfg = Arc::new(Config::load()?);
    let store = SqliteStore::open(&cfg.database_path, cfg.storage_timeout).await?;

    let shared: Arc<dyn CorrelationStore> = Arc::new(store.clone());
    let outcome = arb_telegram::router::run_polling(cfg, shared)
        .await
        .map_err(|e| arb_core::Error::Delivery(format!("telegram bot failed: {e}")));

    store.close().await?;
    outcome
}
