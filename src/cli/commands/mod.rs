//! CLI command implementations.

pub mod agent;
pub mod replay;
pub mod templates;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::adapters::{InMemoryRecordStore, RestRecordStore, RestStoreSettings};
use crate::cli::types::Commands;
use crate::domain::models::{Config, StoreConfig};
use crate::domain::ports::RecordStore;

/// Record store for the configured backend.
///
/// Without a store url the CLI runs against an empty in-memory store.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    match RestStoreSettings::from_config(config) {
        Some(settings) => {
            tracing::debug!(url = %settings.base_url, table = %settings.table, "using REST record store");
            let store = RestRecordStore::new(settings).context("Failed to create record store client")?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("no store url configured, using an empty in-memory store");
            Ok(Arc::new(InMemoryRecordStore::with_capacity(config.feed_capacity)))
        }
    }
}

pub async fn dispatch(command: Commands, config: &Config, json_mode: bool) -> Result<()> {
    match command {
        Commands::Templates => templates::execute(json_mode),
        Commands::Replay(args) => replay::execute(config, args, json_mode),
        Commands::List(args) => agent::list(open_store(&config.store)?, config, args, json_mode).await,
        Commands::Show { id } => agent::show(open_store(&config.store)?, id, json_mode).await,
        Commands::Create(args) => agent::create(open_store(&config.store)?, args, json_mode).await,
        Commands::Update(args) => agent::update(open_store(&config.store)?, args, json_mode).await,
        Commands::Delete { id } => agent::delete(open_store(&config.store)?, id, json_mode).await,
    }
}
