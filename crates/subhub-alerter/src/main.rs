use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use subhub_alerter::{run_once, AlerterConfig};
use subhub_core::memory::{InMemoryDirectory, LoggingNotifier};
use subhub_core::subscription::Subscription;
use subhub_storage::SubscriptionTable;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Deserialize)]
struct ContactSeed {
    username: String,
    email: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subhub_alerter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("subhub-alerter starting...");

    let config = AlerterConfig::from_env();
    tracing::info!(
        workers = config.workers(),
        horizon_days = config.horizon_days(),
        "alerter configured"
    );

    let table = SubscriptionTable::new();
    let directory = InMemoryDirectory::new();

    if let Some(path) = &config.subscriptions_file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read subscriptions file {path}"))?;
        let subscriptions: Vec<Subscription> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse subscriptions file {path}"))?;
        for subscription in &subscriptions {
            table.put(subscription).await?;
        }
        tracing::info!(count = subscriptions.len(), "subscriptions loaded");
    }

    if let Some(path) = &config.contacts_file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read contacts file {path}"))?;
        let contacts: Vec<ContactSeed> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse contacts file {path}"))?;
        let count = contacts.len();
        for contact in contacts {
            directory.insert(contact.username, contact.email).await;
        }
        tracing::info!(count, "contacts loaded");
    }

    if table.is_empty().await {
        tracing::warn!("no subscriptions loaded; set SUBHUB_SUBSCRIPTIONS_FILE to seed the table");
    }

    let summary = run_once(
        &table,
        Arc::new(directory),
        Arc::new(LoggingNotifier::new()),
        &config,
    )
    .await?;

    tracing::info!(
        attempted = summary.attempted,
        delivered = summary.delivered,
        failed = summary.failed,
        "alerter run complete"
    );
    Ok(())
}
