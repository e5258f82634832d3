// Renewal alert dispatch
//
// Scans for subscriptions whose remind-on date sits at the configured
// horizon, then fans the batch out: one email lookup plus one publish per
// subscription. Failures are logged with the owning subscription's
// identity and tolerated; the pass succeeds when every item was
// attempted.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use thiserror::Error;
use tracing::{info, warn};

use subhub_core::error::{Result, SubHubError};
use subhub_core::fanout::{run_batch, split_failures, FanoutConfig};
use subhub_core::subscription::ExpiringSubscription;
use subhub_core::traits::{ContactDirectory, ExpiringSubscriptionSource, Notifier};

use crate::config::AlerterConfig;
use crate::notice::renewal_notice;

/// A single alert that could not be delivered, carrying the owning
/// subscription's identity
#[derive(Debug, Error)]
#[error("alert for {username}'s {vendor} subscription failed: {source}")]
pub struct DispatchError {
    pub username: String,
    pub vendor: String,
    #[source]
    pub source: SubHubError,
}

/// Counts for one dispatch pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Subscriptions matched by the scan
    pub attempted: usize,
    /// Notices that reached the notifier
    pub delivered: usize,
    /// Alerts that failed lookup or publish
    pub failed: usize,
}

/// Dispatch renewal alerts for every subscription whose remind-on date
/// is exactly `remind_date`. Individual failures never abort the batch.
pub async fn send_renewal_alerts<S>(
    source: &S,
    directory: Arc<dyn ContactDirectory>,
    notifier: Arc<dyn Notifier>,
    config: &FanoutConfig,
    remind_date: NaiveDate,
) -> Result<DispatchSummary>
where
    S: ExpiringSubscriptionSource + ?Sized,
{
    let expiring = source.expiring_on(remind_date).await?;
    let attempted = expiring.len();
    info!(on = %remind_date, batch = attempted, "dispatching renewal alerts");

    let outcomes = run_batch(config, expiring, move |sub: ExpiringSubscription| {
        let directory = Arc::clone(&directory);
        let notifier = Arc::clone(&notifier);
        async move {
            let email = directory
                .email_for(&sub.username)
                .await
                .map_err(|source| DispatchError {
                    username: sub.username.clone(),
                    vendor: sub.vendor_name.clone(),
                    source,
                })?;

            let notice = renewal_notice(&sub.username, &sub.vendor_name, email);
            notifier
                .publish(notice)
                .await
                .map_err(|source| DispatchError {
                    username: sub.username.clone(),
                    vendor: sub.vendor_name.clone(),
                    source,
                })?;

            Ok::<_, DispatchError>(sub)
        }
    })
    .await
    .into_outcomes();

    let (delivered, failures) = split_failures(outcomes);
    for failure in &failures {
        warn!(error = %failure.error, "renewal alert not delivered");
    }

    let summary = DispatchSummary {
        attempted,
        delivered: delivered.len(),
        failed: failures.len(),
    };
    info!(
        attempted = summary.attempted,
        delivered = summary.delivered,
        failed = summary.failed,
        "dispatch pass complete"
    );
    Ok(summary)
}

/// One full dispatch pass at the configured horizon (today plus
/// `horizon_days`)
pub async fn run_once<S>(
    source: &S,
    directory: Arc<dyn ContactDirectory>,
    notifier: Arc<dyn Notifier>,
    config: &AlerterConfig,
) -> Result<DispatchSummary>
where
    S: ExpiringSubscriptionSource + ?Sized,
{
    let remind_date = Utc::now().date_naive() + Duration::days(config.horizon_days());
    send_renewal_alerts(source, directory, notifier, &config.fanout(), remind_date).await
}
