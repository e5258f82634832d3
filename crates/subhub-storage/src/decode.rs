// Batch decoding of raw records
//
// A user listing comes back from the table as raw records; decoding them
// into typed views is fanned out across the worker pool. Decode errors
// are not tolerated the way dispatch errors are: one bad record discards
// the partial results and fails the whole listing.

use thiserror::Error;
use tracing::error;

use subhub_core::fanout::{require_all, run_batch, FanoutConfig};
use subhub_core::subscription::SubscriptionView;

use crate::record::{RawRecord, RecordError};
use crate::table::SubscriptionTable;

/// Errors producing a subscription listing
#[derive(Debug, Error)]
pub enum ListError {
    /// A record in the batch failed to decode; partial results are
    /// discarded
    #[error("record {index} failed to decode: {source}")]
    BadRecord {
        index: usize,
        #[source]
        source: RecordError,
    },
}

/// Decode a batch of raw records into listing views under the abort
/// policy: the first decode failure fails the batch.
pub async fn decode_batch(
    config: &FanoutConfig,
    records: Vec<RawRecord>,
) -> Result<Vec<SubscriptionView>, ListError> {
    let outcomes = run_batch(config, records, |record| async move {
        record.decode::<SubscriptionView>()
    })
    .await
    .into_outcomes();

    require_all(outcomes).map_err(|failure| {
        error!(index = failure.index, error = %failure.error, "failed to decode record");
        ListError::BadRecord {
            index: failure.index,
            source: failure.error,
        }
    })
}

/// List one user's subscriptions: query the table, then batch-decode
/// the raw records.
pub async fn list_user_subscriptions(
    table: &SubscriptionTable,
    config: &FanoutConfig,
    username: &str,
) -> Result<Vec<SubscriptionView>, ListError> {
    let records = table.query_user(username).await;
    decode_batch(config, records).await
}
