// Collaborator traits for pluggable backends
//
// These traits sit at the I/O seams of the batch call sites:
// - In-memory implementations for examples and testing
// - Key-value table / messaging implementations for production

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::subscription::{ExpiringSubscription, RenewalNotice};

/// Source of subscriptions due for a renewal reminder
///
/// Implementations can:
/// - Scan a key-value table by remind-on date equality
/// - Serve a fixed list from memory for testing
#[async_trait]
pub trait ExpiringSubscriptionSource: Send + Sync {
    /// Subscriptions whose remind-on date falls exactly on `date`
    async fn expiring_on(&self, date: NaiveDate) -> Result<Vec<ExpiringSubscription>>;
}

/// Lookup of a user's contact address
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Email address for `username`; a missing user is a
    /// [`SubHubError::NotFound`](crate::SubHubError::NotFound)
    async fn email_for(&self, username: &str) -> Result<String>;
}

/// Outbound message publisher
///
/// Implementations can:
/// - Publish to a messaging topic
/// - Collect notices in memory for testing
/// - Log and drop (no-op implementation)
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish a single renewal notice
    async fn publish(&self, notice: RenewalNotice) -> Result<()>;
}
