// In-memory subscription table
//
// Keyed by (username, id), storing raw records. Single-item operations
// are plain request/response plumbing; the batch call sites (listing
// decode, expiring-soon scan) are what the rest of the system is built
// around.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use subhub_core::error::{Result, SubHubError};
use subhub_core::subscription::{ExpiringSubscription, Subscription};
use subhub_core::traits::ExpiringSubscriptionSource;

use crate::record::RawRecord;

/// In-memory subscription table
#[derive(Debug, Default, Clone)]
pub struct SubscriptionTable {
    records: Arc<RwLock<HashMap<(String, Uuid), RawRecord>>>,
}

impl SubscriptionTable {
    /// Create a new, empty table
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add or replace a subscription
    pub async fn put(&self, subscription: &Subscription) -> Result<()> {
        let record = RawRecord::encode(subscription)
            .map_err(|e| SubHubError::store(format!("failed to encode subscription: {e}")))?;
        self.records.write().await.insert(
            (subscription.username.clone(), subscription.id),
            record,
        );
        Ok(())
    }

    /// Fetch and decode one subscription
    pub async fn get(&self, username: &str, id: Uuid) -> Result<Subscription> {
        let records = self.records.read().await;
        let record = records
            .get(&(username.to_string(), id))
            .ok_or_else(|| SubHubError::not_found(format!("subscription {id} for {username}")))?;
        record
            .decode()
            .map_err(|e| SubHubError::decode(e.to_string()))
    }

    /// Delete one subscription; deleting a missing record is an error
    pub async fn delete(&self, username: &str, id: Uuid) -> Result<()> {
        self.records
            .write()
            .await
            .remove(&(username.to_string(), id))
            .map(|_| ())
            .ok_or_else(|| SubHubError::not_found(format!("subscription {id} for {username}")))
    }

    /// Raw records for one user, undecoded. The listing path decodes
    /// them as a batch.
    pub async fn query_user(&self, username: &str) -> Vec<RawRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|((owner, _), _)| owner == username)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the table is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Insert a raw record directly, bypassing the typed encoder
    pub(crate) async fn put_raw(&self, username: impl Into<String>, id: Uuid, record: RawRecord) {
        self.records
            .write()
            .await
            .insert((username.into(), id), record);
    }
}

#[async_trait]
impl ExpiringSubscriptionSource for SubscriptionTable {
    async fn expiring_on(&self, date: NaiveDate) -> Result<Vec<ExpiringSubscription>> {
        let wanted = Value::String(date.to_string());
        let records = self.records.read().await;

        // Attribute-level filter, like a projected scan: unrelated
        // attributes never have to decode for a record to match.
        let expiring: Vec<ExpiringSubscription> = records
            .values()
            .filter(|record| record.get("remind_on") == Some(&wanted))
            .filter_map(|record| {
                match (record.get("username"), record.get("vendor_name")) {
                    (Some(Value::String(username)), Some(Value::String(vendor_name))) => {
                        Some(ExpiringSubscription {
                            username: username.clone(),
                            vendor_name: vendor_name.clone(),
                        })
                    }
                    _ => None,
                }
            })
            .collect();

        debug!(on = %date, matched = expiring.len(), "scanned for expiring subscriptions");
        Ok(expiring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subscription(username: &str, vendor: &str, remind_on: NaiveDate) -> Subscription {
        Subscription::new(username, vendor, "https://example.com", date(2026, 1, 1))
            .with_remind_on(remind_on)
    }

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let table = SubscriptionTable::new();
        let sub = subscription("ana", "Netflix", date(2026, 9, 1));

        table.put(&sub).await.unwrap();
        assert_eq!(table.get("ana", sub.id).await.unwrap(), sub);

        table.delete("ana", sub.id).await.unwrap();
        assert!(matches!(
            table.get("ana", sub.id).await,
            Err(SubHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleting_a_missing_record_is_not_found() {
        let table = SubscriptionTable::new();
        assert!(matches!(
            table.delete("ana", Uuid::new_v4()).await,
            Err(SubHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn query_user_only_returns_that_users_records() {
        let table = SubscriptionTable::new();
        table
            .put(&subscription("ana", "Netflix", date(2026, 9, 1)))
            .await
            .unwrap();
        table
            .put(&subscription("ana", "Spotify", date(2026, 9, 2)))
            .await
            .unwrap();
        table
            .put(&subscription("bob", "Hulu", date(2026, 9, 1)))
            .await
            .unwrap();

        assert_eq!(table.query_user("ana").await.len(), 2);
        assert_eq!(table.query_user("bob").await.len(), 1);
        assert!(table.query_user("carol").await.is_empty());
    }

    #[tokio::test]
    async fn expiring_scan_matches_on_date_equality_only() {
        let table = SubscriptionTable::new();
        let tomorrow = date(2026, 8, 8);
        table
            .put(&subscription("ana", "Netflix", tomorrow))
            .await
            .unwrap();
        table
            .put(&subscription("bob", "Hulu", tomorrow))
            .await
            .unwrap();
        table
            .put(&subscription("carol", "Spotify", date(2026, 8, 9)))
            .await
            .unwrap();

        let mut expiring = table.expiring_on(tomorrow).await.unwrap();
        expiring.sort_by(|a, b| a.username.cmp(&b.username));

        assert_eq!(
            expiring,
            vec![
                ExpiringSubscription {
                    username: "ana".to_string(),
                    vendor_name: "Netflix".to_string(),
                },
                ExpiringSubscription {
                    username: "bob".to_string(),
                    vendor_name: "Hulu".to_string(),
                },
            ]
        );
    }
}
