// In-memory implementations for examples and testing
//
// These implementations keep all data in memory, making them perfect for:
// - Standalone runs that don't need real messaging or a real table
// - Unit tests
// - Quick prototyping

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, SubHubError};
use crate::subscription::RenewalNotice;
use crate::traits::{ContactDirectory, Notifier};

// ============================================================================
// InMemoryDirectory - username -> email lookups from a HashMap
// ============================================================================

/// In-memory contact directory
///
/// Stores email addresses in a HashMap keyed by username.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryDirectory {
    /// Create a new, empty directory
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a user's email address
    pub async fn insert(&self, username: impl Into<String>, email: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(username.into(), email.into());
    }

    /// Remove a user
    pub async fn remove(&self, username: &str) {
        self.entries.write().await.remove(username);
    }
}

#[async_trait]
impl ContactDirectory for InMemoryDirectory {
    async fn email_for(&self, username: &str) -> Result<String> {
        self.entries
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| SubHubError::not_found(format!("no contact for user {username}")))
    }
}

// ============================================================================
// CollectingNotifier - records published notices in memory
// ============================================================================

/// Notifier that collects published notices in memory
///
/// Can be told to fail for chosen recipients, which makes it easy to
/// exercise the tolerate policy in tests.
#[derive(Debug, Default, Clone)]
pub struct CollectingNotifier {
    published: Arc<RwLock<Vec<RenewalNotice>>>,
    failing: Arc<RwLock<HashSet<String>>>,
}

impl CollectingNotifier {
    /// Create a new notifier with no recorded notices
    pub fn new() -> Self {
        Self {
            published: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Make every publish to `recipient` fail
    pub async fn fail_for(&self, recipient: impl Into<String>) {
        self.failing.write().await.insert(recipient.into());
    }

    /// Notices published so far
    pub async fn published(&self) -> Vec<RenewalNotice> {
        self.published.read().await.clone()
    }

    /// Number of notices published so far
    pub async fn count(&self) -> usize {
        self.published.read().await.len()
    }
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn publish(&self, notice: RenewalNotice) -> Result<()> {
        if self.failing.read().await.contains(&notice.recipient) {
            return Err(SubHubError::publish(format!(
                "endpoint rejected message for {}",
                notice.recipient
            )));
        }
        self.published.write().await.push(notice);
        Ok(())
    }
}

// ============================================================================
// LoggingNotifier - logs notices instead of publishing them
// ============================================================================

/// Notifier that logs each notice and drops it
///
/// Useful for standalone runs without a real messaging backend.
#[derive(Debug, Default, Clone)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    /// Create a new logging notifier
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn publish(&self, notice: RenewalNotice) -> Result<()> {
        tracing::info!(
            recipient = %notice.recipient,
            subject = %notice.subject,
            "renewal notice published"
        );
        Ok(())
    }
}
