// Alerter configuration
// Decision: Environment variables with per-field defaults; missing values
// never fail startup

use subhub_core::fanout::{FanoutConfig, DEFAULT_WORKER_COUNT};

/// Configuration for the alerter batch job
#[derive(Debug, Clone, Default)]
pub struct AlerterConfig {
    /// Number of concurrent dispatch workers
    pub workers: Option<usize>,
    /// How many days ahead of the remind-on date the scan looks
    pub horizon_days: Option<i64>,
    /// Seed file with subscriptions (JSON array)
    pub subscriptions_file: Option<String>,
    /// Seed file with user contacts (JSON array)
    pub contacts_file: Option<String>,
}

impl AlerterConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            workers: std::env::var("SUBHUB_ALERT_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok()),
            horizon_days: std::env::var("SUBHUB_REMIND_HORIZON_DAYS")
                .ok()
                .and_then(|v| v.parse().ok()),
            subscriptions_file: std::env::var("SUBHUB_SUBSCRIPTIONS_FILE").ok(),
            contacts_file: std::env::var("SUBHUB_CONTACTS_FILE").ok(),
        }
    }

    /// Get the worker count with default
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKER_COUNT)
    }

    /// Get the remind horizon with default (one day out)
    pub fn horizon_days(&self) -> i64 {
        self.horizon_days.unwrap_or(1)
    }

    /// Fan-out configuration for the dispatch batch
    pub fn fanout(&self) -> FanoutConfig {
        FanoutConfig::new().with_workers(self.workers())
    }
}
