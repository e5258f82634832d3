// SubHub Core Abstractions
//
// This crate provides the batch-processing engine and the shared domain
// types for the SubHub subscription tracker.
//
// Key design decisions:
// - The fan-out engine (fanout) is generic over item/value/error types and
//   exposes every per-item error; aggregation policy belongs to the caller
// - Collaborator seams are traits (ExpiringSubscriptionSource,
//   ContactDirectory, Notifier) for pluggable backends
// - In-memory implementations live here for examples and testing
// - Domain entities (Subscription, RenewalNotice, etc.) are defined here
//   for shared use by the storage layer and the alerter

pub mod error;
pub mod fanout;
pub mod subscription;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use error::{Result, SubHubError};
pub use fanout::{
    require_all, run_batch, run_batch_with_cancel, split_failures, BatchOutcome, FanoutConfig,
    ItemFailure, ItemOutcome, DEFAULT_WORKER_COUNT,
};
pub use subscription::{
    ExpiringSubscription, RenewalNotice, Subscription, SubscriptionCategory, SubscriptionView,
};
pub use memory::{CollectingNotifier, InMemoryDirectory, LoggingNotifier};
pub use traits::{ContactDirectory, ExpiringSubscriptionSource, Notifier};
