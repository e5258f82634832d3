// SubHub Storage Layer
//
// Raw record representation, the in-memory subscription table, and the
// batch-decode path that turns a user's raw records into listing views.
//
// Key design decisions:
// - Records are stored schema-less and decoded on read; the listing path
//   fans the decode out across the worker pool and aborts on the first
//   bad record
// - The table implements the core ExpiringSubscriptionSource trait so the
//   alerter never sees storage internals

pub mod decode;
pub mod record;
pub mod table;

// Re-exports for convenience
pub use decode::{decode_batch, list_user_subscriptions, ListError};
pub use record::{RawRecord, RecordError};
pub use table::SubscriptionTable;
