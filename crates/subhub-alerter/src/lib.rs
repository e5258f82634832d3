// SubHub Alerter
//
// The renewal alert batch job: scan subscriptions whose remind-on date
// is one day out (configurable), look up each owner's email, and publish
// a renewal notice per subscription through the fan-out pool. A failed
// lookup or publish is logged and tolerated; the pass is done when every
// matched subscription was attempted.

pub mod config;
pub mod dispatch;
pub mod notice;

// Re-exports for convenience
pub use config::AlerterConfig;
pub use dispatch::{run_once, send_renewal_alerts, DispatchError, DispatchSummary};
pub use notice::renewal_notice;
