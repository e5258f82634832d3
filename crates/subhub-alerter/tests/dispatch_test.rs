// Integration tests for renewal alert dispatch
//
// These tests drive the full dispatch path (scan -> fan-out -> lookup ->
// publish) against the in-memory table, directory, and notifier, and
// verify the tolerate policy: one subscription's failure never touches
// the others.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use subhub_alerter::dispatch::{send_renewal_alerts, DispatchSummary};
use subhub_core::fanout::FanoutConfig;
use subhub_core::memory::{CollectingNotifier, InMemoryDirectory};
use subhub_core::subscription::Subscription;
use subhub_storage::SubscriptionTable;

fn tomorrow() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 8).unwrap()
}

fn subscription(username: &str, vendor: &str, remind_on: NaiveDate) -> Subscription {
    Subscription::new(
        username,
        vendor,
        "https://example.com",
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
    )
    .with_remind_on(remind_on)
}

async fn seeded_table() -> SubscriptionTable {
    let table = SubscriptionTable::new();
    for (user, vendor) in [("ana", "Netflix"), ("bob", "Hulu"), ("carol", "Spotify")] {
        table
            .put(&subscription(user, vendor, tomorrow()))
            .await
            .unwrap();
    }
    // Not due tomorrow; must never be alerted.
    table
        .put(&subscription(
            "dave",
            "Disney+",
            NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
        ))
        .await
        .unwrap();
    table
}

async fn full_directory() -> InMemoryDirectory {
    let directory = InMemoryDirectory::new();
    for user in ["ana", "bob", "carol", "dave"] {
        directory.insert(user, format!("{user}@example.com")).await;
    }
    directory
}

#[tokio::test]
async fn every_expiring_subscription_gets_a_notice() {
    let table = seeded_table().await;
    let notifier = CollectingNotifier::new();

    let summary = send_renewal_alerts(
        &table,
        Arc::new(full_directory().await),
        Arc::new(notifier.clone()),
        &FanoutConfig::default(),
        tomorrow(),
    )
    .await
    .unwrap();

    assert_eq!(
        summary,
        DispatchSummary {
            attempted: 3,
            delivered: 3,
            failed: 0,
        }
    );

    let recipients: BTreeSet<String> = notifier
        .published()
        .await
        .into_iter()
        .map(|n| n.recipient)
        .collect();
    assert_eq!(
        recipients,
        BTreeSet::from([
            "ana@example.com".to_string(),
            "bob@example.com".to_string(),
            "carol@example.com".to_string(),
        ])
    );
}

#[tokio::test]
async fn missing_contact_is_tolerated_and_the_rest_deliver() {
    let table = seeded_table().await;
    let directory = full_directory().await;
    directory.remove("bob").await;
    let notifier = CollectingNotifier::new();

    let summary = send_renewal_alerts(
        &table,
        Arc::new(directory),
        Arc::new(notifier.clone()),
        &FanoutConfig::default(),
        tomorrow(),
    )
    .await
    .unwrap();

    assert_eq!(
        summary,
        DispatchSummary {
            attempted: 3,
            delivered: 2,
            failed: 1,
        }
    );

    let recipients: BTreeSet<String> = notifier
        .published()
        .await
        .into_iter()
        .map(|n| n.recipient)
        .collect();
    assert_eq!(
        recipients,
        BTreeSet::from(["ana@example.com".to_string(), "carol@example.com".to_string()])
    );
}

#[tokio::test]
async fn failing_publish_is_tolerated_and_the_rest_deliver() {
    let table = seeded_table().await;
    let notifier = CollectingNotifier::new();
    notifier.fail_for("carol@example.com").await;

    let summary = send_renewal_alerts(
        &table,
        Arc::new(full_directory().await),
        Arc::new(notifier.clone()),
        &FanoutConfig::default(),
        tomorrow(),
    )
    .await
    .unwrap();

    assert_eq!(
        summary,
        DispatchSummary {
            attempted: 3,
            delivered: 2,
            failed: 1,
        }
    );
    assert_eq!(notifier.count().await, 2);
}

#[tokio::test]
async fn a_quiet_day_dispatches_nothing() {
    let table = seeded_table().await;
    let notifier = CollectingNotifier::new();

    let summary = send_renewal_alerts(
        &table,
        Arc::new(full_directory().await),
        Arc::new(notifier.clone()),
        &FanoutConfig::default(),
        NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(summary, DispatchSummary::default());
    assert_eq!(notifier.count().await, 0);
}

#[tokio::test]
async fn dispatch_outcome_is_independent_of_worker_count() {
    for workers in [1, 10] {
        let table = seeded_table().await;
        let directory = full_directory().await;
        directory.remove("bob").await;
        let notifier = CollectingNotifier::new();

        let summary = send_renewal_alerts(
            &table,
            Arc::new(directory),
            Arc::new(notifier.clone()),
            &FanoutConfig::new().with_workers(workers),
            tomorrow(),
        )
        .await
        .unwrap();

        assert_eq!(
            summary,
            DispatchSummary {
                attempted: 3,
                delivered: 2,
                failed: 1,
            }
        );
    }
}
