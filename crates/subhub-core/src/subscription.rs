// Subscription domain entities
//
// These are store-agnostic entity types shared by the storage layer and
// the alerter. The raw/stored representation lives in subhub-storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category a tracked subscription belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionCategory {
    Ott,
    Music,
    Gaming,
    Delivery,
    Fitness,
    Education,
    Magazine,
    Software,
    Finance,
    Fashion,
    Other,
}

impl Default for SubscriptionCategory {
    fn default() -> Self {
        SubscriptionCategory::Other
    }
}

/// A tracked subscription, keyed by (username, id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Owner of the subscription
    pub username: String,
    /// Unique id within the owner's subscriptions
    pub id: Uuid,
    /// Vendor name (e.g. "Netflix")
    pub vendor_name: String,
    /// Vendor site
    pub vendor_url: String,
    /// Plan name (e.g. "Premium")
    pub plan: String,
    /// Billing period (e.g. "monthly")
    pub duration: String,
    #[serde(default)]
    pub category: SubscriptionCategory,
    /// Cost per billing period
    pub cost: f32,
    /// Date the subscription started
    pub started_on: NaiveDate,
    /// Date of the most recent payment
    pub last_payment_on: NaiveDate,
    /// Date the owner wants to be reminded of the upcoming renewal
    pub remind_on: NaiveDate,
}

impl Subscription {
    /// Create a subscription with a fresh id. Dates default to
    /// `started_on`; adjust with the builder methods.
    pub fn new(
        username: impl Into<String>,
        vendor_name: impl Into<String>,
        vendor_url: impl Into<String>,
        started_on: NaiveDate,
    ) -> Self {
        Self {
            username: username.into(),
            id: Uuid::new_v4(),
            vendor_name: vendor_name.into(),
            vendor_url: vendor_url.into(),
            plan: String::new(),
            duration: "monthly".to_string(),
            category: SubscriptionCategory::default(),
            cost: 0.0,
            started_on,
            last_payment_on: started_on,
            remind_on: started_on,
        }
    }

    /// Set the plan name
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = plan.into();
        self
    }

    /// Set the billing period
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: SubscriptionCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the cost per billing period
    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    /// Set the reminder date
    pub fn with_remind_on(mut self, remind_on: NaiveDate) -> Self {
        self.remind_on = remind_on;
        self
    }

    /// Set the most recent payment date
    pub fn with_last_payment_on(mut self, last_payment_on: NaiveDate) -> Self {
        self.last_payment_on = last_payment_on;
        self
    }
}

/// A subscription due for a renewal reminder, as produced by the
/// expiring-soon scan. Input item of the dispatch batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringSubscription {
    pub username: String,
    pub vendor_name: String,
}

/// The decoded listing entry returned to a user. Output item of the
/// decode batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub id: Uuid,
    pub vendor_name: String,
    pub vendor_url: String,
    pub duration: String,
}

/// An outbound renewal reminder, addressed and ready to publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalNotice {
    /// Recipient email address
    pub recipient: String,
    pub subject: String,
    pub body: String,
}
