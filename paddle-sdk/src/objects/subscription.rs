//! Subscription user, payment and plan-change types.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a user subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionState {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "past due", alias = "past_due")]
    PastDue,
    #[serde(rename = "trialling", alias = "trialing")]
    Trialing,
    #[serde(rename = "paused")]
    Paused,
    #[serde(rename = "deleted")]
    Deleted,
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionState::Active => write!(f, "active"),
            SubscriptionState::PastDue => write!(f, "past due"),
            SubscriptionState::Trialing => write!(f, "trialling"),
            SubscriptionState::Paused => write!(f, "paused"),
            SubscriptionState::Deleted => write!(f, "deleted"),
        }
    }
}

/// Filter for `POST /subscription/users`.
///
/// Without a `state`, active, past due, trialling and paused subscriptions
/// are returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanUsersFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<SubscriptionState>,
}

/// Page selection for list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_per_page: Option<u32>,
}

/// Request body of `POST /subscription/users`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ListPlanUsers<'a> {
    #[serde(flatten)]
    pub filter: &'a PlanUsersFilter,
    #[serde(flatten)]
    pub pagination: &'a Pagination,
}

/// Filter for `POST /subscription/payments`.
///
/// Dates use the `YYYY-MM-DD` format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanPaymentsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<u64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_flag"
    )]
    pub is_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_one_off_charge: Option<bool>,
}

/// The payments endpoint expects `0`/`1` rather than a boolean.
fn serialize_flag<S: serde::Serializer>(value: &Option<bool>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(flag) => s.serialize_u8(u8::from(*flag)),
        None => s.serialize_none(),
    }
}

/// Request body of `POST /subscription/users/update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateSubscriptionPlan {
    pub subscription_id: u64,
    pub plan_id: u64,
    pub prorate: bool,
}

/// Request body of `POST /subscription/users_cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CancelSubscription {
    pub subscription_id: u64,
}
