//! Subscription endpoints.

use serde_json::Value;

use super::{BodyEncoding, ClientError, PaddleClient};
use crate::objects::subscription::{
    CancelSubscription, ListPlanUsers, Pagination, PlanPaymentsFilter, PlanUsersFilter,
    UpdateSubscriptionPlan,
};

impl PaddleClient {
    /// `POST /subscription/users`: list the users subscribed to plans.
    pub async fn get_plan_users(
        &self,
        filter: &PlanUsersFilter,
        pagination: &Pagination,
    ) -> Result<Value, ClientError> {
        let body = ListPlanUsers { filter, pagination };
        self.request("/subscription/users", &body, BodyEncoding::Form)
            .await
    }

    /// `POST /subscription/payments`: list subscription payments.
    pub async fn get_plan_payments(
        &self,
        filter: &PlanPaymentsFilter,
    ) -> Result<Value, ClientError> {
        self.request("/subscription/payments", filter, BodyEncoding::Form)
            .await
    }

    /// `POST /subscription/users/update`: move a subscription to another
    /// plan (upgrade or downgrade).
    pub async fn update_subscription_plan(
        &self,
        subscription_id: u64,
        plan_id: u64,
        prorate: bool,
    ) -> Result<Value, ClientError> {
        let body = UpdateSubscriptionPlan {
            subscription_id,
            plan_id,
            prorate,
        };
        self.request("/subscription/users/update", &body, BodyEncoding::Form)
            .await
    }

    /// `POST /subscription/users_cancel`: cancel an active subscription.
    pub async fn cancel_subscription(&self, subscription_id: u64) -> Result<Value, ClientError> {
        self.request(
            "/subscription/users_cancel",
            &CancelSubscription { subscription_id },
            BodyEncoding::Form,
        )
        .await
    }
}
