//! Checkout hand-off: order summaries, the WhatsApp message sent to the
//! office, and the payment gateway seam used for PayPal.

pub mod whatsapp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::domain::order::{CustomerDetails, OrderRequest, OrderType, SubscriptionTerm};
use crate::domain::plan::{Plan, PlanSlug};
use crate::errors::DomainError;
use crate::pricing::{money, PricingEngine, PricingResult};

pub const BRAND_NAME: &str = "Orient Net";
pub const CAPTURE_PATH: &str = "/api/paypal/capture-order";
pub const SUCCESS_PATH: &str = "/checkout/success";
pub const CANCEL_PATH: &str = "/checkout/cancel";

/// Server-side view of an order: catalog plan, recomputed totals and the
/// customer as submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub plan_slug: PlanSlug,
    pub plan_name: String,
    pub order_type: OrderType,
    pub term: SubscriptionTerm,
    pub customer: CustomerDetails,
    pub pricing: PricingResult,
}

impl OrderSummary {
    pub fn prepare(
        catalog: &Catalog,
        engine: &dyn PricingEngine,
        request: &OrderRequest,
    ) -> Result<Self, DomainError> {
        let term = request.validate()?;
        let plan = find_plan(catalog, &request.plan_slug)?;
        let pricing = engine.price(plan, term)?;

        Ok(Self {
            plan_slug: plan.slug.clone(),
            plan_name: plan.name.clone(),
            order_type: request.order_type,
            term,
            customer: request.customer.clone(),
            pricing,
        })
    }

    pub fn total_local_display(&self) -> String {
        money::format_local(self.pricing.total_local)
    }

    pub fn total_foreign_display(&self) -> String {
        money::format_foreign(self.pricing.total_foreign, &self.pricing.foreign_currency)
    }
}

pub fn find_plan<'a>(catalog: &'a Catalog, slug: &PlanSlug) -> Result<&'a Plan, DomainError> {
    catalog.find(slug).ok_or_else(|| DomainError::PlanNotFound(slug.clone()))
}

/// Order sent to the payment provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub description: String,
    pub currency_code: String,
    /// Two-decimal amount string, e.g. `"39.00"`.
    pub value: String,
    pub return_url: String,
    pub cancel_url: String,
}

impl PaymentOrder {
    pub fn new(
        plan_name: &str,
        term: SubscriptionTerm,
        pricing: &PricingResult,
        charge_currency: &str,
        public_base_url: &str,
    ) -> Self {
        let origin = public_base_url.trim_end_matches('/');
        Self {
            description: format!("{BRAND_NAME} - {plan_name} ({} muaj)", term.months()),
            currency_code: charge_currency.to_string(),
            value: money::to_paypal_value(pricing.total_foreign),
            return_url: format!("{origin}{CAPTURE_PATH}"),
            cancel_url: format!("{origin}{CANCEL_PATH}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPayment {
    pub id: String,
    pub approval_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPayment {
    pub id: String,
    pub status: String,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PaymentError {
    #[error("payments are disabled")]
    Disabled,
    #[error("payment provider authentication failed: {0}")]
    Authentication(String),
    #[error("payment provider rejected the request with status {status}")]
    Rejected { status: u16, body: serde_json::Value },
    #[error("payment provider request failed: {0}")]
    Transport(String),
    #[error("payment provider returned an unexpected response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: &PaymentOrder) -> Result<CreatedPayment, PaymentError>;

    async fn capture_order(&self, order_id: &str) -> Result<CapturedPayment, PaymentError>;
}
