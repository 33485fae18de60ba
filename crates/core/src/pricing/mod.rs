//! Subscription totals in lek and their conversion to the payment currency.
//!
//! Conversion rounds half away from zero to two decimals
//! (`0.125 -> 0.13`, `-0.125 -> -0.13`).

pub mod money;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::order::SubscriptionTerm;
use crate::domain::plan::{Plan, PlanSlug};

pub const FOREIGN_DECIMALS: u32 = 2;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid configuration: exchange rate must be greater than zero, got {exchange_rate}")]
    InvalidConfiguration { exchange_rate: Decimal },
    #[error("total overflows for {monthly_price_local} over {duration_months} months")]
    TotalOverflow { monthly_price_local: Decimal, duration_months: u32 },
    #[error("converted amount overflows for total {total_local} at rate {exchange_rate}")]
    Overflow { total_local: Decimal, exchange_rate: Decimal },
}

/// `monthly_price_local * duration_months`, unrounded.
pub fn compute_total(
    monthly_price_local: Decimal,
    duration_months: u32,
) -> Result<Decimal, PricingError> {
    monthly_price_local
        .checked_mul(Decimal::from(duration_months))
        .ok_or(PricingError::TotalOverflow { monthly_price_local, duration_months })
}

/// Converts a lek amount using `exchange_rate` lek per foreign unit.
pub fn convert(total_local: Decimal, exchange_rate: Decimal) -> Result<Decimal, PricingError> {
    if exchange_rate <= Decimal::ZERO {
        return Err(PricingError::InvalidConfiguration { exchange_rate });
    }

    let converted = total_local
        .checked_div(exchange_rate)
        .ok_or(PricingError::Overflow { total_local, exchange_rate })?;
    Ok(round_foreign(converted))
}

pub fn round_foreign(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(FOREIGN_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTrace {
    pub plan: PlanSlug,
    pub currency: String,
    pub steps: Vec<PricingTraceStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub monthly_local: Decimal,
    pub months: u32,
    pub total_local: Decimal,
    pub total_foreign: Decimal,
    pub exchange_rate: Decimal,
    pub foreign_currency: String,
    pub trace: PricingTrace,
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, plan: &Plan, term: SubscriptionTerm) -> Result<PricingResult, PricingError>;
}

#[derive(Clone, Debug)]
pub struct DeterministicPricingEngine {
    exchange_rate: Decimal,
    foreign_currency: String,
}

impl DeterministicPricingEngine {
    pub fn new(exchange_rate: Decimal, foreign_currency: impl Into<String>) -> Self {
        Self { exchange_rate, foreign_currency: foreign_currency.into() }
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }

    pub fn foreign_currency(&self) -> &str {
        &self.foreign_currency
    }
}

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, plan: &Plan, term: SubscriptionTerm) -> Result<PricingResult, PricingError> {
        price_plan(plan, term, self.exchange_rate, &self.foreign_currency)
    }
}

pub fn price_plan(
    plan: &Plan,
    term: SubscriptionTerm,
    exchange_rate: Decimal,
    foreign_currency: &str,
) -> Result<PricingResult, PricingError> {
    let total_local = compute_total(plan.price_all, term.months())?;
    let total_foreign = convert(total_local, exchange_rate)?;

    Ok(PricingResult {
        monthly_local: plan.price_all,
        months: term.months(),
        total_local,
        total_foreign,
        exchange_rate,
        foreign_currency: foreign_currency.to_string(),
        trace: PricingTrace {
            plan: plan.slug.clone(),
            currency: foreign_currency.to_string(),
            steps: vec![
                PricingTraceStep {
                    stage: "total_local".to_string(),
                    detail: format!("price_all * {} months", term.months()),
                    amount: total_local,
                },
                PricingTraceStep {
                    stage: "total_foreign".to_string(),
                    detail: format!(
                        "round_half_away_from_zero(total_local / {exchange_rate}, {FOREIGN_DECIMALS})"
                    ),
                    amount: total_foreign,
                },
            ],
        },
    })
}
