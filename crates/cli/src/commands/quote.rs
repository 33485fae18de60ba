use orientnet_core::checkout::find_plan;
use orientnet_core::domain::order::SubscriptionTerm;
use orientnet_core::domain::plan::PlanSlug;
use orientnet_core::errors::DomainError;
use orientnet_core::pricing::{money, DeterministicPricingEngine, PricingEngine};
use serde_json::json;

use crate::commands::{load_runtime, CommandResult, EXIT_CONFIG, EXIT_NOT_FOUND};

pub fn run(plan: &str, months: u32) -> CommandResult {
    let (config, catalog) = match load_runtime("quote") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = SubscriptionTerm::new(months).and_then(|term| {
        let plan = find_plan(&catalog, &PlanSlug::from(plan))?;
        let engine = DeterministicPricingEngine::new(
            config.pricing.exchange_rate,
            config.pricing.foreign_currency.clone(),
        );
        Ok((plan, term, engine.price(plan, term)?))
    });

    match result {
        Ok((plan, term, pricing)) => CommandResult::success_with_data(
            "quote",
            format!(
                "{} x {} muaj = {} ({})",
                plan.name,
                term,
                money::format_local(pricing.total_local),
                money::format_foreign(pricing.total_foreign, &pricing.foreign_currency)
            ),
            Some(json!({
                "planSlug": plan.slug,
                "months": term.months(),
                "offeredTerm": term.is_offered(),
                "totalLocal": pricing.total_local,
                "totalForeign": pricing.total_foreign,
                "exchangeRate": pricing.exchange_rate,
                "foreignCurrency": pricing.foreign_currency,
            })),
        ),
        Err(DomainError::PlanNotFound(slug)) => CommandResult::failure(
            "quote",
            "not_found",
            format!("plan `{slug}` was not found in the catalog"),
            EXIT_NOT_FOUND,
        ),
        Err(error @ DomainError::InvariantViolation(_)) => {
            CommandResult::failure("quote", "validation", error.to_string(), EXIT_CONFIG)
        }
        Err(error @ DomainError::Pricing(_)) => {
            CommandResult::failure("quote", "pricing", error.to_string(), EXIT_CONFIG)
        }
    }
}
