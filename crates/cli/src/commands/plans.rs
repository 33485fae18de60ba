use orientnet_core::pricing::money;
use serde_json::{json, Value};

use crate::commands::{load_runtime, CommandResult};

pub fn run() -> CommandResult {
    let (_, catalog) = match load_runtime("plans") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let plans: Vec<Value> = catalog
        .plans()
        .iter()
        .map(|plan| {
            json!({
                "slug": plan.slug,
                "name": plan.name,
                "monthly": money::format_local(plan.price_all),
                "downMbps": plan.down_mbps,
                "upMbps": plan.up_mbps,
            })
        })
        .collect();

    CommandResult::success_with_data(
        "plans",
        format!("{} plans in catalog", catalog.len()),
        Some(json!({ "plans": plans, "included": catalog.included() })),
    )
}
