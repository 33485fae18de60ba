use orientnet_core::recommend::{DeviceFlags, Questionnaire, Recommender, ScoreTableRecommender};
use serde_json::json;

use crate::commands::{load_runtime, CommandResult};

pub fn run(household: Option<&str>, devices: DeviceFlags) -> CommandResult {
    let (_, catalog) = match load_runtime("recommend") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let questionnaire = Questionnaire::new(household.unwrap_or_default(), devices);
    let recommendation = ScoreTableRecommender.evaluate(&questionnaire);

    let Some(plan) = catalog.find_scored(recommendation.plan) else {
        return CommandResult::failure(
            "recommend",
            "catalog",
            format!("recommended plan `{}` is missing from the catalog", recommendation.plan),
            crate::commands::EXIT_CONFIG,
        );
    };

    CommandResult::success_with_data(
        "recommend",
        format!("recommended {} ({})", plan.name, plan.slug),
        Some(json!({
            "slug": plan.slug,
            "name": plan.name,
            "scores": recommendation.scores,
            "overridden": recommendation.overridden,
        })),
    )
}
