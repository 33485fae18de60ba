use orientnet_core::catalog::Catalog;
use orientnet_core::config::{AppConfig, LoadOptions};
use orientnet_core::domain::order::SubscriptionTerm;
use orientnet_core::pricing::{money, DeterministicPricingEngine, PricingEngine};
use orientnet_core::recommend::ScoredPlan;
use serde::Serialize;

use crate::commands::{CommandResult, EXIT_CONFIG};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_CONFIG };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match Catalog::load(config.catalog.path.as_deref()) {
                Ok(catalog) => {
                    checks.push(DoctorCheck {
                        name: "catalog_load",
                        status: CheckStatus::Pass,
                        details: format!("{} plans loaded", catalog.len()),
                    });
                    checks.push(check_exchange_rate(&config, &catalog));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "catalog_load",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped("exchange_rate", "catalog did not load"));
                }
            }
            checks.push(check_paypal(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["catalog_load", "exchange_rate", "paypal_readiness"] {
                checks.push(skipped(name, "configuration did not load"));
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
}

/// Prices the baseline plan for one month end to end.
fn check_exchange_rate(config: &AppConfig, catalog: &Catalog) -> DoctorCheck {
    let engine = DeterministicPricingEngine::new(
        config.pricing.exchange_rate,
        config.pricing.foreign_currency.clone(),
    );
    let priced = SubscriptionTerm::new(1)
        .map_err(|error| error.to_string())
        .and_then(|term| {
            let plan = catalog
                .find_scored(ScoredPlan::Smart)
                .ok_or_else(|| "catalog has no smart plan".to_string())?;
            engine.price(plan, term).map_err(|error| error.to_string())
        });

    match priced {
        Ok(pricing) => DoctorCheck {
            name: "exchange_rate",
            status: CheckStatus::Pass,
            details: format!(
                "rate {} L/{}: {} = {}",
                config.pricing.exchange_rate,
                config.pricing.foreign_currency,
                money::format_local(pricing.total_local),
                money::format_foreign(pricing.total_foreign, &pricing.foreign_currency)
            ),
        },
        Err(details) => DoctorCheck { name: "exchange_rate", status: CheckStatus::Fail, details },
    }
}

fn check_paypal(config: &AppConfig) -> DoctorCheck {
    let paypal = &config.paypal;
    if !paypal.enabled {
        return DoctorCheck {
            name: "paypal_readiness",
            status: CheckStatus::Pass,
            details: "paypal disabled; orders go through WhatsApp only".to_string(),
        };
    }

    if paypal.has_credentials() {
        DoctorCheck {
            name: "paypal_readiness",
            status: CheckStatus::Pass,
            details: format!("credentials present for {:?} at {}", paypal.environment, paypal.base_url()),
        }
    } else {
        DoctorCheck {
            name: "paypal_readiness",
            status: CheckStatus::Fail,
            details: "paypal enabled without client id and secret".to_string(),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
