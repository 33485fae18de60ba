pub mod commands;

use clap::{Parser, Subcommand};
use orientnet_core::recommend::DeviceFlags;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "orientnet",
    about = "Orient Net operator CLI",
    long_about = "Recommend plans, price subscriptions, and inspect the Orient Net service configuration.",
    after_help = "Examples:\n  orientnet recommend --household 4-7 --gaming\n  orientnet quote --plan smart --months 12\n  orientnet doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Recommend a plan from household size and connected devices")]
    Recommend {
        #[arg(long, help = "Household bracket: 1-3, 4-7, 8+, premium or biznes")]
        household: Option<String>,
        #[arg(long, help = "PlayStation / Xbox in the home")]
        gaming: bool,
        #[arg(long = "tv-pc", help = "TV and PC streaming")]
        tv_pc: bool,
        #[arg(long, help = "Cameras and other connected devices")]
        camera: bool,
    },
    #[command(about = "Price a plan for a number of months")]
    Quote {
        #[arg(long, help = "Plan slug, e.g. smart")]
        plan: String,
        #[arg(long, default_value_t = 1, help = "Subscription length in months")]
        months: u32,
    },
    #[command(about = "List the plan catalog with monthly prices")]
    Plans,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog, exchange rate and PayPal readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { household, gaming, tv_pc, camera } => commands::recommend::run(
            household.as_deref(),
            DeviceFlags { gaming, tv_and_pc: tv_pc, camera },
        ),
        Command::Quote { plan, months } => commands::quote::run(&plan, months),
        Command::Plans => commands::plans::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
