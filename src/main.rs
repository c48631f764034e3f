//! PropGuard CLI
//!
//! Evaluates a prop-firm challenge account against a firm's rule set and
//! projects hypothetical trades before they are placed.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use propguard::application::simulation::{SimulationAdapter, SimulationOutcome};
use propguard::config::Config;
use propguard::domain::account::AccountState;
use propguard::domain::ports::SimulationRequest;
use propguard::domain::rules::{RuleSet, presets};
use propguard::infrastructure::LocalSimulationBackend;
use propguard::infrastructure::observability::Metrics;
use propguard::infrastructure::rule_set_loader::{find_rule_set, load_rule_sets};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Prop-firm account health checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in firm rule sets
    Presets,
    /// Classify an account against a rule set
    Evaluate {
        #[command(flatten)]
        rules: RuleArgs,

        #[command(flatten)]
        account: AccountArgs,
    },
    /// Project a hypothetical trade result
    Simulate {
        #[command(flatten)]
        rules: RuleArgs,

        #[command(flatten)]
        account: AccountArgs,

        /// Hypothetical P&L of the trade (negative for a loss)
        #[arg(long, allow_hyphen_values = true)]
        pnl: Decimal,
    },
}

#[derive(Args)]
struct RuleArgs {
    /// Built-in preset name (see `presets`)
    #[arg(long, conflicts_with = "rules_file")]
    preset: Option<String>,

    /// TOML file with `[[rule_set]]` entries
    #[arg(long, requires = "firm")]
    rules_file: Option<String>,

    /// Rule set to pick from the rules file
    #[arg(long)]
    firm: Option<String>,
}

#[derive(Args)]
struct AccountArgs {
    /// Starting balance of the account
    #[arg(long)]
    starting: Decimal,

    /// Current balance (defaults to starting)
    #[arg(long)]
    current: Option<Decimal>,

    /// Highest balance reached (defaults to max of starting and current)
    #[arg(long)]
    highest: Option<Decimal>,

    /// Balance at the start of the trading day (defaults to current)
    #[arg(long)]
    daily_start: Option<Decimal>,

    /// Trading days completed
    #[arg(long, default_value = "0")]
    days: u32,

    /// Best single-day profit so far
    #[arg(long, default_value = "0")]
    best_day: Decimal,
}

impl RuleArgs {
    fn resolve(&self) -> Result<RuleSet> {
        match (&self.preset, &self.rules_file, &self.firm) {
            (Some(name), _, _) => {
                presets::find(name).with_context(|| format!("Unknown preset '{}'", name))
            }
            (None, Some(path), Some(firm)) => {
                let rule_sets = load_rule_sets(path)?;
                find_rule_set(&rule_sets, firm)
                    .cloned()
                    .with_context(|| format!("No rule set named '{}' in {}", firm, path))
            }
            _ => bail!("Pass either --preset or --rules-file with --firm"),
        }
    }
}

impl AccountArgs {
    fn to_state(&self) -> AccountState {
        let current = self.current.unwrap_or(self.starting);
        let mut state = AccountState::new(self.starting);
        state.current_balance = current;
        state.highest_balance = self
            .highest
            .unwrap_or_else(|| self.starting.max(current));
        state.daily_starting_balance = self.daily_start.unwrap_or(current);
        state.trading_days = self.days;
        state.best_day_profit = self.best_day;
        state
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Logs go to stderr so stdout stays valid JSON
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.observability.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    let metrics = if config.observability.enabled {
        Some(Metrics::new()?)
    } else {
        None
    };

    let cli = Cli::parse();
    match cli.command {
        Commands::Presets => {
            for rule_set in presets::all() {
                println!(
                    "{:<32} daily {:<8} drawdown {:<8} ({:?})",
                    rule_set.display_name(),
                    rule_set
                        .max_daily_loss
                        .map(|l| l.to_string())
                        .unwrap_or_default(),
                    rule_set
                        .max_drawdown
                        .map(|l| l.to_string())
                        .unwrap_or_default(),
                    rule_set.drawdown_mode
                );
            }
        }
        Commands::Evaluate { rules, account } => {
            let rule_set = rules.resolve()?;
            let engine = config.create_engine()?;
            let evaluation = engine
                .evaluate(&account.to_state(), &rule_set)
                .context("Evaluation failed")?;

            info!("{} -> {}", rule_set.display_name(), evaluation.status);
            if let Some(metrics) = &metrics {
                metrics.inc_evaluation(evaluation.status);
            }
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        Commands::Simulate {
            rules,
            account,
            pnl,
        } => {
            config.tier_gate().check_simulation()?;
            let rule_set = rules.resolve()?;
            let backend = LocalSimulationBackend::new(Arc::new(config.create_engine()?));
            let mut adapter =
                SimulationAdapter::new(Arc::new(backend), config.evaluation.simulation_timeout());
            if let Some(metrics) = &metrics {
                adapter = adapter.with_metrics(metrics.clone());
            }

            let request = SimulationRequest::new(account.to_state(), rule_set, pnl);
            match adapter.run(request).await {
                SimulationOutcome::Succeeded(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                SimulationOutcome::Failed(error) => bail!("Simulation failed: {}", error),
                SimulationOutcome::Superseded { request_id } => {
                    bail!("Simulation #{} was superseded", request_id)
                }
            }
        }
    }

    if let Some(metrics) = &metrics {
        eprintln!("{}", metrics.render());
    }

    Ok(())
}
