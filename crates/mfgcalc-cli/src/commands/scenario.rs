use clap::{Args, Subcommand};
use serde_json::json;

use mfgcalc_core::scenarios::{FileStorage, ScenarioRepository, ScenarioStore};

use super::{estimate, parse_calculator, CommandResult, Context};
use crate::input;

/// Arguments for managing saved scenarios
#[derive(Args)]
pub struct ScenarioArgs {
    #[command(subcommand)]
    pub action: ScenarioAction,
}

#[derive(Subcommand)]
pub enum ScenarioAction {
    /// Run a calculator on JSON input and save inputs and results
    Save {
        /// Scenario name
        #[arg(long)]
        name: String,
        /// Calculator: valuation, tax-savings, benchmarking, cash-flow, working-capital
        #[arg(long)]
        calculator: String,
        /// Path to JSON input file
        #[arg(long)]
        input: Option<String>,
    },
    /// List saved scenarios, oldest first
    List,
    /// Show a saved scenario with its inputs and results
    Show { id: String },
    /// Delete a saved scenario
    Delete { id: String },
}

pub fn run_scenario(args: ScenarioArgs, ctx: &Context) -> CommandResult {
    let repo = ScenarioRepository::new(FileStorage::open(ctx.scenario_dir())?);

    match args.action {
        ScenarioAction::Save {
            name,
            calculator,
            input,
        } => {
            let kind = parse_calculator(&calculator)?;
            let data = input::require_input(input.as_deref(), "scenario save")?;
            let results = estimate(kind, data.clone(), ctx)?;
            let scenario = repo.save(&name, kind, data, results)?;
            Ok(json!({
                "id": scenario.id,
                "name": scenario.name,
                "timestamp": scenario.timestamp,
                "calculator": scenario.calculator,
            }))
        }
        ScenarioAction::List => Ok(serde_json::to_value(repo.list()?)?),
        ScenarioAction::Show { id } => Ok(serde_json::to_value(repo.load(&id)?)?),
        ScenarioAction::Delete { id } => {
            repo.delete(&id)?;
            Ok(json!({ "deleted": id }))
        }
    }
}
