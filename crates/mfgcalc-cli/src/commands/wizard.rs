use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use clap::Args;
use colored::Colorize;
use serde_json::Value;

use mfgcalc_core::scenarios::{FileStorage, ScenarioRepository, ScenarioStore};
use mfgcalc_core::wizard::{SubmittedEstimate, WizardSession, WizardState};

use super::{parse_calculator, CommandResult, Context};
use crate::input;

/// Arguments for the step-by-step calculator wizard
#[derive(Args)]
pub struct WizardArgs {
    /// Calculator to run: valuation, tax-savings, benchmarking, cash-flow, working-capital
    pub calculator: String,

    /// JSON object of field name to raw answer; prompts interactively when absent
    #[arg(long)]
    pub answers: Option<String>,

    /// Save the result as a named scenario
    #[arg(long)]
    pub save: Option<String>,
}

pub fn run_wizard(args: WizardArgs, ctx: &Context) -> CommandResult {
    let kind = parse_calculator(&args.calculator)?;
    let mut session = WizardSession::new(kind);

    let estimate = match args.answers {
        Some(path) => {
            let answers: BTreeMap<String, Value> = input::file::read_json(&path)?;
            for (name, raw) in &answers {
                session.set_field(name, &raw_answer(raw))?;
            }
            session.submit(&ctx.config, &ctx.source)?.clone()
        }
        None => run_interactive(&mut session, ctx)?,
    };

    for note in &estimate.notes {
        eprintln!("{}: {}", "note".yellow().bold(), note);
    }

    if let Some(name) = args.save {
        let repo = ScenarioRepository::new(FileStorage::open(ctx.scenario_dir())?);
        let scenario = repo.save(
            &name,
            kind,
            estimate.inputs.clone(),
            estimate.output.clone(),
        )?;
        eprintln!("{} scenario '{}' ({})", "saved".green().bold(), scenario.name, scenario.id);
    }

    Ok(estimate.output)
}

/// Answers given as JSON numbers or booleans are taken as their text.
fn raw_answer(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Prompt for every field step by step on stderr, reading answers from stdin.
///
/// A blank answer keeps the current value and `<` returns to the previous
/// step. Validation failures send the user back to the first step with their
/// answers kept.
fn run_interactive(
    session: &mut WizardSession,
    ctx: &Context,
) -> Result<SubmittedEstimate, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let step_count = session.kind().steps().len();

    eprintln!("{}", session.kind().title().bold());
    loop {
        'steps: while let Some(step) = session.current_step() {
            eprintln!("\n{} [{}/{}]", step.title.bold(), step_index(session), step_count);
            for field in step.fields {
                let current = session.form().get(field.name).unwrap_or("").to_string();
                if current.is_empty() {
                    eprint!("  {}: ", field.label);
                } else {
                    eprint!("  {} [{}]: ", field.label, current);
                }
                io::stderr().flush()?;

                let line = lines
                    .next()
                    .ok_or("input ended before the wizard was complete")??;
                let answer = line.trim();
                if answer == "<" {
                    if session.previous().is_err() {
                        eprintln!("  (already on the first step)");
                    }
                    continue 'steps;
                }
                if !answer.is_empty() {
                    session.set_field(field.name, answer)?;
                }
            }

            if step_index(session) == step_count {
                break;
            }
            session.next()?;
        }

        match session.submit(&ctx.config, &ctx.source) {
            Ok(estimate) => return Ok(estimate.clone()),
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                while session.previous().is_ok() {}
            }
        }
    }
}

fn step_index(session: &WizardSession) -> usize {
    match session.state() {
        WizardState::Step(i) => i,
        WizardState::Results => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_raw_answer_text() {
        assert_eq!(raw_answer(&json!("$1,500,000")), "$1,500,000");
        assert_eq!(raw_answer(&json!(45)), "45");
        assert_eq!(raw_answer(&json!(true)), "true");
        assert_eq!(raw_answer(&Value::Null), "");
    }

    #[test]
    fn test_answers_file_runs_wizard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(
            &path,
            r#"{"annual_revenue": "$7,300,000", "days_inventory": 45, "days_receivable": 30, "days_payable": 20}"#,
        )
        .unwrap();

        let ctx = Context::load(None).unwrap();
        let out = run_wizard(
            WizardArgs {
                calculator: "working-capital".into(),
                answers: Some(path.to_string_lossy().into_owned()),
                save: None,
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(out["result"]["cash_conversion_cycle"], json!("55"));
    }
}
