//! A wizard run: state machine, raw form fields and the last result.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::benchmarking::{run_benchmark_analysis, BenchmarkInput, BenchmarkSource};
use crate::cash_flow::{analyze_working_capital, project_cash_flow, CashFlowInput, WorkingCapitalInput};
use crate::config::EstimatorConfig;
use crate::error::MfgCalcError;
use crate::forms::{FieldSpec, FormCollector};
use crate::tax::{estimate_tax_savings, TaxSavingsInput};
use crate::types::ComputationOutput;
use crate::validation::{Validate, ValidationReport};
use crate::valuation::{estimate_business_value, BusinessValuationInput};
use crate::MfgCalcResult;

use super::{transition, CalculatorKind, Wizard, WizardEvent, WizardState, WizardStep};

/// Outcome of a successful submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedEstimate {
    /// Typed input as deserialised from the form
    pub inputs: serde_json::Value,
    /// Full output envelope
    pub output: serde_json::Value,
    /// Coercion notes from the form
    pub notes: Vec<String>,
}

pub struct WizardSession {
    kind: CalculatorKind,
    wizard: Wizard,
    form: FormCollector,
    last: Option<SubmittedEstimate>,
}

impl WizardSession {
    pub fn new(kind: CalculatorKind) -> Self {
        Self {
            kind,
            wizard: Wizard::new(kind.steps().len()),
            form: FormCollector::new(),
            last: None,
        }
    }

    pub fn kind(&self) -> CalculatorKind {
        self.kind
    }

    pub fn state(&self) -> WizardState {
        self.wizard.state()
    }

    /// The step being shown, or `None` on the results page.
    pub fn current_step(&self) -> Option<&'static WizardStep> {
        match self.wizard.state() {
            WizardState::Step(i) => self.kind.steps().get(i - 1),
            WizardState::Results => None,
        }
    }

    pub fn form(&self) -> &FormCollector {
        &self.form
    }

    /// Record a raw field value. Names must belong to this calculator.
    pub fn set_field(&mut self, name: &str, raw: &str) -> MfgCalcResult<()> {
        if !self.kind.all_fields().iter().any(|f| f.name == name) {
            return Err(MfgCalcError::InvalidInput {
                field: name.to_string(),
                reason: format!("not a field of the {} calculator", self.kind),
            });
        }
        self.form.set(name, raw);
        Ok(())
    }

    pub fn next(&mut self) -> MfgCalcResult<WizardState> {
        self.wizard.fire(WizardEvent::Next)
    }

    pub fn previous(&mut self) -> MfgCalcResult<WizardState> {
        self.wizard.fire(WizardEvent::Previous)
    }

    /// Coerce, validate and estimate, then move to `Results`.
    ///
    /// Validation or estimator errors leave the session on its current step.
    pub fn submit(
        &mut self,
        config: &EstimatorConfig,
        source: &dyn BenchmarkSource,
    ) -> MfgCalcResult<&SubmittedEstimate> {
        transition(self.wizard.state(), WizardEvent::Submit, self.wizard.step_count())?;

        let submitted = evaluate(self.kind, &self.form, config, source)?;
        self.wizard.fire(WizardEvent::Submit)?;
        Ok(self.last.insert(submitted))
    }

    /// Back to the first step; fields are kept so the user can adjust them.
    pub fn recalculate(&mut self) -> MfgCalcResult<WizardState> {
        self.wizard.fire(WizardEvent::Recalculate)
    }

    pub fn last_estimate(&self) -> Option<&SubmittedEstimate> {
        self.last.as_ref()
    }
}

fn evaluate(
    kind: CalculatorKind,
    form: &FormCollector,
    config: &EstimatorConfig,
    source: &dyn BenchmarkSource,
) -> MfgCalcResult<SubmittedEstimate> {
    let specs = kind.all_fields();
    form.check_groups(&specs, kind.field_groups()).into_result()?;
    match kind {
        CalculatorKind::Valuation => run(
            form,
            &specs,
            |i: &BusinessValuationInput| i.validate_with(&config.valuation),
            |i| estimate_business_value(i, &config.valuation),
        ),
        CalculatorKind::TaxSavings => run(form, &specs, TaxSavingsInput::validate, |i| {
            estimate_tax_savings(i, &config.tax)
        }),
        CalculatorKind::Benchmarking => run(form, &specs, BenchmarkInput::validate, |i| {
            run_benchmark_analysis(i, source, false, &config.benchmarking)
        }),
        CalculatorKind::CashFlow => run(form, &specs, CashFlowInput::validate, |i| {
            project_cash_flow(i, &config.cash_flow)
        }),
        CalculatorKind::WorkingCapital => {
            run(form, &specs, WorkingCapitalInput::validate, analyze_working_capital)
        }
    }
}

fn run<T, O, V, F>(
    form: &FormCollector,
    specs: &[FieldSpec],
    validate: V,
    estimate: F,
) -> MfgCalcResult<SubmittedEstimate>
where
    T: DeserializeOwned + Serialize,
    O: Serialize,
    V: FnOnce(&T) -> ValidationReport,
    F: FnOnce(&T) -> MfgCalcResult<ComputationOutput<O>>,
{
    let (input, notes) = form.to_input::<T>(specs)?;
    validate(&input).into_result()?;
    let output = estimate(&input)?;
    Ok(SubmittedEstimate {
        inputs: serde_json::to_value(&input)?,
        output: serde_json::to_value(&output)?,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarking::StaticBenchmarkSource;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn fill_working_capital(session: &mut WizardSession) {
        session.set_field("annual_revenue", "$3,650,000").unwrap();
        session.set_field("days_inventory", "45").unwrap();
        session.set_field("days_receivable", "30").unwrap();
        session.set_field("days_payable", "20").unwrap();
    }

    #[test]
    fn test_submit_moves_to_results() {
        let mut session = WizardSession::new(CalculatorKind::WorkingCapital);
        fill_working_capital(&mut session);
        let estimate = session
            .submit(&EstimatorConfig::default(), &StaticBenchmarkSource::new())
            .unwrap();
        let ccc: Decimal = serde_json::from_value(
            estimate.output["result"]["cash_conversion_cycle"].clone(),
        )
        .unwrap();
        assert_eq!(ccc, dec!(55));
        assert_eq!(session.state(), WizardState::Results);
        assert!(session.current_step().is_none());
    }

    #[test]
    fn test_validation_failure_stays_on_step() {
        let mut session = WizardSession::new(CalculatorKind::WorkingCapital);
        fill_working_capital(&mut session);
        session.set_field("days_receivable", "500").unwrap();
        let err = session
            .submit(&EstimatorConfig::default(), &StaticBenchmarkSource::new())
            .unwrap_err();
        assert!(matches!(err, MfgCalcError::Validation(_)));
        assert_eq!(session.state(), WizardState::Step(1));
        assert!(session.last_estimate().is_none());
    }

    #[test]
    fn test_half_filled_event_fails_on_its_month() {
        let mut session = WizardSession::new(CalculatorKind::CashFlow);
        for (name, raw) in [
            ("starting_cash", "500000"),
            ("monthly_revenue", "400000"),
            ("monthly_growth_rate", "1"),
            ("raw_material_pct", "40"),
            ("monthly_labor", "100000"),
            ("monthly_overhead", "50000"),
            ("customer_payment_days", "30"),
            ("supplier_payment_days", "30"),
            ("capex_event.amount", "$250,000"),
        ] {
            session.set_field(name, raw).unwrap();
        }
        while session.next().is_ok() {}

        let err = session
            .submit(&EstimatorConfig::default(), &StaticBenchmarkSource::new())
            .unwrap_err();
        match err {
            MfgCalcError::Validation(report) => {
                assert_eq!(report.for_field("capex_event.month").count(), 1);
                assert_eq!(report.errors.len(), 1);
            }
            other => panic!("expected a field error, got {other:?}"),
        }
        assert!(session.last_estimate().is_none());

        session.set_field("capex_event.month", "4").unwrap();
        assert!(session
            .submit(&EstimatorConfig::default(), &StaticBenchmarkSource::new())
            .is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut session = WizardSession::new(CalculatorKind::TaxSavings);
        assert!(session.set_field("ebitda", "1").is_err());
        assert!(session.set_field("research.wages", "100000").is_ok());
    }

    #[test]
    fn test_recalculate_keeps_fields() {
        let mut session = WizardSession::new(CalculatorKind::WorkingCapital);
        fill_working_capital(&mut session);
        session
            .submit(&EstimatorConfig::default(), &StaticBenchmarkSource::new())
            .unwrap();
        assert_eq!(session.recalculate().unwrap(), WizardState::Step(1));
        assert_eq!(session.form().get("days_payable"), Some("20"));
        assert!(session
            .submit(&EstimatorConfig::default(), &StaticBenchmarkSource::new())
            .is_ok());
    }
}
