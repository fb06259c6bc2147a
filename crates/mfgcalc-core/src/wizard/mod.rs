//! Multi-step calculator wizard.
//!
//! Every calculator is a linear flow `Step(1) .. Step(N) -> Results`. The
//! transition table is explicit and independent of any rendering:
//!
//! | from | event | to |
//! |---|---|---|
//! | `Step(i)`, i < N | `Next` | `Step(i + 1)` |
//! | `Step(i)`, i > 1 | `Previous` | `Step(i - 1)` |
//! | `Step(i)` | `Submit` | `Results` |
//! | `Results` | `Recalculate` | `Step(1)` |
//!
//! Any other pair is rejected with `InvalidTransition` and leaves the state
//! untouched.

pub mod calculators;
#[cfg(all(
    feature = "valuation",
    feature = "tax",
    feature = "benchmarking",
    feature = "cash_flow"
))]
pub mod session;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MfgCalcError;
use crate::MfgCalcResult;

pub use calculators::{CalculatorKind, WizardStep};
#[cfg(all(
    feature = "valuation",
    feature = "tax",
    feature = "benchmarking",
    feature = "cash_flow"
))]
pub use session::{SubmittedEstimate, WizardSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum WizardState {
    /// 1-based step index
    Step(usize),
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardEvent {
    Next,
    Previous,
    Submit,
    Recalculate,
}

impl fmt::Display for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardState::Step(i) => write!(f, "Step {i}"),
            WizardState::Results => write!(f, "Results"),
        }
    }
}

impl fmt::Display for WizardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardEvent::Next => "Next",
            WizardEvent::Previous => "Previous",
            WizardEvent::Submit => "Submit",
            WizardEvent::Recalculate => "Recalculate",
        };
        f.write_str(name)
    }
}

/// Apply one event to a wizard with `step_count` steps.
pub fn transition(
    state: WizardState,
    event: WizardEvent,
    step_count: usize,
) -> MfgCalcResult<WizardState> {
    let next = match (state, event) {
        (WizardState::Step(i), WizardEvent::Next) if i < step_count => Some(WizardState::Step(i + 1)),
        (WizardState::Step(i), WizardEvent::Previous) if i > 1 => Some(WizardState::Step(i - 1)),
        (WizardState::Step(_), WizardEvent::Submit) => Some(WizardState::Results),
        (WizardState::Results, WizardEvent::Recalculate) => Some(WizardState::Step(1)),
        _ => None,
    };

    next.ok_or_else(|| MfgCalcError::InvalidTransition {
        from: state.to_string(),
        event: event.to_string(),
    })
}

/// State machine for one calculator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    state: WizardState,
    step_count: usize,
}

impl Wizard {
    pub fn new(step_count: usize) -> Self {
        Self {
            state: WizardState::Step(1),
            step_count: step_count.max(1),
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_last_step(&self) -> bool {
        self.state == WizardState::Step(self.step_count)
    }

    /// Apply an event; on error the state is unchanged.
    pub fn fire(&mut self, event: WizardEvent) -> MfgCalcResult<WizardState> {
        let next = transition(self.state, event, self.step_count)?;
        tracing::debug!(from = %self.state, %event, to = %next, "wizard transition");
        self.state = next;
        Ok(next)
    }
}
