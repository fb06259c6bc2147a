pub mod projection;
pub mod working_capital;

pub use projection::{
    project_cash_flow, CashFlowAssumptions, CashFlowInput, CashFlowProjection, CashFlowSummary,
    CashEvent, MonthlyCashFlow,
};
pub use working_capital::{analyze_working_capital, WorkingCapitalInput, WorkingCapitalOutput};
