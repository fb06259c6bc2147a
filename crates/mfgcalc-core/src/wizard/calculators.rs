//! Step layout and field specs for each calculator's wizard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MfgCalcError;
use crate::forms::{FieldKind, FieldSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Valuation,
    TaxSavings,
    Benchmarking,
    CashFlow,
    WorkingCapital,
}

/// One page of a calculator wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WizardStep {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

use FieldKind::{Bool, Integer, Money, Number, Percent, Text};

const fn req(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec::required(name, label, kind)
}

const fn opt(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec::optional(name, label, kind)
}

const VALUATION_STEPS: &[WizardStep] = &[
    WizardStep {
        title: "Earnings",
        fields: &[
            req("ebitda", "EBITDA", Money),
            req("owner_addbacks", "Owner add-backs", Money),
            req("annual_capex", "Annual capital expenditures", Money),
            req("working_capital", "Working capital", Money),
            req("total_debt", "Total debt", Money),
        ],
    },
    WizardStep {
        title: "Balance sheet",
        fields: &[
            req("tangible_assets", "Tangible assets", Money),
            req("intangible_assets", "Intangible assets", Money),
            req("total_liabilities", "Total liabilities", Money),
            req("industry_multiple.min", "Industry multiple (low)", Number),
            req("industry_multiple.max", "Industry multiple (high)", Number),
        ],
    },
    WizardStep {
        title: "Value drivers",
        fields: &[
            req("value_drivers.customer_diversification", "Customer diversification (1-5)", Number),
            req("value_drivers.recurring_revenue", "Recurring revenue (1-5)", Number),
            req("value_drivers.management_depth", "Management depth (1-5)", Number),
            req("value_drivers.operational_efficiency", "Operational efficiency (1-5)", Number),
            req("value_drivers.growth_outlook", "Growth outlook (1-5)", Number),
            opt("adjustments.market_conditions", "Market conditions", Number),
            opt("adjustments.customer_concentration", "Customer concentration", Number),
            opt("adjustments.owner_dependence", "Owner dependence", Number),
            opt("adjustments.facility_condition", "Facility condition", Number),
        ],
    },
    WizardStep {
        title: "Projections",
        fields: &[
            req("growth_rate", "Annual growth rate (%)", Percent),
            req("discount_rate", "Discount rate (%)", Percent),
            req("projection_years", "Projection years", Integer),
        ],
    },
];

const TAX_STEPS: &[WizardStep] = &[
    WizardStep {
        title: "Company",
        fields: &[
            req("annual_revenue", "Annual revenue", Money),
            req("taxable_income", "Taxable income", Money),
            req("employee_count", "Employees", Integer),
            req("state", "State", Text),
        ],
    },
    WizardStep {
        title: "Research & development",
        fields: &[
            opt("research.enabled", "Performs qualified research", Bool),
            opt("research.wages", "Research wages", Money),
            opt("research.supplies", "Research supplies", Money),
            opt("research.contract_research", "Contract research", Money),
            opt("research.claim_state_credit", "Claim state R&D credit", Bool),
        ],
    },
    WizardStep {
        title: "Equipment & facility",
        fields: &[
            opt("equipment.enabled", "Bought equipment this year", Bool),
            opt("equipment.purchases", "Equipment purchases", Money),
            opt("building.owns_building", "Owns building", Bool),
            opt("building.building_value", "Building value", Money),
            opt("building.building_age_years", "Building age (years)", Integer),
        ],
    },
    WizardStep {
        title: "Energy & hiring",
        fields: &[
            opt("energy.enabled", "Energy-efficiency upgrade", Bool),
            opt("energy.upgrade_cost", "Upgrade cost", Money),
            opt("hiring.enabled", "Hiring from WOTC groups", Bool),
            opt("hiring.general_hires", "General hires", Integer),
            opt("hiring.veteran_hires", "Veteran hires", Integer),
            opt("hiring.long_term_assistance_hires", "Long-term assistance hires", Integer),
        ],
    },
];

const BENCHMARK_STEPS: &[WizardStep] = &[
    WizardStep {
        title: "Company",
        fields: &[
            req("company_name", "Company name", Text),
            req("industry_id", "Industry", Text),
            opt("fiscal_year", "Fiscal year", Integer),
            req("annual_revenue", "Annual revenue", Money),
        ],
    },
    WizardStep {
        title: "Profitability",
        fields: &[
            req("ratios.gross_margin", "Gross margin (%)", Number),
            req("ratios.operating_margin", "Operating margin (%)", Number),
            req("ratios.net_margin", "Net margin (%)", Number),
            req("ratios.ebitda_margin", "EBITDA margin (%)", Number),
        ],
    },
    WizardStep {
        title: "Liquidity & efficiency",
        fields: &[
            req("ratios.current_ratio", "Current ratio", Number),
            req("ratios.quick_ratio", "Quick ratio", Number),
            req("ratios.days_sales_outstanding", "Days sales outstanding", Number),
            req("ratios.days_inventory_outstanding", "Days inventory outstanding", Number),
            req("ratios.days_payable_outstanding", "Days payable outstanding", Number),
            req("ratios.inventory_turnover", "Inventory turnover", Number),
            req("ratios.asset_turnover", "Asset turnover", Number),
        ],
    },
    WizardStep {
        title: "Leverage",
        fields: &[
            req("ratios.debt_to_equity", "Debt to equity", Number),
            req("ratios.interest_coverage", "Interest coverage", Number),
        ],
    },
];

const CASH_FLOW_STEPS: &[WizardStep] = &[
    WizardStep {
        title: "Revenue",
        fields: &[
            req("starting_cash", "Starting cash", Money),
            req("monthly_revenue", "Monthly revenue", Money),
            req("monthly_growth_rate", "Monthly growth (%)", Percent),
        ],
    },
    WizardStep {
        title: "Costs",
        fields: &[
            req("raw_material_pct", "Raw materials (% of revenue)", Percent),
            req("monthly_labor", "Monthly labor", Money),
            req("monthly_overhead", "Monthly overhead", Money),
        ],
    },
    WizardStep {
        title: "Payment terms",
        fields: &[
            req("customer_payment_days", "Customer payment days", Number),
            req("supplier_payment_days", "Supplier payment days", Number),
        ],
    },
    WizardStep {
        title: "Events",
        fields: &[
            opt("capex_event.amount", "Equipment purchase", Money),
            opt("capex_event.month", "Purchase month", Integer),
            opt("financing_event.amount", "Financing received", Money),
            opt("financing_event.month", "Financing month", Integer),
            opt("include_taxes", "Include taxes", Bool),
        ],
    },
];

const WORKING_CAPITAL_STEPS: &[WizardStep] = &[WizardStep {
    title: "Working capital",
    fields: &[
        req("annual_revenue", "Annual revenue", Money),
        req("days_inventory", "Days inventory", Number),
        req("days_receivable", "Days receivable", Number),
        req("days_payable", "Days payable", Number),
    ],
}];

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 5] = [
        CalculatorKind::Valuation,
        CalculatorKind::TaxSavings,
        CalculatorKind::Benchmarking,
        CalculatorKind::CashFlow,
        CalculatorKind::WorkingCapital,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CalculatorKind::Valuation => "valuation",
            CalculatorKind::TaxSavings => "tax_savings",
            CalculatorKind::Benchmarking => "benchmarking",
            CalculatorKind::CashFlow => "cash_flow",
            CalculatorKind::WorkingCapital => "working_capital",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CalculatorKind::Valuation => "Business Valuation Estimator",
            CalculatorKind::TaxSavings => "Tax Savings Estimator",
            CalculatorKind::Benchmarking => "Financial Benchmarking Dashboard",
            CalculatorKind::CashFlow => "Cash Flow Planner",
            CalculatorKind::WorkingCapital => "Working Capital Calculator",
        }
    }

    pub fn steps(&self) -> &'static [WizardStep] {
        match self {
            CalculatorKind::Valuation => VALUATION_STEPS,
            CalculatorKind::TaxSavings => TAX_STEPS,
            CalculatorKind::Benchmarking => BENCHMARK_STEPS,
            CalculatorKind::CashFlow => CASH_FLOW_STEPS,
            CalculatorKind::WorkingCapital => WORKING_CAPITAL_STEPS,
        }
    }

    /// Optional field groups that must be filled in together.
    pub fn field_groups(&self) -> &'static [&'static str] {
        match self {
            CalculatorKind::CashFlow => &["capex_event", "financing_event"],
            _ => &[],
        }
    }

    /// Every field across all steps, in step order.
    pub fn all_fields(&self) -> Vec<FieldSpec> {
        self.steps()
            .iter()
            .flat_map(|s| s.fields.iter().copied())
            .collect()
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CalculatorKind {
    type Err = MfgCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CalculatorKind::ALL
            .into_iter()
            .find(|k| k.id() == normalized)
            .ok_or_else(|| MfgCalcError::InvalidInput {
                field: "calculator".into(),
                reason: format!("Unknown calculator '{s}'"),
            })
    }
}
