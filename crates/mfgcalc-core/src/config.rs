//! Estimator configuration.
//!
//! Every section is optional in the TOML file; anything left out keeps the
//! product defaults, so an empty file reproduces the published calculators
//! exactly.
//!
//! ```toml
//! [valuation]
//! range_band = "0.15"
//!
//! [tax]
//! federal_rate = "0.21"
//!
//! [data]
//! benchmark_file = "benchmarks.json"
//! scenario_dir = "~/.mfgcalc/scenarios"
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MfgCalcError;
use crate::MfgCalcResult;

#[cfg(feature = "benchmarking")]
use crate::benchmarking::BenchmarkAssumptions;
#[cfg(feature = "cash_flow")]
use crate::cash_flow::CashFlowAssumptions;
#[cfg(feature = "tax")]
use crate::tax::TaxAssumptions;
#[cfg(feature = "valuation")]
use crate::valuation::ValuationAssumptions;

/// Where external data lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON file of industry profiles replacing the built-in catalogue
    pub benchmark_file: Option<PathBuf>,
    /// Directory for saved scenarios
    pub scenario_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    #[cfg(feature = "valuation")]
    pub valuation: ValuationAssumptions,
    #[cfg(feature = "tax")]
    pub tax: TaxAssumptions,
    #[cfg(feature = "benchmarking")]
    pub benchmarking: BenchmarkAssumptions,
    #[cfg(feature = "cash_flow")]
    pub cash_flow: CashFlowAssumptions,
    pub data: DataConfig,
}

impl EstimatorConfig {
    /// Check that weight tables each sum to one and rates are sane.
    pub fn validate(&self) -> MfgCalcResult<()> {
        let mut problems: Vec<String> = Vec::new();

        #[cfg(feature = "valuation")]
        {
            let total = self.valuation.driver_weights.total();
            if total != Decimal::ONE {
                problems.push(format!("valuation.driver_weights sum to {total}, expected 1"));
            }
            if self.valuation.range_band < Decimal::ZERO {
                problems.push("valuation.range_band must not be negative".into());
            }
        }
        #[cfg(feature = "benchmarking")]
        {
            let total = self.benchmarking.category_weights.total();
            if total != Decimal::ONE {
                problems.push(format!(
                    "benchmarking.category_weights sum to {total}, expected 1"
                ));
            }
        }
        #[cfg(feature = "tax")]
        {
            if self.tax.federal_rate < Decimal::ZERO || self.tax.federal_rate >= Decimal::ONE {
                problems.push("tax.federal_rate must be in [0, 1)".into());
            }
        }
        #[cfg(feature = "cash_flow")]
        {
            if self.cash_flow.tax_rate < Decimal::ZERO || self.cash_flow.tax_rate >= Decimal::ONE {
                problems.push("cash_flow.tax_rate must be in [0, 1)".into());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(MfgCalcError::Config(problems.join("; ")))
        }
    }
}

/// Parse and validate a TOML document.
pub fn parse_config(contents: &str) -> MfgCalcResult<EstimatorConfig> {
    let config: EstimatorConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file.
pub fn load_config(path: impl AsRef<Path>) -> MfgCalcResult<EstimatorConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        MfgCalcError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loading estimator config");
    parse_config(&contents)
}
