use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MfgCalcError;
use crate::wizard::CalculatorKind;
use crate::MfgCalcResult;

use super::storage::KeyValueStorage;

/// Index of saved scenarios.
pub const SAVED_REPORTS_KEY: &str = "benchmarking_saved_reports";
/// Last company figures entered on the benchmarking dashboard.
pub const COMPANY_DATA_KEY: &str = "benchmarking_company_data";

const SCENARIO_KEY_PREFIX: &str = "benchmarking_";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: Uuid,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub calculator: CalculatorKind,
    pub inputs: serde_json::Value,
    pub results: serde_json::Value,
}

/// Index entry: everything but the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: Uuid,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub calculator: CalculatorKind,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(s: &Scenario) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            timestamp: s.timestamp,
            calculator: s.calculator,
        }
    }
}

/// Persistence port for scenarios.
pub trait ScenarioStore {
    fn save(
        &self,
        name: &str,
        calculator: CalculatorKind,
        inputs: serde_json::Value,
        results: serde_json::Value,
    ) -> MfgCalcResult<Scenario>;
    fn load(&self, id: &str) -> MfgCalcResult<Scenario>;
    /// Saved scenarios in the order they were saved.
    fn list(&self) -> MfgCalcResult<Vec<ScenarioSummary>>;
    fn delete(&self, id: &str) -> MfgCalcResult<()>;
}

/// [`ScenarioStore`] over any [`KeyValueStorage`].
pub struct ScenarioRepository<S: KeyValueStorage> {
    storage: S,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl<S: KeyValueStorage> ScenarioRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Remember the company figures last entered, replacing any previous ones.
    pub fn save_company_data<T: Serialize>(&self, data: &T) -> MfgCalcResult<()> {
        self.storage
            .set(COMPANY_DATA_KEY, &serde_json::to_string(data)?)
    }

    pub fn load_company_data<T: DeserializeOwned>(&self) -> MfgCalcResult<Option<T>> {
        match self.storage.get(COMPANY_DATA_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn read_index(&self) -> MfgCalcResult<Vec<ScenarioSummary>> {
        let Some(raw) = self.storage.get(SAVED_REPORTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(index) => Ok(index),
            Err(e) => {
                tracing::warn!(error = %e, "saved scenario index is unreadable; starting empty");
                Ok(Vec::new())
            }
        }
    }

    fn write_index(&self, index: &[ScenarioSummary]) -> MfgCalcResult<()> {
        self.storage
            .set(SAVED_REPORTS_KEY, &serde_json::to_string(index)?)
    }
}

fn scenario_key(id: &Uuid) -> String {
    format!("{SCENARIO_KEY_PREFIX}{id}")
}

fn parse_id(id: &str) -> MfgCalcResult<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| MfgCalcError::ScenarioNotFound(id.to_string()))
}

impl<S: KeyValueStorage> ScenarioStore for ScenarioRepository<S> {
    fn save(
        &self,
        name: &str,
        calculator: CalculatorKind,
        inputs: serde_json::Value,
        results: serde_json::Value,
    ) -> MfgCalcResult<Scenario> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MfgCalcError::InvalidInput {
                field: "name".into(),
                reason: "Scenario name is required".into(),
            });
        }

        let scenario = Scenario {
            id: Uuid::new_v4(),
            name: name.to_string(),
            timestamp: Utc::now(),
            calculator,
            inputs,
            results,
        };

        self.storage
            .set(&scenario_key(&scenario.id), &serde_json::to_string(&scenario)?)?;
        let mut index = self.read_index()?;
        index.push(ScenarioSummary::from(&scenario));
        self.write_index(&index)?;

        tracing::debug!(id = %scenario.id, name = %scenario.name, "saved scenario");
        Ok(scenario)
    }

    fn load(&self, id: &str) -> MfgCalcResult<Scenario> {
        let uuid = parse_id(id)?;
        let raw = self
            .storage
            .get(&scenario_key(&uuid))?
            .ok_or_else(|| MfgCalcError::ScenarioNotFound(id.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn list(&self) -> MfgCalcResult<Vec<ScenarioSummary>> {
        self.read_index()
    }

    fn delete(&self, id: &str) -> MfgCalcResult<()> {
        let uuid = parse_id(id)?;
        let mut index = self.read_index()?;
        let before = index.len();
        index.retain(|s| s.id != uuid);

        let key = scenario_key(&uuid);
        let stored = self.storage.get(&key)?.is_some();
        if index.len() == before && !stored {
            return Err(MfgCalcError::ScenarioNotFound(id.to_string()));
        }

        self.storage.remove(&key)?;
        self.write_index(&index)?;
        Ok(())
    }
}
