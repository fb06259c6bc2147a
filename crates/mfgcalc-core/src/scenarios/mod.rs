//! Saved calculator scenarios.
//!
//! A scenario is a named snapshot of one calculator's inputs and results.
//! Storage is a flat key-value space modelled on browser local storage, so
//! the same layout works in memory, on disk, or behind the website.

pub mod repository;
pub mod storage;

pub use repository::{
    Scenario, ScenarioRepository, ScenarioStore, ScenarioSummary, COMPANY_DATA_KEY,
    SAVED_REPORTS_KEY,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
