//! Benchmark data service.
//!
//! [`BenchmarkSource`] abstracts where industry benchmarks come from: the
//! built-in catalogue, a JSON file, or either of those behind a memoising
//! cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::MfgCalcError;
use crate::industries::{builtin_industries, IndustryProfile, MultipleRange, RatioSet};
use crate::MfgCalcResult;

/// Benchmark ratios for one industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub industry_id: String,
    pub industry_name: String,
    pub ratios: RatioSet,
}

/// Industry listing entry for pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustrySummary {
    pub id: String,
    pub name: String,
    pub multiple_range: MultipleRange,
}

impl From<&IndustryProfile> for IndustrySummary {
    fn from(profile: &IndustryProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            multiple_range: profile.multiple_range,
        }
    }
}

impl From<&IndustryProfile> for BenchmarkRecord {
    fn from(profile: &IndustryProfile) -> Self {
        Self {
            industry_id: profile.id.clone(),
            industry_name: profile.name.clone(),
            ratios: profile.ratios.clone(),
        }
    }
}

/// Source of industry benchmarks.
pub trait BenchmarkSource: Send + Sync {
    fn fetch_industries(&self) -> MfgCalcResult<Vec<IndustrySummary>>;

    /// Benchmark for one industry. `force_refresh` bypasses any cache.
    fn fetch_benchmark_data(
        &self,
        industry_id: &str,
        force_refresh: bool,
    ) -> MfgCalcResult<BenchmarkRecord>;
}

impl<T: BenchmarkSource + ?Sized> BenchmarkSource for Box<T> {
    fn fetch_industries(&self) -> MfgCalcResult<Vec<IndustrySummary>> {
        (**self).fetch_industries()
    }

    fn fetch_benchmark_data(
        &self,
        industry_id: &str,
        force_refresh: bool,
    ) -> MfgCalcResult<BenchmarkRecord> {
        (**self).fetch_benchmark_data(industry_id, force_refresh)
    }
}

fn lookup(profiles: &[IndustryProfile], industry_id: &str) -> MfgCalcResult<BenchmarkRecord> {
    profiles
        .iter()
        .find(|p| p.id == industry_id)
        .map(BenchmarkRecord::from)
        .ok_or_else(|| MfgCalcError::BenchmarkUnavailable {
            industry_id: industry_id.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Built-in catalogue
// ---------------------------------------------------------------------------

/// Serves the built-in manufacturing segment catalogue.
#[derive(Debug, Clone)]
pub struct StaticBenchmarkSource {
    profiles: Vec<IndustryProfile>,
}

impl StaticBenchmarkSource {
    pub fn new() -> Self {
        Self {
            profiles: builtin_industries(),
        }
    }

    pub fn from_profiles(profiles: Vec<IndustryProfile>) -> Self {
        Self { profiles }
    }
}

impl Default for StaticBenchmarkSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkSource for StaticBenchmarkSource {
    fn fetch_industries(&self) -> MfgCalcResult<Vec<IndustrySummary>> {
        Ok(self.profiles.iter().map(IndustrySummary::from).collect())
    }

    fn fetch_benchmark_data(
        &self,
        industry_id: &str,
        _force_refresh: bool,
    ) -> MfgCalcResult<BenchmarkRecord> {
        lookup(&self.profiles, industry_id)
    }
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// Reads a JSON array of industry profiles from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonBenchmarkSource {
    path: PathBuf,
}

impl JsonBenchmarkSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> MfgCalcResult<Vec<IndustryProfile>> {
        let contents = std::fs::read_to_string(&self.path)?;
        let profiles: Vec<IndustryProfile> = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), count = profiles.len(), "loaded benchmark file");
        Ok(profiles)
    }
}

impl BenchmarkSource for JsonBenchmarkSource {
    fn fetch_industries(&self) -> MfgCalcResult<Vec<IndustrySummary>> {
        Ok(self.load()?.iter().map(IndustrySummary::from).collect())
    }

    fn fetch_benchmark_data(
        &self,
        industry_id: &str,
        _force_refresh: bool,
    ) -> MfgCalcResult<BenchmarkRecord> {
        lookup(&self.load()?, industry_id)
    }
}

// ---------------------------------------------------------------------------
// Memoising wrapper
// ---------------------------------------------------------------------------

/// Caches benchmark records by industry id in front of another source.
pub struct CachedBenchmarkSource<S: BenchmarkSource> {
    inner: S,
    cache: Mutex<HashMap<String, BenchmarkRecord>>,
}

impl<S: BenchmarkSource> CachedBenchmarkSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl<S: BenchmarkSource> BenchmarkSource for CachedBenchmarkSource<S> {
    fn fetch_industries(&self) -> MfgCalcResult<Vec<IndustrySummary>> {
        self.inner.fetch_industries()
    }

    fn fetch_benchmark_data(
        &self,
        industry_id: &str,
        force_refresh: bool,
    ) -> MfgCalcResult<BenchmarkRecord> {
        if !force_refresh {
            if let Some(record) = self.cache.lock().get(industry_id) {
                tracing::debug!(industry_id, "benchmark cache hit");
                return Ok(record.clone());
            }
        }

        let record = self.inner.fetch_benchmark_data(industry_id, force_refresh)?;
        self.cache
            .lock()
            .insert(industry_id.to_string(), record.clone());
        Ok(record)
    }
}
