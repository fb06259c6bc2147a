pub mod analysis;
pub mod export;
pub mod gaps;
pub mod metrics;
pub mod score;
pub mod source;

pub use crate::industries::RatioSet;
pub use analysis::{analyze_benchmarks, run_benchmark_analysis, BenchmarkAnalysisOutput, BenchmarkInput};
pub use score::{BenchmarkAssumptions, CategoryWeights, PerformanceScore};
pub use source::{BenchmarkRecord, BenchmarkSource, CachedBenchmarkSource, StaticBenchmarkSource};
