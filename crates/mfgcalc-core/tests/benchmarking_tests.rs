use mfgcalc_core::benchmarking::export::export_comparison_csv;
use mfgcalc_core::benchmarking::metrics::{Metric, Severity};
use mfgcalc_core::benchmarking::source::JsonBenchmarkSource;
use mfgcalc_core::benchmarking::{
    analyze_benchmarks, run_benchmark_analysis, BenchmarkAssumptions, BenchmarkInput,
    BenchmarkRecord, BenchmarkSource, CachedBenchmarkSource, RatioSet, StaticBenchmarkSource,
};
use mfgcalc_core::industries::builtin_industries;
use mfgcalc_core::MfgCalcError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn flat_benchmark() -> BenchmarkRecord {
    BenchmarkRecord {
        industry_id: "test_segment".into(),
        industry_name: "Test Segment".into(),
        ratios: RatioSet {
            gross_margin: dec!(25),
            operating_margin: dec!(10),
            net_margin: dec!(6),
            ebitda_margin: dec!(14),
            current_ratio: dec!(2),
            quick_ratio: dec!(1),
            days_sales_outstanding: dec!(45),
            days_inventory_outstanding: dec!(60),
            days_payable_outstanding: dec!(30),
            inventory_turnover: dec!(6),
            asset_turnover: dec!(1.2),
            debt_to_equity: dec!(1),
            interest_coverage: dec!(5),
        },
    }
}

fn company(ratios: RatioSet) -> BenchmarkInput {
    BenchmarkInput {
        company_name: "Midwest Castings".into(),
        industry_id: "test_segment".into(),
        fiscal_year: Some(2024),
        annual_revenue: dec!(1_000_000),
        ratios,
    }
}

// ===========================================================================
// Gap analysis
// ===========================================================================

#[test]
fn test_gross_margin_gap_dollar_impact() {
    let mut ratios = flat_benchmark().ratios;
    ratios.gross_margin = dec!(20);
    let out = analyze_benchmarks(
        &company(ratios),
        &flat_benchmark(),
        &BenchmarkAssumptions::default(),
    )
    .unwrap();

    let gaps = &out.result.gaps;
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].metric, Metric::GrossMargin);
    assert_eq!(gaps[0].gap, dec!(5));
    assert_eq!(gaps[0].estimated_dollar_impact, Some(dec!(50_000)));
    assert_eq!(gaps[0].severity, Severity::High);
    assert_eq!(gaps[0].priority_score, dec!(20));
}

#[test]
fn test_outperformance_produces_no_gaps() {
    let mut ratios = flat_benchmark().ratios;
    ratios.gross_margin = dec!(35);
    ratios.days_sales_outstanding = dec!(30);
    ratios.debt_to_equity = dec!(0.5);
    let out = analyze_benchmarks(
        &company(ratios),
        &flat_benchmark(),
        &BenchmarkAssumptions::default(),
    )
    .unwrap();
    assert!(out.result.gaps.is_empty());
    assert_eq!(out.result.total_estimated_impact, Decimal::ZERO);
    assert_eq!(out.result.performance.overall, dec!(100));
}

#[test]
fn test_gap_ordering_and_total_impact() {
    let mut ratios = flat_benchmark().ratios;
    ratios.gross_margin = dec!(24); // 4% of benchmark
    ratios.days_inventory_outstanding = dec!(90); // 50%
    ratios.interest_coverage = dec!(4); // 20%, not priced
    let out = analyze_benchmarks(
        &company(ratios),
        &flat_benchmark(),
        &BenchmarkAssumptions::default(),
    )
    .unwrap();

    let order: Vec<Metric> = out.result.gaps.iter().map(|g| g.metric).collect();
    assert_eq!(
        order,
        vec![Metric::DaysInventoryOutstanding, Metric::InterestCoverage, Metric::GrossMargin]
    );
    assert_eq!(out.result.gaps[1].estimated_dollar_impact, None);
    // 30/90 of a 90-day balance on 1M revenue, plus 1 point of margin
    let dio_impact = dec!(30) / dec!(90) * (dec!(1_000_000) / dec!(365) * dec!(90));
    assert_eq!(out.result.total_estimated_impact, dio_impact + dec!(10_000));
}

// ===========================================================================
// Score, export and sources
// ===========================================================================

#[test]
fn test_score_reflects_category_weights() {
    let mut ratios = flat_benchmark().ratios;
    // Leverage at half strength: 10-point cap halves
    ratios.debt_to_equity = dec!(2);
    ratios.interest_coverage = dec!(2.5);
    let out = analyze_benchmarks(
        &company(ratios),
        &flat_benchmark(),
        &BenchmarkAssumptions::default(),
    )
    .unwrap();
    assert_eq!(out.result.performance.overall, dec!(95));
}

#[test]
fn test_csv_export_of_analysis() {
    let out = analyze_benchmarks(
        &company(flat_benchmark().ratios),
        &flat_benchmark(),
        &BenchmarkAssumptions::default(),
    )
    .unwrap();
    let csv = export_comparison_csv(&out.result.comparison).unwrap();
    assert!(csv.starts_with("category,metric,value,benchmark,unit,difference\n"));
    assert_eq!(csv.lines().count(), 14);
    assert!(csv.contains("Efficiency,Days Sales Outstanding,45,45,days,0"));
}

#[test]
fn test_unknown_industry_is_unavailable() {
    let mut input = company(flat_benchmark().ratios);
    input.industry_id = "shipbuilding".into();
    let err = run_benchmark_analysis(
        &input,
        &CachedBenchmarkSource::new(StaticBenchmarkSource::new()),
        false,
        &BenchmarkAssumptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MfgCalcError::BenchmarkUnavailable { .. }));
}

#[test]
fn test_json_source_behind_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("industries.json");
    std::fs::write(&path, serde_json::to_string(&builtin_industries()).unwrap()).unwrap();

    let source = CachedBenchmarkSource::new(JsonBenchmarkSource::new(&path));
    let first = source.fetch_benchmark_data("chemicals", false).unwrap();

    // Cached copy survives the file disappearing until a forced refresh
    std::fs::remove_file(&path).unwrap();
    assert_eq!(source.fetch_benchmark_data("chemicals", false).unwrap(), first);
    assert!(source.fetch_benchmark_data("chemicals", true).is_err());
}

#[test]
fn test_every_builtin_industry_scores_itself_perfectly() {
    let source = StaticBenchmarkSource::new();
    for industry in source.fetch_industries().unwrap() {
        let record = source.fetch_benchmark_data(&industry.id, false).unwrap();
        let mut input = company(record.ratios.clone());
        input.industry_id = industry.id.clone();
        let out = analyze_benchmarks(&input, &record, &BenchmarkAssumptions::default()).unwrap();
        assert_eq!(out.result.performance.overall, dec!(100), "{}", industry.id);
        assert!(out.warnings.is_empty());
    }
}

// ===========================================================================
// Properties
// ===========================================================================

fn ratio_value() -> impl Strategy<Value = Decimal> {
    (-500i64..5_000).prop_map(|v| Decimal::new(v, 1))
}

prop_compose! {
    fn ratio_set()(v in prop::collection::vec(ratio_value(), 13)) -> RatioSet {
        RatioSet {
            gross_margin: v[0],
            operating_margin: v[1],
            net_margin: v[2],
            ebitda_margin: v[3],
            current_ratio: v[4],
            quick_ratio: v[5],
            days_sales_outstanding: v[6],
            days_inventory_outstanding: v[7],
            days_payable_outstanding: v[8],
            inventory_turnover: v[9],
            asset_turnover: v[10],
            debt_to_equity: v[11],
            interest_coverage: v[12],
        }
    }
}

proptest! {
    #[test]
    fn prop_score_within_bounds(company_ratios in ratio_set(), bench_ratios in ratio_set()) {
        let bench = BenchmarkRecord {
            industry_id: "test_segment".into(),
            industry_name: "Test Segment".into(),
            ratios: bench_ratios,
        };
        let out = analyze_benchmarks(
            &company(company_ratios),
            &bench,
            &BenchmarkAssumptions::default(),
        )
        .unwrap();
        let score = out.result.performance.overall;
        prop_assert!(score >= Decimal::ZERO && score <= dec!(100), "score {}", score);
        for gap in &out.result.gaps {
            prop_assert!(gap.gap > Decimal::ZERO);
            prop_assert!(gap.priority_score >= Decimal::ZERO);
        }
    }

    #[test]
    fn prop_analysis_is_pure(company_ratios in ratio_set()) {
        let input = company(company_ratios);
        let a = analyze_benchmarks(&input, &flat_benchmark(), &BenchmarkAssumptions::default()).unwrap();
        let b = analyze_benchmarks(&input, &flat_benchmark(), &BenchmarkAssumptions::default()).unwrap();
        prop_assert_eq!(a.result, b.result);
    }
}
