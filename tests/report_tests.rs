//! Tests for report assembly and export.

use indicatorfit::batch::batchevaluator::evaluate_batch;
use indicatorfit::batch::batchrequest::BatchRequest;
use indicatorfit::objectwithuuid::ObjectWithUUID;
use indicatorfit::regression::curvefitter::CurveFitter;
use indicatorfit::report::forecastreport::ForecastReport;
use indicatorfit::series::seriessource::{
    SeriesKey,
    SeriesSource,
    SyntheticSeriesSource
};

fn report() -> ForecastReport {
    let key = SeriesKey::new("USA", "NY.GDP.PCAP.CD");
    let series = SyntheticSeriesSource::new(1990, 2020).fetch(&key).unwrap();
    let (model, diagnostics) = CurveFitter::new(3).unwrap().fit_with_diagnostics(&series).unwrap();
    let results = evaluate_batch(&model, &series, &BatchRequest::years_of(vec![2015, 2025]), 0.95).unwrap();
    ForecastReport::build(key, model, diagnostics, results)
}

#[test]
fn test_report_carries_model_and_results() {
    let report = report();
    assert_eq!(report.results().len(), 2);
    assert_eq!(report.equation(), report.model().equation());
    assert_eq!(report.key().country(), "USA");
    assert_eq!(report.diagnostics().observations, 31);
}

#[test]
fn test_reports_get_distinct_ids() {
    assert_ne!(report().uuid(), report().uuid());
}

#[test]
fn test_json_export_parses_back() {
    let report = report();
    let json = report.to_json().unwrap();
    let parsed: ForecastReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.uuid(), report.uuid());
    assert_eq!(parsed.results().len(), report.results().len());
    for (lhs, rhs) in parsed.results().iter().zip(report.results()) {
        assert_eq!(lhs.query_year, rhs.query_year);
        assert_eq!(lhs.calculation_type, rhs.calculation_type);
        assert_eq!(lhs.data_range, rhs.data_range);
    }
    assert_eq!(parsed.generated_at(), report.generated_at());
}

#[test]
fn test_csv_export() {
    let report = report();
    let mut buffer = Vec::new();
    report.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "year,predicted,lower,upper,calculation_type,uncertainty_factor,r_squared,mae,rmse,data_range,confidence_level"
    );
    assert!(lines[1].starts_with("2015.0,"));
    assert!(lines[1].contains(",Interpolation,1.0,"));
    assert!(lines[2].contains(",Extrapolation,1.5,"));
    assert!(lines[2].ends_with(",1990-2020,0.95"));
}
