//! Tests for batch evaluation over ranges and explicit year lists.

use approx::assert_relative_eq;

use indicatorfit::batch::batchevaluator::{
    evaluate_batch,
    BatchEvaluator
};
use indicatorfit::batch::batchrequest::{
    BatchRequest,
    YearBounds
};
use indicatorfit::estimation::intervalestimator::{
    estimate,
    IntervalEstimator
};
use indicatorfit::estimation::queryresult::CalculationType;
use indicatorfit::regression::curvefitter::fit;
use indicatorfit::regression::fiterror::FitError;
use indicatorfit::regression::polynomialmodel::PolynomialModel;
use indicatorfit::series::series::Series;

fn cubic() -> (PolynomialModel, Series) {
    let series = Series::from_pairs(&[
        (2000, 10.0),
        (2005, 12.0),
        (2010, 11.0),
        (2015, 15.0),
        (2020, 20.0),
    ])
    .unwrap();
    let model = fit(&series, 3).unwrap();
    (model, series)
}

#[test]
fn test_range_preserves_order_and_matches_single_estimates() {
    let (model, series) = cubic();
    let results = evaluate_batch(&model, &series, &BatchRequest::range(2018, 2024, 2), 0.95).unwrap();

    let years: Vec<f64> = results.iter().map(|r| r.query_year).collect();
    assert_eq!(years, vec![2018.0, 2020.0, 2022.0, 2024.0]);

    for result in &results {
        let single = estimate(&model, &series, result.query_year, 0.95).unwrap();
        assert_eq!(result, &single);
    }

    let kinds: Vec<CalculationType> = results.iter().map(|r| r.calculation_type).collect();
    assert_eq!(
        kinds,
        vec![
            CalculationType::Interpolation,
            CalculationType::Interpolation,
            CalculationType::Extrapolation,
            CalculationType::Extrapolation,
        ]
    );
    assert_relative_eq!(results[3].uncertainty_factor, 1.4);
}

#[test]
fn test_inverted_range_is_empty() {
    let (model, series) = cubic();
    let results = evaluate_batch(&model, &series, &BatchRequest::range(2025, 2024, 1), 0.95).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_strict_mode_rejects_inverted_range() {
    let (model, series) = cubic();
    let evaluator = BatchEvaluator::default().strict(true);
    let err = evaluator
        .evaluate_batch(&model, &series, &BatchRequest::range(2025, 2024, 1), 0.95)
        .unwrap_err();
    assert_eq!(err, FitError::InvalidRange { start: 2025, end: 2024, step: 1 });
}

#[test]
fn test_explicit_years_keep_order_duplicates_and_drop_out_of_bounds() {
    let (model, series) = cubic();
    let request = BatchRequest::years_of(vec![2030, 1900, 2005, 2030, 2150]);
    let results = evaluate_batch(&model, &series, &request, 0.95).unwrap();
    let years: Vec<f64> = results.iter().map(|r| r.query_year).collect();
    assert_eq!(years, vec![2030.0, 2005.0, 2030.0]);
    assert_eq!(results[0], results[2]);
}

#[test]
fn test_custom_bounds() {
    let (model, series) = cubic();
    let evaluator = BatchEvaluator::new(IntervalEstimator::default()).with_bounds(YearBounds::new(2000, 2021));
    let results = evaluator
        .evaluate_batch(&model, &series, &BatchRequest::range(1995, 2025, 5), 0.95)
        .unwrap();
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| !r.is_extrapolation()));
}

#[test]
fn test_lazy_iteration_is_restartable() {
    let (model, series) = cubic();
    let evaluator = BatchEvaluator::default();
    let request = BatchRequest::range(2010, 2040, 3);

    let iter = evaluator.iter(&model, &series, &request, 0.95).unwrap();
    assert_eq!(iter.len(), 11);
    let first: Vec<_> = iter.collect::<Result<_, _>>().unwrap();
    let second: Vec<_> = evaluator
        .iter(&model, &series, &request, 0.95)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first, second);

    let mut partial = evaluator.iter(&model, &series, &request, 0.95).unwrap();
    let head = partial.next().unwrap().unwrap();
    assert_eq!(head, first[0]);
    assert_eq!(partial.len(), 10);
}

#[test]
fn test_empty_series_fails() {
    let model = PolynomialModel::new(0.0, vec![1.0]);
    let err = evaluate_batch(&model, &Series::empty(), &BatchRequest::range(2000, 2010, 1), 0.95).unwrap_err();
    assert_eq!(err, FitError::EmptySeries);
}

#[test]
fn test_invalid_confidence_fails_before_evaluation() {
    let (model, series) = cubic();
    let err = evaluate_batch(&model, &series, &BatchRequest::range(2000, 2010, 1), 0.0).unwrap_err();
    assert_eq!(err, FitError::InvalidConfidence(0.0));
}
