use std::error::Error;
use std::io;

use tracing::info;
use tracing_subscriber::EnvFilter;

use indicatorfit::batch::batchrequest::BatchRequest;
use indicatorfit::configuration::Configuration;
use indicatorfit::report::forecastreport::ForecastReport;
use indicatorfit::series::seriescache::SeriesCache;
use indicatorfit::series::seriessource::{
    FallbackSeriesSource,
    SeriesSource
};
use indicatorfit::series::worldbank::WorldBankFileSource;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Configuration::from_reader(path)?,
        None => Configuration::new()
    };

    let key = config.series_key();
    let synthetic = config.synthetic_source();
    let source: Box<dyn SeriesSource> = match config.data_directory() {
        Some(directory) => Box::new(FallbackSeriesSource::new(WorldBankFileSource::new(directory), synthetic)),
        None => Box::new(synthetic)
    };

    let cache = SeriesCache::new();
    let series = cache.get_or_fetch(&key, &*source)?;
    info!(%key, points = series.len(), range = %series.data_range(), "loaded series");

    let (model, diagnostics) = config.curve_fitter()?.fit_with_diagnostics(&series)?;
    println!("{}", model.equation());
    println!("{}", diagnostics);

    let estimator = config.interval_estimator();
    let mut results = Vec::new();
    if let Some(year) = config.query_year() {
        results.push(estimator.estimate(&model, &series, year as f64, config.confidence())?);
    }

    let default_batch = series
        .max_year()
        .map(|last| BatchRequest::range(last + 1, last + 10, 1));
    if let Some(request) = config.batch().cloned().or(default_batch) {
        let batch = config
            .batch_evaluator()
            .evaluate_batch(&model, &series, &request, config.confidence())?;
        results.extend(batch);
    }

    println!("{:>6} {:>14} {:>14} {:>14}  {:<13} {:>6}", "year", "predicted", "lower", "upper", "type", "factor");
    for result in &results {
        println!(
            "{:>6} {:>14.4} {:>14.4} {:>14.4}  {:<13} {:>6.2}",
            result.query_year,
            result.predicted_value,
            result.lower_bound,
            result.upper_bound,
            result.calculation_type,
            result.uncertainty_factor
        );
    }

    let report = ForecastReport::build(key, model, diagnostics, results);
    println!("{}", report.to_json()?);
    Ok(())
}
