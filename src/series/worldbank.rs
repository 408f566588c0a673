use std::fs::File;
use std::io::{
    BufReader,
    Read
};
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::series::observation::Observation;
use crate::series::series::Series;
use crate::series::seriessource::{
    SeriesKey,
    SeriesSource,
    SourceError
};

// Payload shape of the public indicator API:
//
//   [ { "page": 1, "pages": 1, "total": 64, ... },
//     [ { "date": "2023", "value": 27360935000000.0, ... },
//       { "date": "2022", "value": null, ... } ] ]
//
// Error responses are a single-element array holding a "message" object.

#[derive(Deserialize)]
struct DataPointJsonProp {
    date: String,
    value: Option<f64>
}

/// Parse an indicator payload into a validated series.
///
/// Entries without a value or with a non-year date are skipped; the API
/// returns newest first, `Series::new` restores ascending order.
pub fn parse_payload<R: Read>(reader: R) -> Result<Series, SourceError> {
    let json_value: serde_json::Value = serde_json::from_reader(reader)?;
    let pages = json_value
        .as_array()
        .ok_or_else(|| SourceError::Format("expected a top-level array".to_owned()))?;

    let data = match pages.get(1) {
        Some(data) if data.is_array() => data.clone(),
        Some(serde_json::Value::Null) => return Ok(Series::empty()),
        _ => {
            let message = pages
                .first()
                .and_then(|meta| meta.get("message"))
                .map(|message| message.to_string())
                .unwrap_or_else(|| "missing data page".to_owned());
            return Err(SourceError::Format(message));
        }
    };

    let points: Vec<DataPointJsonProp> = serde_json::from_value(data)?;
    let total = points.len();
    let observations: Vec<Observation> = points
        .into_iter()
        .filter_map(|point| {
            let year = point.date.trim().parse::<i32>().ok()?;
            point.value.map(|value| Observation::new(year, value))
        })
        .collect();

    debug!(kept = observations.len(), total, "parsed indicator payload");
    Ok(Series::new(observations)?)
}

/// Reads previously downloaded payloads named `{country}_{indicator}.json`
/// from a directory.
#[derive(Debug, Clone)]
pub struct WorldBankFileSource {
    directory: PathBuf
}

impl WorldBankFileSource {
    pub fn new(directory: impl Into<PathBuf>) -> WorldBankFileSource {
        WorldBankFileSource { directory: directory.into() }
    }

    pub fn path_for(&self, key: &SeriesKey) -> PathBuf {
        self.directory.join(format!("{}_{}.json", key.country(), key.indicator()))
    }
}

impl SeriesSource for WorldBankFileSource {
    fn fetch(&self, key: &SeriesKey) -> Result<Series, SourceError> {
        let file = File::open(self.path_for(key))?;
        parse_payload(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_newest_first_and_skips_nulls() {
        let payload = r#"[
            {"page": 1, "pages": 1, "per_page": 50, "total": 4},
            [
                {"date": "2003", "value": 4.0},
                {"date": "2002", "value": null},
                {"date": "2001", "value": 2.0},
                {"date": "2000", "value": 1.0}
            ]
        ]"#;
        let series = parse_payload(payload.as_bytes()).unwrap();
        assert_eq!(series.years(), vec![2000.0, 2001.0, 2003.0]);
        assert_eq!(series.values(), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn skips_non_year_dates() {
        let payload = r#"[{}, [{"date": "2001Q1", "value": 1.0}, {"date": "2001", "value": 2.0}]]"#;
        let series = parse_payload(payload.as_bytes()).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn error_message_is_reported() {
        let payload = r#"[{"message": [{"id": "120", "value": "Invalid value"}]}]"#;
        let err = parse_payload(payload.as_bytes()).unwrap_err();
        assert!(matches!(err, SourceError::Format(message) if message.contains("Invalid value")));
    }

    #[test]
    fn null_page_is_empty() {
        let payload = r#"[{"page": 0, "pages": 0, "total": 0}, null]"#;
        assert!(parse_payload(payload.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn file_naming() {
        let source = WorldBankFileSource::new("/data");
        let path = source.path_for(&SeriesKey::new("USA", "SP.POP.TOTL"));
        assert_eq!(path, PathBuf::from("/data/USA_SP.POP.TOTL.json"));
    }
}
