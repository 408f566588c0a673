use std::fs::File;
use std::io::{
    BufReader,
    Read
};
use std::path::Path;

use crate::series::observation::Observation;
use crate::series::series::Series;
use crate::series::seriessource::SourceError;

/// Read a `year,value` CSV with a header row, e.g. a user-edited copy of a
/// downloaded series.
pub fn read_csv<R: Read>(reader: R) -> Result<Series, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let observations = reader
        .deserialize::<Observation>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Series::new(observations)?)
}

pub fn read_csv_path(path: &Path) -> Result<Series, SourceError> {
    let file = File::open(path)?;
    read_csv(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_year_value_rows() {
        let data = "year, value\n2001, 2.5\n2000, 1.5\n";
        let series = read_csv(data.as_bytes()).unwrap();
        assert_eq!(series.years(), vec![2000.0, 2001.0]);
        assert_eq!(series.values(), vec![1.5, 2.5]);
    }

    #[test]
    fn rejects_malformed_values() {
        let data = "year,value\n2001,abc\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(SourceError::CsvParseError(_))));
    }

    #[test]
    fn duplicate_years_surface_as_series_error() {
        let data = "year,value\n2001,1\n2001,2\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(SourceError::Series(_))));
    }
}
