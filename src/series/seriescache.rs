use std::collections::HashMap;
use std::sync::{
    Arc,
    RwLock
};

use tracing::debug;

use crate::series::series::Series;
use crate::series::seriessource::{
    SeriesKey,
    SeriesSource,
    SourceError
};

/// Process-wide cache of published series.
///
/// Published series are never mutated: `publish` swaps in a new `Arc`, so a
/// reader that already holds the previous one keeps a consistent snapshot
/// while a refresh is in progress.
///
/// # Known trade-off: double fetch
/// Two threads missing on the same key at once may both fetch; the later
/// publish wins. Fetches are idempotent, so only work is wasted.
#[derive(Default)]
pub struct SeriesCache {
    map: RwLock<HashMap<SeriesKey, Arc<Series>>>
}

impl SeriesCache {
    pub fn new() -> SeriesCache {
        SeriesCache::default()
    }

    pub fn get(&self, key: &SeriesKey) -> Option<Arc<Series>> {
        let map = self.map.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.get(key).cloned()
    }

    /// Replace whatever is stored under `key` and return the new snapshot.
    pub fn publish(&self, key: SeriesKey, series: Series) -> Arc<Series> {
        let series = Arc::new(series);
        let mut map = self.map.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.insert(key, Arc::clone(&series));
        series
    }

    pub fn get_or_fetch<S>(&self, key: &SeriesKey, source: &S) -> Result<Arc<Series>, SourceError>
    where
        S: SeriesSource + ?Sized {
        if let Some(series) = self.get(key) {
            return Ok(series);
        }
        debug!(%key, "series cache miss");
        let series = source.fetch(key)?;
        Ok(self.publish(key.clone(), series))
    }

    pub fn invalidate(&self, key: &SeriesKey) -> Option<Arc<Series>> {
        let mut map = self.map.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.remove(key)
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::seriessource::SyntheticSeriesSource;

    #[test]
    fn publish_replaces_wholesale() {
        let cache = SeriesCache::new();
        let key = SeriesKey::new("USA", "SP.POP.TOTL");
        let first = cache.publish(key.clone(), Series::from_pairs(&[(2000, 1.0)]).unwrap());
        let held = cache.get(&key).unwrap();

        cache.publish(key.clone(), Series::from_pairs(&[(2000, 2.0), (2001, 3.0)]).unwrap());

        assert_eq!(held.len(), 1);
        assert!(Arc::ptr_eq(&first, &held));
        assert_eq!(cache.get(&key).unwrap().len(), 2);
    }

    #[test]
    fn get_or_fetch_populates_once() {
        let cache = SeriesCache::new();
        let key = SeriesKey::new("FRA", "NY.GDP.MKTP.CD");
        let source = SyntheticSeriesSource::new(2000, 2009);

        let a = cache.get_or_fetch(&key, &source).unwrap();
        let b = cache.get_or_fetch(&key, &source).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        cache.invalidate(&key);
        assert!(cache.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(SeriesCache::new());
        let key = SeriesKey::new("BRA", "FP.CPI.TOTL.ZG");
        let source = SyntheticSeriesSource::new(1990, 2000);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let key = key.clone();
                std::thread::spawn(move || cache.get_or_fetch(&key, &source).unwrap().len())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 11);
        }
    }
}
