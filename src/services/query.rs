use crate::constants::NO_DATA_SENTINEL;
use crate::services::data_store::TimeSeriesStore;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Ordered key/value document handed to the serialization boundary
pub type StatsDocument = Map<String, Value>;

/// Read-only facade between the store and the HTTP layer.
///
/// Pure delegation: translates query parameters into store calls and shapes
/// the results into the boundary's generic containers, so the store's own
/// types never leak into the wire format. Holds the store behind an `Arc`
/// and never mutates it.
pub struct QueryService {
    store: Arc<TimeSeriesStore>,
}

impl QueryService {
    pub fn new(store: Arc<TimeSeriesStore>) -> Self {
        Self { store }
    }

    /// Stats for one symbol as an ordered document
    /// (`symbol, min, max, oldest, newest`), empty when the symbol is
    /// unknown or has no samples.
    pub fn stats(&self, symbol: &str) -> StatsDocument {
        let mut doc = StatsDocument::new();
        if let Some(stats) = self.store.stats(symbol) {
            doc.insert("symbol".to_string(), Value::from(stats.symbol));
            doc.insert("min".to_string(), Value::from(stats.min));
            doc.insert("max".to_string(), Value::from(stats.max));
            doc.insert("oldest".to_string(), Value::from(stats.oldest));
            doc.insert("newest".to_string(), Value::from(stats.newest));
        }
        doc
    }

    /// Every symbol in the store, most volatile first
    pub fn top_symbols(&self) -> Vec<String> {
        self.store.rank_symbols()
    }

    /// The most volatile symbol with a sample at exactly `date`, or the
    /// no-data sentinel
    pub fn highest_range_on_date(&self, date: i64) -> String {
        self.store
            .highest_range_on_date(date)
            .unwrap_or_else(|| NO_DATA_SENTINEL.to_string())
    }
}
