use crate::constants::{csv_field, CSV_RECORD_FIELDS};
use crate::error::{AppError, Result};
use crate::models::{PricePoint, SeriesMap, SymbolStats};
use csv::ReaderBuilder;
use std::io::Read;
use tracing::debug;

/// In-memory price history store: symbol -> ordered samples.
///
/// Built once at startup by `load_source` calls, read-only afterwards. Every
/// query is a synchronous linear (or linearithmic) scan over the affected
/// series; nothing is cached or indexed, and nothing in the query path can
/// fail once loading is done.
#[derive(Debug, Default)]
pub struct TimeSeriesStore {
    series: SeriesMap,
}

impl TimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one CSV source.
    ///
    /// The first record is a header and is skipped on position alone, with
    /// no validation of its content. Every following record must decode as
    /// `timestamp,symbol,price`; the first record that does not kills the
    /// whole source — records are buffered and merged into the store only
    /// after the source decoded cleanly, so a malformed source contributes
    /// nothing (a partial series would bias the statistics).
    ///
    /// `symbol_hint` is the symbol the source is named for. It is registered
    /// even when the source has no data rows, so a header-only source still
    /// shows up in the ranking (with an empty series). The symbol stored per
    /// sample comes from the record itself, not the hint.
    ///
    /// Returns the number of records ingested.
    pub fn load_source<R: Read>(&mut self, symbol_hint: &str, reader: R) -> Result<usize> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let mut parsed: Vec<(String, PricePoint)> = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            let line = idx + 2; // 1-based, after the header
            if record.len() != CSV_RECORD_FIELDS {
                return Err(AppError::Parse(format!(
                    "record {}: expected {} fields, got {}",
                    line,
                    CSV_RECORD_FIELDS,
                    record.len()
                )));
            }
            let time: i64 = record[csv_field::TIMESTAMP].parse().map_err(|e| {
                AppError::Parse(format!(
                    "record {}: invalid timestamp {:?}: {}",
                    line,
                    &record[csv_field::TIMESTAMP],
                    e
                ))
            })?;
            let symbol = record[csv_field::SYMBOL].to_string();
            let price: f64 = record[csv_field::PRICE].parse().map_err(|e| {
                AppError::Parse(format!(
                    "record {}: invalid price {:?}: {}",
                    line,
                    &record[csv_field::PRICE],
                    e
                ))
            })?;
            parsed.push((symbol, PricePoint::new(time, price)));
        }

        let count = parsed.len();
        self.series.entry(symbol_hint.to_string()).or_default();
        for (symbol, point) in parsed {
            self.series.entry(symbol).or_default().push(point);
        }
        debug!(symbol = symbol_hint, records = count, "source ingested");
        Ok(count)
    }

    /// Summary statistics for one symbol over its full history.
    ///
    /// `None` when the symbol is unknown or has no samples — callers render
    /// that as an empty result, never an error. Each extreme is computed
    /// independently: the minimum price and the oldest timestamp need not
    /// come from the same sample.
    pub fn stats(&self, symbol: &str) -> Option<SymbolStats> {
        let samples = self.series.get(symbol)?;
        let first = samples.first()?;

        let (mut min, mut max) = (first.price, first.price);
        let (mut oldest, mut newest) = (first.time, first.time);
        for p in &samples[1..] {
            if p.price < min {
                min = p.price;
            }
            if p.price > max {
                max = p.price;
            }
            if p.time < oldest {
                oldest = p.time;
            }
            if p.time > newest {
                newest = p.time;
            }
        }

        Some(SymbolStats {
            symbol: symbol.to_string(),
            min,
            max,
            oldest,
            newest,
        })
    }

    /// All symbols sorted by normalized range, most volatile first.
    ///
    /// Includes every symbol ever ingested, empty ones last (range 0). Ties
    /// break on the symbol string ascending so repeated calls return the
    /// same order.
    pub fn rank_symbols(&self) -> Vec<String> {
        let mut ranked: Vec<(&str, f64)> = self
            .series
            .iter()
            .map(|(symbol, samples)| (symbol.as_str(), normalized_range(samples)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.into_iter().map(|(symbol, _)| symbol.to_string()).collect()
    }

    /// The symbol with the highest normalized range among those that have a
    /// sample at exactly `date`.
    ///
    /// Eligibility is an exact timestamp match — not a calendar window — but
    /// the range of an eligible symbol is still computed over its entire
    /// history. Ties break on the symbol string ascending. `None` when no
    /// symbol has a sample at `date`.
    pub fn highest_range_on_date(&self, date: i64) -> Option<String> {
        let mut best: Option<(&str, f64)> = None;
        for (symbol, samples) in &self.series {
            if !samples.iter().any(|p| p.time == date) {
                continue;
            }
            let range = normalized_range(samples);
            let better = match best {
                None => true,
                Some((best_symbol, best_range)) => {
                    range > best_range || (range == best_range && symbol.as_str() < best_symbol)
                }
            };
            if better {
                best = Some((symbol.as_str(), range));
            }
        }
        best.map(|(symbol, _)| symbol.to_string())
    }

    /// Number of symbols in the store, empty ones included
    pub fn symbol_count(&self) -> usize {
        self.series.len()
    }

    /// Total number of samples across all symbols
    pub fn sample_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// All symbols in the store, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.series.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Read-only view of one symbol's samples, in ingestion order
    pub fn series(&self, symbol: &str) -> Option<&[PricePoint]> {
        self.series.get(symbol).map(Vec::as_slice)
    }
}

/// Normalized range `(max - min) / min` over a full series.
///
/// An empty series has range 0. A series whose minimum price is zero or
/// negative also maps to 0 instead of dividing — the sort comparators rely
/// on the result being finite.
fn normalized_range(samples: &[PricePoint]) -> f64 {
    let Some(first) = samples.first() else {
        return 0.0;
    };
    let (mut min, mut max) = (first.price, first.price);
    for p in &samples[1..] {
        if p.price < min {
            min = p.price;
        }
        if p.price > max {
            max = p.price;
        }
    }
    if min <= 0.0 {
        return 0.0;
    }
    (max - min) / min
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build the CSV text for one source: header plus one record per point.
    fn csv_source(symbol: &str, points: &[(i64, f64)]) -> String {
        let mut out = String::from("timestamp,symbol,price\n");
        for (time, price) in points {
            out.push_str(&format!("{},{},{}\n", time, symbol, price));
        }
        out
    }

    fn store_with(sources: &[(&str, &[(i64, f64)])]) -> TimeSeriesStore {
        let mut store = TimeSeriesStore::new();
        for (symbol, points) in sources {
            let data = csv_source(symbol, points);
            store
                .load_source(symbol, data.as_bytes())
                .expect("fixture source should load");
        }
        store
    }

    #[test]
    fn test_stats_min_max_oldest_newest() {
        let store = store_with(&[(
            "BTC",
            &[
                (1617187200, 35000.0),
                (1617183600, 36000.0),
                (1617190800, 34000.0),
            ],
        )]);

        let stats = store.stats("BTC").unwrap();
        assert_eq!(stats.symbol, "BTC");
        assert_eq!(stats.min, 34000.0);
        assert_eq!(stats.max, 36000.0);
        assert_eq!(stats.oldest, 1617183600);
        assert_eq!(stats.newest, 1617190800);
    }

    #[test]
    fn test_stats_extremes_are_achieved_by_samples() {
        let points = [(100, 5.0), (200, 2.5), (300, 9.0), (400, 7.5)];
        let store = store_with(&[("XRP", &points)]);
        let stats = store.stats("XRP").unwrap();

        for (time, price) in points {
            assert!(stats.min <= price && price <= stats.max);
            assert!(stats.oldest <= time && time <= stats.newest);
        }
        assert!(points.iter().any(|&(_, p)| p == stats.min));
        assert!(points.iter().any(|&(_, p)| p == stats.max));
        assert!(points.iter().any(|&(t, _)| t == stats.oldest));
        assert!(points.iter().any(|&(t, _)| t == stats.newest));
    }

    #[test]
    fn test_stats_unknown_symbol_is_none() {
        let store = store_with(&[("BTC", &[(1, 100.0)])]);
        assert!(store.stats("UNKNOWN").is_none());
    }

    #[test]
    fn test_stats_empty_symbol_is_none() {
        // Header-only source: the symbol exists but has no samples.
        let mut store = TimeSeriesStore::new();
        store.load_source("LTC", "timestamp,symbol,price\n".as_bytes()).unwrap();

        assert_eq!(store.symbol_count(), 1);
        assert!(store.stats("LTC").is_none());
    }

    #[test]
    fn test_ranking_orders_by_normalized_range() {
        // BTC range = 2000/34000 ~ 0.0588, ETH range = 200/2000 = 0.10
        let store = store_with(&[
            ("BTC", &[(1, 34000.0), (2, 36000.0)][..]),
            ("ETH", &[(1, 2000.0), (2, 2200.0)][..]),
        ]);

        assert_eq!(store.rank_symbols(), vec!["ETH", "BTC"]);
    }

    #[test]
    fn test_ranking_is_permutation_of_all_symbols() {
        let store = store_with(&[
            ("BTC", &[(1, 100.0), (2, 150.0)][..]),
            ("ETH", &[(1, 10.0), (2, 11.0)][..]),
            ("DOGE", &[(1, 1.0)][..]),
        ]);

        let ranked = store.rank_symbols();
        assert_eq!(ranked.len(), 3);
        for symbol in ["BTC", "ETH", "DOGE"] {
            assert!(ranked.contains(&symbol.to_string()));
        }
    }

    #[test]
    fn test_ranking_puts_empty_symbols_last() {
        let mut store = store_with(&[("BTC", &[(1, 100.0), (2, 120.0)][..])]);
        store.load_source("XRP", "timestamp,symbol,price\n".as_bytes()).unwrap();

        assert_eq!(store.rank_symbols(), vec!["BTC", "XRP"]);
    }

    #[test]
    fn test_ranking_ties_break_on_symbol() {
        // Identical series => identical range; order must still be stable.
        let points = [(1, 10.0), (2, 12.0)];
        let store = store_with(&[("LTC", &points[..]), ("DOGE", &points[..])]);

        assert_eq!(store.rank_symbols(), vec!["DOGE", "LTC"]);
    }

    #[test]
    fn test_ranking_treats_non_positive_min_as_zero() {
        // min == 0 would divide by zero; the series ranks as if flat.
        let store = store_with(&[
            ("ZRO", &[(1, 0.0), (2, 50000.0)][..]),
            ("ETH", &[(1, 2000.0), (2, 2200.0)][..]),
        ]);

        assert_eq!(store.rank_symbols(), vec!["ETH", "ZRO"]);
    }

    #[test]
    fn test_date_filter_requires_exact_timestamp() {
        let date = 1617187200;
        // BTC has the wider range but only samples around the date, not on it.
        let store = store_with(&[
            ("BTC", &[(date - 1, 30000.0), (date + 1, 40000.0)][..]),
            ("ETH", &[(date, 2000.0), (date + 10, 2010.0)][..]),
        ]);

        assert_eq!(store.highest_range_on_date(date), Some("ETH".to_string()));
    }

    #[test]
    fn test_date_query_ranges_over_full_history() {
        let date = 1000;
        // Both symbols have a sample at the date; DOGE's range comes from
        // history far away from it and must still count.
        let store = store_with(&[
            ("LTC", &[(date, 100.0), (2000, 101.0)][..]),
            ("DOGE", &[(1, 0.05), (date, 0.05), (9999, 0.5)][..]),
        ]);

        assert_eq!(store.highest_range_on_date(date), Some("DOGE".to_string()));
    }

    #[test]
    fn test_date_query_without_match_is_none() {
        let store = store_with(&[("BTC", &[(100, 1.0), (200, 2.0)][..])]);
        assert_eq!(store.highest_range_on_date(150), None);
    }

    #[test]
    fn test_date_query_ties_break_on_symbol() {
        let points = [(42, 10.0), (43, 12.0)];
        let mut store = store_with(&[("LTC", &points[..]), ("DOGE", &points[..])]);
        store.load_source("XRP", csv_source("XRP", &[(42, 5.0), (43, 6.0)]).as_bytes()).unwrap();

        // DOGE, LTC and XRP all share range 0.2 and a sample at 42.
        assert_eq!(store.highest_range_on_date(42), Some("DOGE".to_string()));
    }

    #[test]
    fn test_header_is_skipped_unconditionally() {
        // No header present: the first data record is eaten in its place.
        let data = "1,BTC,100.0\n2,BTC,200.0\n";
        let mut store = TimeSeriesStore::new();
        let count = store.load_source("BTC", data.as_bytes()).unwrap();

        assert_eq!(count, 1);
        assert_eq!(store.series("BTC").unwrap(), &[PricePoint::new(2, 200.0)]);
    }

    #[test]
    fn test_malformed_record_discards_whole_source() {
        let data = "timestamp,symbol,price\n1,BTC,100.0\n2,BTC,not-a-price\n3,BTC,300.0\n";
        let mut store = TimeSeriesStore::new();

        let err = store.load_source("BTC", data.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        // The two well-formed records must not survive either.
        assert_eq!(store.symbol_count(), 0);
        assert!(store.stats("BTC").is_none());
    }

    #[test]
    fn test_wrong_field_count_is_an_error() {
        let mut store = TimeSeriesStore::new();
        let missing = "timestamp,symbol,price\n1,BTC\n";
        assert!(store.load_source("BTC", missing.as_bytes()).is_err());

        let extra = "timestamp,symbol,price\n1,BTC,100.0,bonus\n";
        assert!(store.load_source("BTC", extra.as_bytes()).is_err());
        assert_eq!(store.sample_count(), 0);
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let mut store = TimeSeriesStore::new();
        let data = "timestamp,symbol,price\nyesterday,BTC,100.0\n";
        let err = store.load_source("BTC", data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn test_load_isolation_between_sources() {
        let mut store = TimeSeriesStore::new();
        store
            .load_source("ETH", csv_source("ETH", &[(1, 2000.0), (2, 2200.0)]).as_bytes())
            .unwrap();

        let corrupt = "timestamp,symbol,price\noops\n";
        assert!(store.load_source("BTC", corrupt.as_bytes()).is_err());

        // ETH is untouched, BTC contributed nothing.
        assert_eq!(store.symbols(), vec!["ETH"]);
        let stats = store.stats("ETH").unwrap();
        assert_eq!(stats.min, 2000.0);
        assert_eq!(stats.max, 2200.0);
    }

    #[test]
    fn test_samples_keep_ingestion_order() {
        // Records arrive out of timestamp order and must stay that way.
        let points = [(300, 3.0), (100, 1.0), (200, 2.0)];
        let store = store_with(&[("XRP", &points)]);

        let series = store.series("XRP").unwrap();
        let expected: Vec<PricePoint> =
            points.iter().map(|&(t, p)| PricePoint::new(t, p)).collect();
        assert_eq!(series, expected.as_slice());
    }

    #[test]
    fn test_record_symbol_wins_over_hint() {
        // A source named for one symbol may carry records for another; the
        // record's own symbol decides where the sample lands.
        let data = "timestamp,symbol,price\n1,ETH,2000.0\n";
        let mut store = TimeSeriesStore::new();
        store.load_source("BTC", data.as_bytes()).unwrap();

        assert_eq!(store.symbols(), vec!["BTC", "ETH"]);
        assert!(store.stats("BTC").is_none());
        assert_eq!(store.stats("ETH").unwrap().min, 2000.0);
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let store = store_with(&[
            ("BTC", &[(1, 34000.0), (2, 36000.0)][..]),
            ("ETH", &[(1, 2000.0), (2, 2200.0)][..]),
            ("DOGE", &[(1, 0.05), (2, 0.06)][..]),
        ]);

        assert_eq!(store.rank_symbols(), store.rank_symbols());
        assert_eq!(store.stats("BTC"), store.stats("BTC"));
        assert_eq!(store.highest_range_on_date(1), store.highest_range_on_date(1));
    }
}
