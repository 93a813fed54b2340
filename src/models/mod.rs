mod price_point;
mod stats;

pub use price_point::PricePoint;
pub use stats::SymbolStats;

use std::collections::HashMap;

/// Price history for a single symbol, in ingestion order
pub type PriceSeries = Vec<PricePoint>;

/// Full data set (symbol -> price history)
pub type SeriesMap = HashMap<String, PriceSeries>;
