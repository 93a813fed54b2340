use serde::Serialize;

/// Summary statistics for one symbol's full price history
///
/// Min/max price and oldest/newest timestamp are independent extremes; the
/// minimum price and the oldest timestamp need not come from the same
/// sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolStats {
    pub symbol: String,
    pub min: f64,
    pub max: f64,
    pub oldest: i64,
    pub newest: i64,
}
