use serde::{Deserialize, Serialize};

/// One observed price for a symbol
///
/// Timestamps are epoch seconds but are only ever compared, never
/// interpreted, so no timezone handling applies. Keeping the timestamp and
/// the price in one struct guarantees the two stay paired; the store never
/// grows them independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation time in epoch seconds
    pub time: i64,

    /// Quoted price
    pub price: f64,
}

impl PricePoint {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}
