//! Source Format Constants
//!
//! Defines the structure of the CSV source files the service ingests.
//!
//! Each source file carries a single header line followed by records of the
//! form `timestamp,symbol,price`, one file per symbol
//! (e.g. `BTC_values.csv`).

/// Number of fields in a source record (timestamp, symbol, price)
pub const CSV_RECORD_FIELDS: usize = 3;

/// Field indices for source records (0-indexed)
pub mod csv_field {
    pub const TIMESTAMP: usize = 0;
    pub const SYMBOL: usize = 1;
    pub const PRICE: usize = 2;
}

/// Symbols loaded at startup, one source file each
pub const DEFAULT_SYMBOLS: [&str; 5] = ["BTC", "DOGE", "ETH", "LTC", "XRP"];

/// Source file name suffix: `{SYMBOL}_values.csv`
pub const SOURCE_FILE_SUFFIX: &str = "_values.csv";

/// Returned by the highest-range query when no symbol has a sample at the
/// requested date
pub const NO_DATA_SENTINEL: &str = "No data available";
