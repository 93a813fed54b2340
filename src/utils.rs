use chrono::DateTime;
use std::path::PathBuf;

/// Get the crypto data directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var("CRYPTO_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("crypto_data"))
}

/// Format an epoch-seconds timestamp for display (UTC)
pub fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}
