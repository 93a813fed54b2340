use crate::constants::{DEFAULT_SYMBOLS, SOURCE_FILE_SUFFIX};
use crate::error::AppError;
use crate::services::data_store::TimeSeriesStore;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One logical feed of raw records: the symbol it is named for and the file
/// backing it
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub symbol: String,
    pub path: PathBuf,
}

/// The fixed source list: `{SYMBOL}_values.csv` under `data_dir` for each
/// default symbol
pub fn default_sources(data_dir: &Path) -> Vec<SourceSpec> {
    DEFAULT_SYMBOLS
        .iter()
        .map(|symbol| SourceSpec {
            symbol: (*symbol).to_string(),
            path: data_dir.join(format!("{}{}", symbol, SOURCE_FILE_SUFFIX)),
        })
        .collect()
}

/// Outcome of a full load pass, for logging and the health endpoint
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub records: usize,
}

/// Load every source into a fresh store, best effort across sources.
///
/// A source that cannot be opened is logged and skipped; a source with a
/// malformed record is logged and discarded in full. Either way the
/// remaining sources still load. The store is only handed back once the
/// whole pass is done, so callers never observe a partially-loaded store.
pub fn load_store(sources: &[SourceSpec]) -> (TimeSeriesStore, LoadReport) {
    let mut store = TimeSeriesStore::new();
    let mut report = LoadReport::default();

    for source in sources {
        let label = source.path.display().to_string();
        let file = match File::open(&source.path) {
            Ok(file) => file,
            Err(e) => {
                let err = if e.kind() == std::io::ErrorKind::NotFound {
                    AppError::NotFound(label.clone())
                } else {
                    AppError::from(e)
                };
                error!(source = %label, "source unavailable, skipping: {}", err);
                report.sources_failed += 1;
                continue;
            }
        };

        match store.load_source(&source.symbol, file) {
            Ok(count) => {
                info!(source = %label, records = count, "source loaded");
                report.sources_ok += 1;
                report.records += count;
            }
            Err(e) => {
                error!(source = %label, "source discarded: {}", e);
                report.sources_failed += 1;
            }
        }
    }

    (store, report)
}
