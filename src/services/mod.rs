pub mod data_store;
pub mod loader;
pub mod query;

pub use data_store::TimeSeriesStore;
pub use loader::{default_sources, load_store, LoadReport, SourceSpec};
pub use query::{QueryService, StatsDocument};
