use crate::server::{self, HealthState};
use crate::services::{default_sources, load_store, QueryService};
use crate::utils::get_data_dir;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

pub async fn run(port: u16, data_dir: Option<PathBuf>) {
    // Initialize tracing before loading so source errors are visible
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    println!("🚀 Starting cryptorec server on port {}", port);

    let data_dir = data_dir.unwrap_or_else(get_data_dir);
    println!("📁 Data directory: {}", data_dir.display());

    // Load everything before the router exists: no request can ever observe
    // a partially-loaded store.
    let sources = default_sources(&data_dir);
    let (store, report) = load_store(&sources);

    println!("✅ Price data loaded:");
    println!("   📈 Symbols: {}", store.symbol_count());
    println!("   📊 Samples: {}", store.sample_count());
    println!(
        "   📂 Sources: {} ok, {} failed",
        report.sources_ok, report.sources_failed
    );
    if report.sources_ok == 0 {
        eprintln!("⚠️  Warning: no source loaded. Every query will answer empty.");
    }

    let health = Arc::new(HealthState {
        symbols: store.symbol_count(),
        samples: store.sample_count(),
        report,
        started_at: Instant::now(),
    });
    let query = Arc::new(QueryService::new(Arc::new(store)));

    if let Err(e) = server::serve(query, health, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
