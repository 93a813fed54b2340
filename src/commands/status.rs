use crate::services::{default_sources, load_store};
use crate::utils::{format_timestamp, get_data_dir};
use std::path::PathBuf;

pub fn run(data_dir: Option<PathBuf>) {
    println!("📊 Crypto Price Data Status\n");

    let data_dir = data_dir.unwrap_or_else(get_data_dir);
    println!("📁 Data directory: {}\n", data_dir.display());

    let sources = default_sources(&data_dir);
    let (store, report) = load_store(&sources);

    if store.symbol_count() == 0 {
        println!("⚠️  No price data found. Expected {{SYMBOL}}_values.csv files.");
        return;
    }

    println!(
        "📂 Sources: {} ok, {} failed, {} records\n",
        report.sources_ok, report.sources_failed, report.records
    );

    for symbol in store.symbols() {
        println!("🔹 {}", symbol);
        match store.stats(&symbol) {
            Some(stats) => {
                let count = store.series(&symbol).map_or(0, |s| s.len());
                println!(
                    "   Samples: {:>6}  ({} → {})",
                    count,
                    format_timestamp(stats.oldest),
                    format_timestamp(stats.newest)
                );
                println!("   Price:   {} → {}", stats.min, stats.max);
            }
            None => println!("   Samples:      0"),
        }
    }

    println!("\n🏆 Most volatile first: {}", store.rank_symbols().join(" > "));
}
