use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "cryptorec")]
#[command(about = "Crypto price statistics and recommendation service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Directory holding the {SYMBOL}_values.csv source files
        /// (defaults to $CRYPTO_DATA_DIR, then ./crypto_data)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Show a summary of the data set without starting the server
    Status {
        /// Directory holding the {SYMBOL}_values.csv source files
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, data_dir } => {
            commands::serve::run(port, data_dir).await;
        }
        Commands::Status { data_dir } => {
            commands::status::run(data_dir);
        }
    }
}
