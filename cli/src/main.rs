mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(version, about = "FFXIV chat log classifier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the event group tree.
    Taxonomy {
        /// Chat code document to load instead of the bundled one.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Classify a `HEXCODE|line` replay file and print counts.
    Classify {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Run a scripted fight through a timeline and print the result as JSON.
    Demo {
        /// Print a short table instead of JSON.
        #[arg(long)]
        summary: bool,
    },
}

/// Log to XIVPARSE_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("XIVPARSE_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Taxonomy { file } => commands::print_taxonomy(file.as_deref()),
        Commands::Classify { input, file } => commands::classify(&input, file.as_deref()),
        Commands::Demo { summary } => commands::demo(summary).await,
    }
}
