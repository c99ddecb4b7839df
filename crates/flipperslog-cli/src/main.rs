//! CLI application for logging pinball high scores.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{Context, batch, config, extract, read, scores, tables, venues};

/// Flipperslog - Read pinball scoreboard photos and keep a score book
#[derive(Parser)]
#[command(name = "flipperslog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the score book
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the score from a scoreboard photo
    Read(read::ReadArgs),

    /// Read scores from multiple photos
    Batch(batch::BatchArgs),

    /// Extract a reading from a saved model response
    Extract(extract::ExtractArgs),

    /// Manage logged scores
    Scores(scores::ScoresArgs),

    /// List tables
    Tables(tables::TablesArgs),

    /// Find venues and set the active venue
    Venues(venues::VenuesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let load = || Context::load(cli.config.as_deref(), cli.data_dir.as_deref());

    // Execute command
    match cli.command {
        Commands::Read(args) => read::run(args, &load()?).await,
        Commands::Batch(args) => batch::run(args, &load()?).await,
        Commands::Extract(args) => extract::run(args).await,
        Commands::Scores(args) => scores::run(args, &load()?).await,
        Commands::Tables(args) => tables::run(args, &load()?).await,
        Commands::Venues(args) => venues::run(args, &load()?).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
