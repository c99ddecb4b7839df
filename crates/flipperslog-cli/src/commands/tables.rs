//! Tables command - list tables and their best scores.

use clap::{Args, Subcommand};

use flipperslog_core::store::sample_tables;

use super::Context;
use super::output::{OutputFormat, render_list};

/// Arguments for the tables command.
#[derive(Args)]
pub struct TablesArgs {
    #[command(subcommand)]
    command: TablesCommand,
}

#[derive(Subcommand)]
enum TablesCommand {
    /// Tables with their top three scores, best first
    List {
        /// Only count scores logged at this venue
        #[arg(long)]
        venue: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Recently played tables
    Recent {
        /// Number of tables (default: storage.quick_select_limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Example tables
    Samples {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

pub async fn run(args: TablesArgs, ctx: &Context) -> anyhow::Result<()> {
    let book = ctx.score_book();

    let output = match args.command {
        TablesCommand::List { venue, format } => {
            let tables = book.tables_with_scores(venue)?;
            if tables.is_empty() && matches!(format, OutputFormat::Text) {
                "No scores logged yet.".to_string()
            } else {
                render_list(&tables, format)?
            }
        }
        TablesCommand::Recent { limit, format } => {
            let limit = limit.unwrap_or(ctx.config.storage.quick_select_limit);
            let tables = book.recent_tables(limit)?;
            if tables.is_empty() && matches!(format, OutputFormat::Text) {
                "No tables played yet.".to_string()
            } else {
                render_list(&tables, format)?
            }
        }
        TablesCommand::Samples { format } => render_list(&sample_tables(), format)?,
    };

    println!("{}", output);
    Ok(())
}
