//! Scores command - list and edit logged scores.

use chrono::{SecondsFormat, Utc};
use clap::{Args, Subcommand};
use console::style;

use flipperslog_core::models::score::{format_score_date, parse_score_input};
use flipperslog_core::{NewScore, ScoreUpdate};

use super::Context;
use super::output::{OutputFormat, render_list, render_one};

/// Arguments for the scores command.
#[derive(Args)]
pub struct ScoresArgs {
    #[command(subcommand)]
    command: ScoresCommand,
}

#[derive(Subcommand)]
enum ScoresCommand {
    /// List scores
    List {
        /// Only scores on this table (case-insensitive)
        #[arg(short, long)]
        table: Option<String>,

        /// Only scores logged at this venue
        #[arg(long)]
        venue: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a single score
    Show {
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Log a score by hand
    Add(AddArgs),

    /// Change a logged score
    Edit(EditArgs),

    /// Delete a logged score
    Delete { id: String },
}

#[derive(Args)]
struct AddArgs {
    /// Score as shown on the display; separators are ignored
    score: String,

    /// Table name
    #[arg(short, long)]
    table: Option<String>,

    /// Date of the game (default: now)
    #[arg(long)]
    date: Option<String>,

    /// Photo of the scoreboard
    #[arg(long)]
    photo: Option<String>,

    /// Venue id (default: the active venue)
    #[arg(long, conflicts_with = "no_venue")]
    venue: Option<i64>,

    /// Do not tag the score with the active venue
    #[arg(long)]
    no_venue: bool,
}

#[derive(Args)]
struct EditArgs {
    id: String,

    /// New score
    #[arg(long)]
    score: Option<String>,

    /// New table name
    #[arg(short, long)]
    table: Option<String>,

    /// New date
    #[arg(long)]
    date: Option<String>,

    /// New photo
    #[arg(long)]
    photo: Option<String>,
}

pub async fn run(args: ScoresArgs, ctx: &Context) -> anyhow::Result<()> {
    let book = ctx.score_book();

    match args.command {
        ScoresCommand::List { table, venue, format } => {
            let scores: Vec<_> = book
                .scores()?
                .into_iter()
                .filter(|s| match &table {
                    Some(name) => s
                        .table_name
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(name.trim())),
                    None => true,
                })
                .filter(|s| venue.is_none() || s.venue_id == venue)
                .collect();

            if scores.is_empty() && matches!(format, OutputFormat::Text) {
                println!("No scores logged yet.");
            } else {
                println!("{}", render_list(&scores, format)?);
            }
        }
        ScoresCommand::Show { id, format } => {
            let score = book
                .score_by_id(&id)?
                .ok_or_else(|| anyhow::anyhow!("Score not found: {}", id))?;
            println!("{}", render_one(&score, format)?);
        }
        ScoresCommand::Add(add) => {
            let score = parse_score(&add.score)?;
            let date = match add.date {
                Some(date) => check_date(date)?,
                None => today(),
            };
            let venue_id = if add.no_venue {
                None
            } else {
                match add.venue {
                    Some(id) => Some(id),
                    None => ctx.venue_context().active_venue()?.map(|v| v.id),
                }
            };

            let stored = book.add_score(NewScore {
                score,
                table_name: add.table,
                date,
                photo_uri: add.photo,
                venue_id,
            })?;
            println!("{} Added score {}", style("✓").green(), stored.id);
        }
        ScoresCommand::Edit(edit) => {
            let update = ScoreUpdate {
                score: edit.score.as_deref().map(parse_score).transpose()?,
                table_name: edit.table,
                date: edit.date.map(check_date).transpose()?,
                photo_uri: edit.photo,
            };
            let stored = book.update_score(&edit.id, update)?;
            println!("{} Updated score {}", style("✓").green(), stored.id);
        }
        ScoresCommand::Delete { id } => {
            let removed = book.delete_score(&id)?;
            println!("{} Deleted score {}", style("✓").green(), removed.id);
        }
    }

    Ok(())
}

/// Current time as an RFC 3339 timestamp in UTC.
pub fn today() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_score(input: &str) -> anyhow::Result<u64> {
    parse_score_input(input)
        .ok_or_else(|| anyhow::anyhow!("Invalid score: {:?} (expected a number above zero)", input))
}

fn check_date(date: String) -> anyhow::Result<String> {
    if format_score_date(&date).is_none() {
        anyhow::bail!("Invalid date: {:?} (expected YYYY-MM-DD or RFC 3339)", date);
    }
    Ok(date)
}
