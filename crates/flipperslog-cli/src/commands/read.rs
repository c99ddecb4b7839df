//! Read command - read the score from a single scoreboard photo.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use flipperslog_core::{AnthropicClient, ScoreReader, VisionOutcome};

use super::output::{OutputFormat, render_one};
use super::{Context, scores::today};

/// Arguments for the read command.
#[derive(Args)]
pub struct ReadArgs {
    /// Scoreboard photo
    #[arg(required = true)]
    photo: PathBuf,

    /// Store the reading in the score book
    #[arg(long)]
    save: bool,

    /// Date of the game (default: now)
    #[arg(long)]
    date: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ReadArgs, ctx: &Context) -> anyhow::Result<()> {
    let reader = score_reader(ctx)?;
    if !reader.has_model() {
        eprintln!(
            "{} No API key found. Set ANTHROPIC_API_KEY or vision.api_key.",
            style("!").yellow()
        );
    }

    let pb = spinner(&format!("Reading {}", args.photo.display()));
    let outcome = reader.analyze_photo(&args.photo).await;
    pb.finish_and_clear();

    println!("{}", render_one(&outcome, args.format)?);

    if args.save {
        save_outcome(ctx, outcome, &args.photo, args.date)?;
    }

    Ok(())
}

pub(crate) fn score_reader(ctx: &Context) -> anyhow::Result<ScoreReader<AnthropicClient>> {
    let client = AnthropicClient::from_config(&ctx.config.vision)
        .context("Failed to create vision client")?;
    Ok(ScoreReader::new(client, ctx.config.vision.clone()))
}

/// Store an authoritative reading, tagged with the active venue.
pub(crate) fn save_outcome(
    ctx: &Context,
    outcome: VisionOutcome,
    photo: &std::path::Path,
    date: Option<String>,
) -> anyhow::Result<()> {
    if outcome.is_mock_data {
        anyhow::bail!(
            "Not saving placeholder reading: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    let mut new = outcome.into_new_score(date.unwrap_or_else(today))?;
    new.photo_uri = Some(photo.display().to_string());
    new.venue_id = ctx.venue_context().active_venue()?.map(|v| v.id);

    let score = ctx.score_book().add_score(new)?;
    info!("Saved score {} as {}", score.score, score.id);
    println!("{} Saved score {}", style("✓").green(), score.id);
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
