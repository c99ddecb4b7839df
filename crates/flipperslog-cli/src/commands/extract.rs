//! Extract command - pull a reading out of a saved model response.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use flipperslog_core::{JsonResponseExtractor, ResponseExtractor, VisionOutcome};

use super::output::{OutputFormat, render_one};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// File holding the response text, or "-" for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the full outcome, substituting the placeholder reading on failure
    #[arg(long)]
    outcome: bool,
}

pub async fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let raw = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input)?
    };

    let extractor = JsonResponseExtractor::new();
    let result = extractor.extract(&raw);

    let output = if args.outcome {
        let outcome = match result {
            Ok(result) => VisionOutcome::from_extraction(result),
            Err(e) => VisionOutcome::sentinel(e.to_string()),
        };
        render_one(&outcome, args.format)?
    } else {
        render_one(&result?, args.format)?
    };

    println!("{}", output);
    Ok(())
}
