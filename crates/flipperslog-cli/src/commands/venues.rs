//! Venues command - look up venues on Pinball Map and set the active one.

use clap::{Args, Subcommand};
use console::style;

use flipperslog_core::PinballMapClient;

use super::Context;
use super::output::{OutputFormat, render_list};

/// Arguments for the venues command.
#[derive(Args)]
pub struct VenuesArgs {
    #[command(subcommand)]
    command: VenuesCommand,
}

#[derive(Subcommand)]
enum VenuesCommand {
    /// Venues closest to a position
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Venues whose name contains the query
    Search {
        query: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Machines at a venue
    Machines { venue_id: i64 },

    /// Tag new scores with this venue
    Use { venue_id: i64, name: String },

    /// Stop tagging new scores with a venue
    Clear,

    /// Show the active venue
    Current,
}

pub async fn run(args: VenuesArgs, ctx: &Context) -> anyhow::Result<()> {
    match args.command {
        VenuesCommand::Nearby { lat, lon, format } => {
            let venues = client(ctx)?.nearby_venues(lat, lon).await?;
            if venues.is_empty() && matches!(format, OutputFormat::Text) {
                println!("No venues within {} km.", ctx.config.venues.expanded_radius_km);
            } else {
                println!("{}", render_list(&venues, format)?);
            }
        }
        VenuesCommand::Search { query, format } => {
            let venues = client(ctx)?.search_venues(&query).await?;
            if venues.is_empty() && matches!(format, OutputFormat::Text) {
                println!("No venues matching {:?}.", query);
            } else {
                println!("{}", render_list(&venues, format)?);
            }
        }
        VenuesCommand::Machines { venue_id } => {
            let machines = client(ctx)?.machines_at_venue(venue_id).await?;
            if machines.is_empty() {
                println!("No machines listed for venue {}.", venue_id);
            }
            for machine in machines {
                println!("{}", machine);
            }
        }
        VenuesCommand::Use { venue_id, name } => {
            let venue = ctx.venue_context().set_active_venue(venue_id, &name)?;
            println!(
                "{} Active venue: {} ({})",
                style("✓").green(),
                venue.name,
                venue.id
            );
        }
        VenuesCommand::Clear => {
            ctx.venue_context().clear_active_venue()?;
            println!("{} Active venue cleared", style("✓").green());
        }
        VenuesCommand::Current => match ctx.venue_context().active_venue()? {
            Some(venue) => println!("{} ({})", venue.name, venue.id),
            None => println!("No active venue."),
        },
    }

    Ok(())
}

fn client(ctx: &Context) -> anyhow::Result<PinballMapClient> {
    Ok(PinballMapClient::new(ctx.config.venues.clone())?)
}
