//! Venue lookup against Pinball Map location data.
//!
//! Data courtesy of Pinball Map (https://pinballmap.com), the
//! community-maintained database of pinball locations and machines.

mod distance;
mod finder;
#[cfg(feature = "http")]
mod pinballmap;

pub use distance::haversine_km;
pub use finder::{RegionSnapshot, machines_at_venue, nearby_venues, search_venues_by_name, venues_within_radius};
#[cfg(feature = "http")]
pub use pinballmap::PinballMapClient;

use crate::error::VenueError;

/// Result type for venue operations.
pub type Result<T> = std::result::Result<T, VenueError>;
