//! Venue search over a snapshot of Pinball Map regions.

use crate::models::config::VenueConfig;
use crate::models::venue::{Location, MachinePlacement, PinballVenue};

use super::distance::haversine_km;

/// Locations and machine placements of the searched regions.
#[derive(Debug, Clone, Default)]
pub struct RegionSnapshot {
    pub locations: Vec<Location>,
    pub placements: Vec<MachinePlacement>,
}

impl RegionSnapshot {
    /// Number of machines placed at a location.
    pub fn machine_count(&self, location_id: i64) -> usize {
        self.placements
            .iter()
            .filter(|p| p.location_id == location_id)
            .count()
    }

    fn venue(&self, location: &Location, distance: f64) -> PinballVenue {
        PinballVenue {
            id: location.id,
            name: location.name.clone(),
            latitude: location.lat,
            longitude: location.lng,
            machine_count: self.machine_count(location.id),
            distance,
        }
    }
}

/// Venues within `radius_km` of the point, in snapshot order.
pub fn venues_within_radius(
    snapshot: &RegionSnapshot,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> Vec<PinballVenue> {
    snapshot
        .locations
        .iter()
        .filter_map(|loc| {
            let distance = haversine_km(latitude, longitude, loc.lat, loc.lng);
            (distance <= radius_km).then(|| snapshot.venue(loc, distance))
        })
        .collect()
}

/// Closest venues to the point.
///
/// Searches the configured radius first and the expanded radius only when
/// nothing was found. Results are sorted by distance and capped at
/// `max_results`.
pub fn nearby_venues(
    snapshot: &RegionSnapshot,
    latitude: f64,
    longitude: f64,
    config: &VenueConfig,
) -> Vec<PinballVenue> {
    let mut venues = venues_within_radius(snapshot, latitude, longitude, config.search_radius_km);
    if venues.is_empty() {
        venues = venues_within_radius(snapshot, latitude, longitude, config.expanded_radius_km);
    }

    venues.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    venues.truncate(config.max_results);
    venues
}

/// Venues whose name contains the query, ignoring case. Distance is zero.
pub fn search_venues_by_name(snapshot: &RegionSnapshot, query: &str) -> Vec<PinballVenue> {
    let query = query.trim().to_lowercase();
    snapshot
        .locations
        .iter()
        .filter(|loc| loc.name.to_lowercase().contains(&query))
        .map(|loc| snapshot.venue(loc, 0.0))
        .collect()
}

/// Names of the machines placed at a venue.
pub fn machines_at_venue(snapshot: &RegionSnapshot, venue_id: i64) -> Vec<String> {
    snapshot
        .placements
        .iter()
        .filter(|p| p.location_id == venue_id)
        .map(|p| p.machine_name.clone())
        .collect()
}
