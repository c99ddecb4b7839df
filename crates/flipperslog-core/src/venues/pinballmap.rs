//! Pinball Map API client.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::VenueError;
use crate::models::config::VenueConfig;
use crate::models::venue::{Location, MachinePlacement, PinballVenue};

use super::Result;
use super::finder::{RegionSnapshot, machines_at_venue, nearby_venues, search_venues_by_name};

#[derive(Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    locations: Vec<RawLocation>,
}

#[derive(Deserialize)]
struct RawLocation {
    id: i64,
    name: String,
    // Sent as strings by the API
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lon: Value,
}

#[derive(Deserialize)]
struct XrefsResponse {
    #[serde(default)]
    location_machine_xrefs: Vec<RawXref>,
}

#[derive(Deserialize)]
struct RawXref {
    location_id: i64,
    machine: RawMachine,
}

#[derive(Deserialize)]
struct RawMachine {
    name: String,
}

/// Client for the region endpoints of the Pinball Map API.
pub struct PinballMapClient {
    client: reqwest::Client,
    config: VenueConfig,
}

impl PinballMapClient {
    pub fn new(config: VenueConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("flipperslog/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VenueError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Fetch locations and machine placements of every configured region.
    ///
    /// A region whose machine list cannot be fetched contributes its
    /// locations with no machines. Only a failed locations fetch is an error.
    pub async fn fetch_snapshot(&self) -> Result<RegionSnapshot> {
        let mut snapshot = RegionSnapshot::default();

        for region in &self.config.regions {
            let locations: LocationsResponse = self.get_json(region, "locations.json").await?;
            let count = locations.locations.len();
            snapshot
                .locations
                .extend(locations.locations.into_iter().filter_map(into_location));

            snapshot.placements.extend(self.fetch_placements(region).await);

            debug!("Region {}: {} locations", region, count);
        }

        Ok(snapshot)
    }

    async fn fetch_placements(&self, region: &str) -> Vec<MachinePlacement> {
        placements_or_empty(region, self.get_json(region, "location_machine_xrefs.json").await)
    }

    /// Closest venues to the given coordinates.
    pub async fn nearby_venues(&self, latitude: f64, longitude: f64) -> Result<Vec<PinballVenue>> {
        let snapshot = self.fetch_snapshot().await?;
        Ok(nearby_venues(&snapshot, latitude, longitude, &self.config))
    }

    /// Venues whose name contains the query.
    pub async fn search_venues(&self, query: &str) -> Result<Vec<PinballVenue>> {
        let snapshot = self.fetch_snapshot().await?;
        Ok(search_venues_by_name(&snapshot, query))
    }

    /// Machine names at a venue. Empty when the machine lists are unavailable.
    pub async fn machines_at_venue(&self, venue_id: i64) -> Result<Vec<String>> {
        let mut snapshot = RegionSnapshot::default();
        for region in &self.config.regions {
            snapshot.placements.extend(self.fetch_placements(region).await);
        }
        Ok(machines_at_venue(&snapshot, venue_id))
    }

    async fn get_json<T: DeserializeOwned>(&self, region: &str, resource: &str) -> Result<T> {
        let url = format!(
            "{}/region/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            region,
            resource
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VenueError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VenueError::Status(response.status().as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| VenueError::Decode(e.to_string()))
    }
}

fn placements_or_empty(region: &str, xrefs: Result<XrefsResponse>) -> Vec<MachinePlacement> {
    match xrefs {
        Ok(xrefs) => xrefs
            .location_machine_xrefs
            .into_iter()
            .map(|x| MachinePlacement {
                location_id: x.location_id,
                machine_name: x.machine.name,
            })
            .collect(),
        Err(e) => {
            warn!("Machine list for region {} unavailable: {}", region, e);
            Vec::new()
        }
    }
}

fn into_location(raw: RawLocation) -> Option<Location> {
    match (coordinate(&raw.lat), coordinate(&raw.lon)) {
        (Some(lat), Some(lng)) => Some(Location {
            id: raw.id,
            name: raw.name,
            lat,
            lng,
        }),
        _ => {
            warn!("Skipping location {} without usable coordinates", raw.id);
            None
        }
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_locations() {
        let body = r#"{"locations": [
            {"id": 1, "name": "Ice Box Arcade", "lat": "47.6127", "lon": "-122.3331"},
            {"id": 2, "name": "Numeric", "lat": 47.5, "lon": -122.5},
            {"id": 3, "name": "Broken", "lat": null, "lon": "x"}
        ]}"#;
        let parsed: LocationsResponse = serde_json::from_str(body).unwrap();
        let locations: Vec<Location> = parsed.locations.into_iter().filter_map(into_location).collect();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].lat, 47.6127);
        assert_eq!(locations[1].lng, -122.5);
    }

    #[test]
    fn test_decode_xrefs() {
        let body = r#"{"location_machine_xrefs": [
            {"location_id": 1, "machine": {"name": "Medieval Madness", "year": 1997, "manufacturer": "Williams"}}
        ]}"#;
        let parsed: XrefsResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.location_machine_xrefs.len(), 1);
        assert_eq!(parsed.location_machine_xrefs[0].machine.name, "Medieval Madness");
    }

    #[test]
    fn test_missing_lists_default_empty() {
        let parsed: LocationsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.locations.is_empty());
    }

    #[test]
    fn test_failed_machine_list_leaves_venues_without_machines() {
        let placements = placements_or_empty("seattle", Err(VenueError::Status(500)));
        assert!(placements.is_empty());

        let snapshot = RegionSnapshot {
            locations: vec![Location {
                id: 1,
                name: "Ice Box Arcade".to_string(),
                lat: 47.6127,
                lng: -122.3331,
            }],
            placements,
        };
        let venues = nearby_venues(&snapshot, 47.6127, -122.3331, &VenueConfig::default());

        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].machine_count, 0);
        assert!(machines_at_venue(&snapshot, 1).is_empty());
    }

    #[test]
    fn test_machine_list_is_kept() {
        let body = r#"{"location_machine_xrefs": [
            {"location_id": 1, "machine": {"name": "Medieval Madness"}},
            {"location_id": 1, "machine": {"name": "Attack from Mars"}}
        ]}"#;
        let placements = placements_or_empty("seattle", Ok(serde_json::from_str(body).unwrap()));

        assert_eq!(placements.len(), 2);
        assert_eq!(placements[1].machine_name, "Attack from Mars");
    }
}
