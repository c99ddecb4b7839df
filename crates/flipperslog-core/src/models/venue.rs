//! Venue models backed by Pinball Map location data.

use serde::{Deserialize, Serialize};

/// The venue new scores are tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveVenue {
    pub id: i64,
    pub name: String,
}

/// A venue returned by a lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinballVenue {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub machine_count: usize,

    /// Distance from the query point in kilometers. Zero for name searches.
    pub distance: f64,
}

/// A location as listed by Pinball Map.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// A machine placed at a location.
#[derive(Debug, Clone, PartialEq)]
pub struct MachinePlacement {
    pub location_id: i64,
    pub machine_name: String,
}
