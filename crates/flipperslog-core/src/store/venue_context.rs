//! Active venue persisted next to the score book.

use tracing::debug;

use crate::error::StorageError;
use crate::models::venue::ActiveVenue;

use super::{ACTIVE_VENUE_KEY, KeyValueStore, Result};

/// The venue new scores get tagged with, if any.
pub struct VenueContext<S> {
    store: S,
}

impl<S: KeyValueStore> VenueContext<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Make this venue the active one, replacing any previous venue.
    pub fn set_active_venue(&self, id: i64, name: &str) -> Result<ActiveVenue> {
        let venue = ActiveVenue {
            id,
            name: name.to_string(),
        };
        let data = serde_json::to_string(&venue).map_err(|e| StorageError::Corrupt {
            key: ACTIVE_VENUE_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(ACTIVE_VENUE_KEY, &data)?;

        debug!("Active venue set to {} ({})", venue.name, venue.id);
        Ok(venue)
    }

    pub fn active_venue(&self) -> Result<Option<ActiveVenue>> {
        match self.store.get(ACTIVE_VENUE_KEY)? {
            Some(data) => serde_json::from_str(&data).map(Some).map_err(|e| {
                StorageError::Corrupt {
                    key: ACTIVE_VENUE_KEY.to_string(),
                    reason: e.to_string(),
                }
            }),
            None => Ok(None),
        }
    }

    pub fn clear_active_venue(&self) -> Result<()> {
        self.store.delete(ACTIVE_VENUE_KEY)
    }
}
