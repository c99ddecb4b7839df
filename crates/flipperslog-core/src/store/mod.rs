//! Score book persistence on top of an opaque key-value store.

mod book;
mod file;
mod memory;
mod venue_context;

pub use book::{ScoreBook, sample_tables};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use venue_context::VenueContext;

use crate::error::StorageError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Key of the scores collection.
pub const SCORES_KEY: &str = "@flipperslog:scores";

/// Key of the tables collection.
pub const TABLES_KEY: &str = "@flipperslog:tables";

/// Key of the active venue.
pub const ACTIVE_VENUE_KEY: &str = "@flipperslog:active_venue";

/// String key-value store holding serialized collections.
pub trait KeyValueStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}
