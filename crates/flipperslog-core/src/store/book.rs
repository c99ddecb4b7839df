//! Score book: CRUD over the scores and tables collections.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::score::{NewScore, NewTable, Score, ScoreUpdate, Table, TableWithScores};

use super::{KeyValueStore, Result, SCORES_KEY, TABLES_KEY};

/// Number of scores kept per table in [`ScoreBook::tables_with_scores`].
const TOP_SCORES_PER_TABLE: usize = 3;

/// Scores and tables stored on a key-value store.
///
/// Every operation reads the collections it needs, applies the change and
/// writes them back. Tables are created on demand when a score names them
/// and removed once their last score is gone.
pub struct ScoreBook<S> {
    store: S,
}

impl<S: KeyValueStore> ScoreBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All stored scores, in insertion order.
    pub fn scores(&self) -> Result<Vec<Score>> {
        self.read_list(SCORES_KEY)
    }

    /// A score by id.
    pub fn score_by_id(&self, id: &str) -> Result<Option<Score>> {
        Ok(self.scores()?.into_iter().find(|s| s.id == id))
    }

    /// Store a new score and mark its table as just used.
    pub fn add_score(&self, new: NewScore) -> Result<Score> {
        let mut scores = self.scores()?;
        let mut tables = self.tables()?;
        let table_name = normalize_name(new.table_name)?;

        if let Some(name) = &table_name {
            touch_table(&mut tables, name, &now());
        }

        let score = Score {
            id: next_id(scores.iter().map(|s| s.id.as_str())),
            table_id: None,
            table_name,
            score: new.score,
            date: new.date,
            photo_uri: new.photo_uri,
            venue_id: new.venue_id,
        };
        scores.push(score.clone());

        self.write_collections(&scores, &tables)?;

        info!(
            "Added score {} on {}",
            score.score,
            score.table_name.as_deref().unwrap_or("no table")
        );
        Ok(score)
    }

    /// Apply a partial update to a score.
    ///
    /// Naming a table marks it as used. When the score moves to another
    /// table, the old table is dropped if no other score references it.
    pub fn update_score(&self, id: &str, update: ScoreUpdate) -> Result<Score> {
        let mut scores = self.scores()?;
        let mut tables = self.tables()?;

        let idx = scores
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StorageError::ScoreNotFound(id.to_string()))?;
        let previous = scores[idx].clone();

        {
            let score = &mut scores[idx];
            if let Some(value) = update.score {
                score.score = value;
            }
            if let Some(date) = update.date {
                score.date = date;
            }
            if let Some(photo_uri) = update.photo_uri {
                score.photo_uri = Some(photo_uri);
            }
            if let Some(name) = normalize_name(update.table_name)? {
                touch_table(&mut tables, &name, &now());
                score.table_name = Some(name);
                score.table_id = None;
            }
        }

        remove_orphaned_tables(&mut tables, &scores, &previous);

        self.write_collections(&scores, &tables)?;

        debug!("Updated score {}", id);
        Ok(scores.swap_remove(idx))
    }

    /// Delete a score, dropping its table if it was the table's last score.
    pub fn delete_score(&self, id: &str) -> Result<Score> {
        let mut scores = self.scores()?;
        let mut tables = self.tables()?;

        let idx = scores
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StorageError::ScoreNotFound(id.to_string()))?;
        let removed = scores.remove(idx);

        remove_orphaned_tables(&mut tables, &scores, &removed);

        self.write_collections(&scores, &tables)?;

        info!("Deleted score {}", id);
        Ok(removed)
    }

    /// All stored tables, in insertion order.
    pub fn tables(&self) -> Result<Vec<Table>> {
        self.read_list(TABLES_KEY)
    }

    /// Store a table unless one with the same name (ignoring case) exists.
    ///
    /// Returns the existing table in that case.
    pub fn save_table(&self, new: NewTable) -> Result<Table> {
        let mut tables = self.tables()?;
        let name = normalize_name(Some(new.name))?
            .ok_or_else(|| StorageError::Invalid("table name is empty".to_string()))?;

        if let Some(existing) = tables.iter().find(|t| t.name.eq_ignore_ascii_case(&name)) {
            return Ok(existing.clone());
        }

        let table = Table {
            id: next_id(tables.iter().map(|t| t.id.as_str())),
            name,
            manufacturer: new.manufacturer,
            year: new.year,
            last_used_date: new.last_used_date,
        };
        tables.push(table.clone());
        self.write_list(TABLES_KEY, &tables)?;

        debug!("Saved table {}", table.name);
        Ok(table)
    }

    /// Most recently used tables first, at most `limit`.
    pub fn recent_tables(&self, limit: usize) -> Result<Vec<Table>> {
        let mut tables = self.tables()?;
        tables.sort_by_key(|t| std::cmp::Reverse(last_used(t)));
        tables.truncate(limit);
        Ok(tables)
    }

    /// Tables with their top scores, best table first.
    ///
    /// With a venue, only scores logged at that venue count. Tables left
    /// without scores are omitted.
    pub fn tables_with_scores(&self, venue_id: Option<i64>) -> Result<Vec<TableWithScores>> {
        let tables = self.tables()?;
        let scores = self.scores()?;

        let mut result: Vec<TableWithScores> = tables
            .into_iter()
            .map(|table| {
                let mut top_scores: Vec<Score> = scores
                    .iter()
                    .filter(|s| s.belongs_to(&table))
                    .filter(|s| venue_id.is_none() || s.venue_id == venue_id)
                    .cloned()
                    .collect();
                top_scores.sort_by(|a, b| b.score.cmp(&a.score));
                top_scores.truncate(TOP_SCORES_PER_TABLE);
                TableWithScores { table, top_scores }
            })
            .filter(|t| !t.top_scores.is_empty())
            .collect();

        result.sort_by(|a, b| b.best().cmp(&a.best()));
        Ok(result)
    }

    /// Remove every score and table.
    pub fn clear_all(&self) -> Result<()> {
        self.store.delete(SCORES_KEY)?;
        self.store.delete(TABLES_KEY)?;
        info!("Cleared score book");
        Ok(())
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get(key)? {
            Some(data) => serde_json::from_str(&data).map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Tables go first: a failed second write leaves at worst an unused
    /// table, never a score pointing at a missing one. The two writes are
    /// not atomic together.
    fn write_collections(&self, scores: &[Score], tables: &[Table]) -> Result<()> {
        self.write_list(TABLES_KEY, tables)?;
        self.write_list(SCORES_KEY, scores)
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let data = serde_json::to_string(items).map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(key, &data)
    }
}

/// Built-in tables offered when the user has none yet.
pub fn sample_tables() -> Vec<Table> {
    [
        ("sample-1", "Medieval Madness", "Williams", 1997),
        ("sample-2", "Attack from Mars", "Bally", 1995),
        ("sample-3", "The Addams Family", "Bally", 1992),
    ]
    .into_iter()
    .map(|(id, name, manufacturer, year)| Table {
        id: id.to_string(),
        name: name.to_string(),
        manufacturer: Some(manufacturer.to_string()),
        year: Some(year),
        last_used_date: None,
    })
    .collect()
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn last_used(table: &Table) -> Option<DateTime<Utc>> {
    table
        .last_used_date
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc))
}

/// Trimmed name, `None` when absent; an all-blank name is rejected.
fn normalize_name(name: Option<String>) -> Result<Option<String>> {
    match name {
        None => Ok(None),
        Some(name) => {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(StorageError::Invalid("table name is empty".to_string()))
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
    }
}

/// Millisecond timestamp id, bumped until it collides with no existing id.
fn next_id<'a>(existing: impl Iterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = existing.collect();
    let mut candidate = Utc::now().timestamp_millis();
    while taken.contains(&candidate.to_string().as_str()) {
        candidate += 1;
    }
    candidate.to_string()
}

/// Ensure a table with this name exists and stamp its last use.
fn touch_table(tables: &mut Vec<Table>, name: &str, at: &str) {
    match tables.iter_mut().find(|t| t.name.eq_ignore_ascii_case(name)) {
        Some(table) => table.last_used_date = Some(at.to_string()),
        None => {
            let id = next_id(tables.iter().map(|t| t.id.as_str()));
            tables.push(Table {
                id,
                name: name.to_string(),
                manufacturer: None,
                year: None,
                last_used_date: Some(at.to_string()),
            });
        }
    }
}

/// Drop the tables `previous` belonged to once no remaining score uses them.
fn remove_orphaned_tables(tables: &mut Vec<Table>, scores: &[Score], previous: &Score) {
    tables.retain(|table| {
        !previous.belongs_to(table) || scores.iter().any(|s| s.belongs_to(table))
    });
}
