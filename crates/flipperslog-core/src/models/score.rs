//! Score and table records kept in the score book.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A logged high score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: String,

    /// Legacy reference to a table by id. New records use `table_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    pub score: u64,

    /// ISO-8601 date or timestamp.
    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,

    /// Pinball Map location the score was logged at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<i64>,
}

impl Score {
    /// Whether this score belongs to the given table, by id or by name.
    pub fn belongs_to(&self, table: &Table) -> bool {
        self.table_id.as_deref() == Some(table.id.as_str())
            || self
                .table_name
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(&table.name))
    }
}

/// A score that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScore {
    pub score: u64,
    pub table_name: Option<String>,
    pub date: String,
    pub photo_uri: Option<String>,
    pub venue_id: Option<i64>,
}

/// Partial update of a stored score. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreUpdate {
    pub score: Option<u64>,
    pub table_name: Option<String>,
    pub date: Option<String>,
    pub photo_uri: Option<String>,
}

/// A pinball machine that scores are grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    /// When a score was last added to or edited on this table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_date: Option<String>,
}

/// A table that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTable {
    pub name: String,
    pub manufacturer: Option<String>,
    pub year: Option<u16>,
    pub last_used_date: Option<String>,
}

impl NewTable {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A table with its best scores, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableWithScores {
    #[serde(flatten)]
    pub table: Table,
    pub top_scores: Vec<Score>,
}

impl TableWithScores {
    pub fn best(&self) -> u64 {
        self.top_scores.first().map(|s| s.score).unwrap_or(0)
    }
}

/// Format a stored date as `Oct 10, '24`.
///
/// Timestamps are read in UTC so that a midnight UTC date never shows as the
/// previous day. Plain `YYYY-MM-DD` dates are accepted as well.
pub fn format_score_date(date: &str) -> Option<String> {
    let day = match DateTime::parse_from_rfc3339(date) {
        Ok(ts) => ts.with_timezone(&Utc).date_naive(),
        Err(_) => NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
    };

    Some(day.format("%b %-d, '%y").to_string())
}

/// Format a score with thousands separators, e.g. `42,000,000`.
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Parse a score typed by hand. Separators and other non-digits are ignored;
/// the result must be greater than zero.
pub fn parse_score_input(input: &str) -> Option<u64> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().ok().filter(|&n| n > 0)
}
