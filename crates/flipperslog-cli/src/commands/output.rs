//! Output formats shared by the subcommands.

use console::style;
use serde::Serialize;

use flipperslog_core::models::score::{format_score, format_score_date};
use flipperslog_core::{ExtractionResult, PinballVenue, Score, Table, TableWithScores, VisionOutcome};

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    #[default]
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// A value that can be printed in every output format.
pub trait Row: Serialize {
    fn header() -> &'static [&'static str];
    fn record(&self) -> Vec<String>;
    fn text(&self) -> String;
}

/// Render a list of rows.
pub fn render_list<T: Row>(rows: &[T], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => to_csv(rows),
        OutputFormat::Text => Ok(rows.iter().map(Row::text).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single row.
pub fn render_one<T: Row>(row: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(row)?),
        OutputFormat::Csv => to_csv(std::slice::from_ref(row)),
        OutputFormat::Text => Ok(row.text()),
    }
}

fn to_csv<T: Row>(rows: &[T]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(T::header())?;
    for row in rows {
        wtr.write_record(row.record())?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data.trim_end().to_string())
}

fn display_date(date: &str) -> String {
    format_score_date(date).unwrap_or_else(|| date.to_string())
}

impl Row for Score {
    fn header() -> &'static [&'static str] {
        &["id", "table", "score", "date", "venue_id", "photo"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.table_name.clone().unwrap_or_default(),
            self.score.to_string(),
            self.date.clone(),
            self.venue_id.map(|v| v.to_string()).unwrap_or_default(),
            self.photo_uri.clone().unwrap_or_default(),
        ]
    }

    fn text(&self) -> String {
        format!(
            "{}  {:<28} {:>15}  {}",
            style(&self.id).dim(),
            self.table_name.as_deref().unwrap_or("-"),
            format_score(self.score),
            display_date(&self.date)
        )
    }
}

impl Row for Table {
    fn header() -> &'static [&'static str] {
        &["id", "name", "manufacturer", "year", "last_used"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.manufacturer.clone().unwrap_or_default(),
            self.year.map(|y| y.to_string()).unwrap_or_default(),
            self.last_used_date.clone().unwrap_or_default(),
        ]
    }

    fn text(&self) -> String {
        let mut line = self.name.clone();
        match (&self.manufacturer, self.year) {
            (Some(maker), Some(year)) => line.push_str(&format!(" ({}, {})", maker, year)),
            (Some(maker), None) => line.push_str(&format!(" ({})", maker)),
            (None, Some(year)) => line.push_str(&format!(" ({})", year)),
            (None, None) => {}
        }
        if let Some(used) = &self.last_used_date {
            line.push_str(&format!("  {}", style(format!("last played {}", display_date(used))).dim()));
        }
        line
    }
}

impl Row for TableWithScores {
    fn header() -> &'static [&'static str] {
        &["table", "best", "scores"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.table.name.clone(),
            self.best().to_string(),
            self.top_scores.len().to_string(),
        ]
    }

    fn text(&self) -> String {
        let mut out = style(&self.table.name).bold().to_string();
        for (rank, score) in self.top_scores.iter().enumerate() {
            out.push_str(&format!(
                "\n  {}. {:>15}  {}",
                rank + 1,
                format_score(score.score),
                display_date(&score.date)
            ));
        }
        out
    }
}

impl Row for PinballVenue {
    fn header() -> &'static [&'static str] {
        &["id", "name", "latitude", "longitude", "machines", "distance_km"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.latitude.to_string(),
            self.longitude.to_string(),
            self.machine_count.to_string(),
            format!("{:.2}", self.distance),
        ]
    }

    fn text(&self) -> String {
        format!(
            "{:>6}  {:<32} {:>3} machines  {:.2} km",
            self.id, self.name, self.machine_count, self.distance
        )
    }
}

impl Row for VisionOutcome {
    fn header() -> &'static [&'static str] {
        &["score", "table", "confidence", "mock", "error"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.score.to_string(),
            self.table_name.clone().unwrap_or_default(),
            self.confidence.to_string(),
            self.is_mock_data.to_string(),
            self.error.clone().unwrap_or_default(),
        ]
    }

    fn text(&self) -> String {
        let mut out = format!(
            "Score: {}\nTable: {}",
            self.score,
            self.table_name.as_deref().unwrap_or("unknown")
        );
        if self.is_mock_data {
            out.push_str(&format!(
                "\n{} Placeholder reading: {}",
                style("!").yellow(),
                self.error.as_deref().unwrap_or("unknown error")
            ));
        }
        out
    }
}

impl Row for ExtractionResult {
    fn header() -> &'static [&'static str] {
        &["score", "table"]
    }

    fn record(&self) -> Vec<String> {
        vec![self.score.to_string(), self.table_name.clone().unwrap_or_default()]
    }

    fn text(&self) -> String {
        format!(
            "Score: {}\nTable: {}",
            self.score,
            self.table_name.as_deref().unwrap_or("unknown")
        )
    }
}
