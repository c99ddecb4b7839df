//! Data models for scores, tables, venues and scoreboard readings.

pub mod config;
pub mod score;
pub mod venue;
pub mod vision;
