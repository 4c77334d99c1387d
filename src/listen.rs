//! listen records and JSON Lines I/O
//!
//! a listen is one listening event in the ListenBrainz format: a timestamp
//! and track metadata with free-form `additional_info`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::expr::{Record, Value};

/// attributes stored directly in the track metadata
pub const PRIMARY_KEYS: [&str; 3] = ["artist_name", "track_name", "release_name"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listen {
    /// unix timestamp in seconds
    pub listened_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_msid: Option<String>,
    pub track_metadata: TrackMetadata,
    /// fields this tool does not interpret, kept as they are
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub artist_name: String,
    pub track_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<Map<String, JsonValue>>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Listen {
    pub fn new(listened_at: i64, artist_name: impl Into<String>, track_name: impl Into<String>) -> Self {
        Self {
            listened_at,
            inserted_at: None,
            user_name: None,
            recording_msid: None,
            track_metadata: TrackMetadata {
                artist_name: artist_name.into(),
                track_name: track_name.into(),
                release_name: None,
                additional_info: None,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    /// add an `additional_info` entry
    pub fn with_info(mut self, key: &str, value: JsonValue) -> Self {
        self.track_metadata
            .additional_info
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }
}

impl Record for Listen {
    fn timestamp(&self) -> i64 {
        self.listened_at
    }

    fn primary(&self, key: &str) -> Option<Value> {
        let track = &self.track_metadata;
        match key {
            "artist_name" => Some(Value::String(track.artist_name.clone())),
            "track_name" => Some(Value::String(track.track_name.clone())),
            "release_name" => track.release_name.clone().map(Value::String),
            _ => None,
        }
    }

    fn metadata(&self, key: &str) -> Option<Value> {
        self.track_metadata
            .additional_info
            .as_ref()?
            .get(key)
            .map(Value::from_json)
    }

    fn set_primary(&mut self, key: &str, value: &str) -> bool {
        let track = &mut self.track_metadata;
        match key {
            "artist_name" => track.artist_name = value.to_string(),
            "track_name" => track.track_name = value.to_string(),
            "release_name" => track.release_name = Some(value.to_string()),
            _ => return false,
        }
        true
    }

    fn set_metadata(&mut self, key: &str, value: &str) {
        self.track_metadata
            .additional_info
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), JsonValue::String(value.to_string()));
    }
}

/// read listens from JSON Lines, one listen per non-blank line
pub fn read_listens<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Listen>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line_no = i + 1;
            match line {
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some(
                    serde_json::from_str::<Listen>(&line)
                        .with_context(|| format!("invalid listen on line {}", line_no)),
                ),
                Err(e) => Some(
                    Err::<Listen, _>(e).with_context(|| format!("failed to read line {}", line_no)),
                ),
            }
        })
}

/// write one listen as a single JSON line
pub fn write_listen<W: Write>(writer: &mut W, listen: &Listen) -> Result<()> {
    serde_json::to_writer(&mut *writer, listen).context("failed to serialize listen")?;
    writer.write_all(b"\n")?;
    Ok(())
}
