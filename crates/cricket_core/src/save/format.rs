//! On-disk document: the match wrapped in a small versioned envelope.
//!
//! Bare match documents written before the envelope existed load as
//! version 0.

use super::error::SaveError;
use super::SAVE_VERSION;
use crate::engine::repair_current_batsmen;
use crate::models::Match;
use chrono::{DateTime, Utc};
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedMatch {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(rename = "match")]
    pub record: Match,
}

impl SavedMatch {
    pub fn new(record: Match) -> Self {
        Self { version: SAVE_VERSION, saved_at: Utc::now(), record }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Envelope(SavedMatch),
    Bare(Box<Match>),
}

/// JSON schema of the stored document.
pub fn document_schema() -> RootSchema {
    schemars::schema_for!(SavedMatch)
}

pub fn to_json(record: &Match) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(&SavedMatch::new(record.clone()))?)
}

/// Parse a stored document, upgrade it and repair inconsistent batsmen.
pub fn from_json(json: &str) -> Result<Match, SaveError> {
    let saved = match serde_json::from_str::<StoredDocument>(json) {
        Ok(StoredDocument::Envelope(saved)) => saved,
        Ok(StoredDocument::Bare(record)) => {
            SavedMatch { version: 0, saved_at: Utc::now(), record: *record }
        }
        // Re-parse as an envelope for a useful error message.
        Err(_) => serde_json::from_str::<SavedMatch>(json)?,
    };
    migrate(saved)
}

fn migrate(saved: SavedMatch) -> Result<Match, SaveError> {
    let mut record = match saved.version {
        0 => {
            log::info!("Upgrading bare match document {} to version {}", saved.record.id, SAVE_VERSION);
            saved.record
        }
        v if v > SAVE_VERSION => {
            return Err(SaveError::VersionMismatch { found: v, expected: SAVE_VERSION });
        }
        _ => saved.record,
    };

    let repairs = repair_current_batsmen(&mut record);
    if repairs > 0 {
        log::warn!("Repaired {} batsman records in match {}", repairs, record.id);
    }
    Ok(record)
}
