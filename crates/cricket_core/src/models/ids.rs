//! Identifier aliases and the serde glue for optional ids.
//!
//! Documents written by earlier scorer builds store an unset player slot as
//! `""` rather than omitting it; those read back as `None`.

use serde::{Deserialize, Deserializer, Serializer};

pub type PlayerId = String;
pub type TeamId = String;
pub type MatchId = String;

pub(crate) mod opt_id {
    use super::*;

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(id) => serializer.serialize_some(id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.filter(|id| !id.trim().is_empty()))
    }
}
