//! JSON form of zone profiles.
//!
//! Intraday profiles are stored as breakpoint lists and calendars as date
//! runs, so documents stay small. Reading a document goes through the same
//! constructors as code does; invalid values are rejected.

use anyhow::{Context, Result};

use crate::profile::Profile;

/// Serializes a profile to a pretty-printed JSON string.
pub fn to_json_string(profile: &Profile) -> Result<String> {
    serde_json::to_string_pretty(profile)
        .with_context(|| format!("Failed to serialize profile '{}'", profile.name()))
}

/// Deserializes a profile from a JSON string.
pub fn from_json_str(json: &str) -> Result<Profile> {
    serde_json::from_str(json).context("Failed to deserialize profile from string")
}
