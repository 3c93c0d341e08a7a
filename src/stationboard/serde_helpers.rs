use chrono::{DateTime, FixedOffset};
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

use crate::features::attributes::as_text;

/// The stationboard writes offsets without a colon (`+0100`), RFC 3339 is accepted too
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Unparseable timestamps are treated like missing ones
pub fn deserialize_option_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Deserialize::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => {
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                log::warn!("Ignoring unparseable departure time {:?}", raw);
            }
            Ok(parsed)
        }
    }
}

/// Strings, or numbers written as strings
pub fn deserialize_option_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Deserialize::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(as_text))
}
