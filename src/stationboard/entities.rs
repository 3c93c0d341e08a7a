use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use super::serde_helpers::{deserialize_option_text, deserialize_option_timestamp};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct StationboardResponse {
    /// Missing or null counts as no departures
    #[serde(default)]
    pub stationboard: Option<Vec<Departure>>,
}

impl StationboardResponse {
    pub fn into_departures(self) -> Vec<Departure> {
        self.stationboard.unwrap_or_default()
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Departure {
    #[serde(default)]
    pub stop: Option<DepartureStop>,
    /// e.g. `IC`, `B`, `S`
    #[serde(default, deserialize_with = "deserialize_option_text")]
    pub category: Option<String>,
    /// Line number within the category
    #[serde(default, deserialize_with = "deserialize_option_text")]
    pub number: Option<String>,
    /// Destination
    #[serde(default, deserialize_with = "deserialize_option_text")]
    pub to: Option<String>,
}

impl Departure {
    /// Scheduled departure from the requested stop
    pub fn departure_time(&self) -> Option<DateTime<FixedOffset>> {
        self.stop.as_ref().and_then(|s| s.departure)
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DepartureStop {
    #[serde(default, deserialize_with = "deserialize_option_timestamp")]
    pub departure: Option<DateTime<FixedOffset>>,
}
