use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use chrono_tz::Tz;
use derive_builder::Builder;

use crate::error::{OevError, OevResult};
use crate::popup::render::PopupFormat;
use crate::position::GeoPosition;

pub const DEFAULT_STATIONBOARD_URL: &str = "https://transport.opendata.ch/v1/stationboard";

#[derive(Builder, Debug, Clone)]
#[builder(setter(into), default, build_fn(validate = "Self::validate"))]
pub struct Config {
    pub stationboard_url: String,
    /// Limit passed to the stationboard for every popup lookup
    pub popup_limit: u32,
    pub poll_interval: Duration,
    pub nearest_delay: Duration,
    pub fix_zoom: f64,
    pub animation_duration: Duration,
    pub display_tz: Tz,
    pub points_path: PathBuf,
    pub lines_path: PathBuf,
    pub fixed_position: Option<GeoPosition>,
    pub popup_format: PopupFormat,
    /// Upper bound for one stationboard request
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stationboard_url: DEFAULT_STATIONBOARD_URL.to_string(),
            popup_limit: 8,
            poll_interval: Duration::from_millis(10_000),
            nearest_delay: Duration::from_millis(2_000),
            fix_zoom: 15.0,
            animation_duration: Duration::from_millis(1_000),
            display_tz: Tz::Europe__Zurich,
            points_path: PathBuf::from("oeV_Punkt.geojson"),
            lines_path: PathBuf::from("oeV_Linie.geojson"),
            fixed_position: None,
            popup_format: PopupFormat::Text,
            request_timeout: Duration::from_millis(10_000),
        }
    }
}

impl ConfigBuilder {
    /// Every period and timeout has to be non-zero
    fn validate(&self) -> Result<(), String> {
        let durations = [
            ("poll_interval", self.poll_interval),
            ("nearest_delay", self.nearest_delay),
            ("animation_duration", self.animation_duration),
            ("request_timeout", self.request_timeout),
        ];
        match durations.iter().find(|(_, d)| *d == Some(Duration::ZERO)) {
            Some((name, _)) => Err(format!("{} must be greater than 0", name)),
            None => Ok(()),
        }
    }
}

impl Config {
    pub fn from_env() -> OevResult<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value lookup, falling back to defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> OevResult<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ConfigBuilder::default();

        if let Some(url) = lookup("STATIONBOARD_URL") {
            builder.stationboard_url(url);
        }
        if let Some(limit) = parsed::<u32>(&lookup, "POPUP_LIMIT")? {
            builder.popup_limit(limit);
        }
        if let Some(interval) = millis(&lookup, "POLL_INTERVAL_MS")? {
            builder.poll_interval(interval);
        }
        if let Some(delay) = millis(&lookup, "NEAREST_DELAY_MS")? {
            builder.nearest_delay(delay);
        }
        if let Some(zoom) = parsed::<f64>(&lookup, "FIX_ZOOM")? {
            builder.fix_zoom(zoom);
        }
        if let Some(duration) = millis(&lookup, "ANIMATION_MS")? {
            builder.animation_duration(duration);
        }
        if let Some(timeout) = millis(&lookup, "REQUEST_TIMEOUT_MS")? {
            builder.request_timeout(timeout);
        }
        if let Some(tz) = parsed::<Tz>(&lookup, "DISPLAY_TZ")? {
            builder.display_tz(tz);
        }
        if let Some(path) = lookup("POINTS_PATH") {
            builder.points_path(path);
        }
        if let Some(path) = lookup("LINES_PATH") {
            builder.lines_path(path);
        }
        if let Some(position) = lookup("FIXED_POSITION") {
            builder.fixed_position(Some(parse_fixed_position(&position)?));
        }
        if let Some(format) = parsed::<PopupFormat>(&lookup, "POPUP_FORMAT")? {
            builder.popup_format(format);
        }

        Ok(builder.build()?)
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> OevResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| OevError::Config(format!("{}={:?}: {}", key, raw, e))),
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> OevResult<Option<Duration>> {
    Ok(parsed::<u64>(lookup, key)?.map(Duration::from_millis))
}

/// `lat,lon` or `lat,lon,accuracy`
pub fn parse_fixed_position(raw: &str) -> OevResult<GeoPosition> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;

    match parts[..] {
        [latitude, longitude] => Ok(GeoPosition::new(latitude, longitude, 0.0)),
        [latitude, longitude, accuracy] => Ok(GeoPosition::new(latitude, longitude, accuracy)),
        _ => Err(OevError::Config(format!(
            "FIXED_POSITION must be lat,lon[,accuracy], got {:?}",
            raw
        ))),
    }
}
