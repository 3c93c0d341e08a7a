use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use geo::Point;
use geojson::JsonObject;
use serde_json::{json, Value};

use crate::features::TransitFeature;
use crate::geo::from_lon_lat;
use crate::popup::{PopupState, PopupSurface};
use crate::position::{GeoPosition, Geolocation, GeolocationError, MapView};
use crate::stationboard::entities::Departure;
use crate::stationboard::error::{StationboardError, StationboardResult};
use crate::stationboard::StationboardSource;

pub fn init() {
    dotenvy::from_filename(".dev.vars").ok();
    env_logger::builder().is_test(true).try_init().ok();
}

/// Point feature at `x`/`y` map units
pub fn point_feature(name: &str, objektart: i64, x: f64, y: f64) -> TransitFeature {
    let mut properties = JsonObject::new();
    properties.insert("NAME".to_string(), json!(name));
    properties.insert("OBJEKTART".to_string(), json!(objektart));
    TransitFeature::new(Point::new(x, y).into(), properties)
}

/// Train stop at a WGS84 position
pub fn stop_at(name: &str, lon: f64, lat: f64) -> TransitFeature {
    let coordinate = from_lon_lat(lon, lat);
    point_feature(name, 3, coordinate.x(), coordinate.y())
}

pub fn feature_with(properties: &[(&str, Value)]) -> TransitFeature {
    let properties = properties
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect::<JsonObject>();
    TransitFeature::new(Point::new(0.0, 0.0).into(), properties)
}

/// Keeps every state the popup was drawn with
#[derive(Clone, Default)]
pub struct RecordingSurface {
    states: Arc<Mutex<Vec<PopupState>>>,
}

impl RecordingSurface {
    pub fn states(&self) -> Vec<PopupState> {
        self.states.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<PopupState> {
        self.states.lock().unwrap().last().cloned()
    }
}

impl PopupSurface for RecordingSurface {
    fn render(&mut self, state: &PopupState) {
        self.states.lock().unwrap().push(state.clone());
    }
}

#[derive(Clone, Default)]
pub struct RecordingView {
    animations: Arc<Mutex<Vec<(Point, f64, Duration)>>>,
}

impl RecordingView {
    pub fn animations(&self) -> Vec<(Point, f64, Duration)> {
        self.animations.lock().unwrap().clone()
    }
}

impl MapView for RecordingView {
    fn animate(&mut self, center: Point, zoom: f64, duration: Duration) {
        self.animations.lock().unwrap().push((center, zoom, duration));
    }
}

/// Answers with the given results in order, then as unavailable
#[derive(Clone, Default)]
pub struct ScriptedGeolocation {
    results: Arc<Mutex<VecDeque<Result<GeoPosition, GeolocationError>>>>,
    calls: Arc<Mutex<usize>>,
    delay: Duration,
}

impl ScriptedGeolocation {
    pub fn new(results: Vec<Result<GeoPosition, GeolocationError>>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results.into())),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Geolocation for ScriptedGeolocation {
    async fn current_position(&self) -> Result<GeoPosition, GeolocationError> {
        *self.calls.lock().unwrap() += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or(Err(GeolocationError::Unavailable))
    }
}

#[derive(Clone)]
enum Scripted {
    Board(Vec<Departure>),
    Failure(u16),
}

/// Canned stationboards by stop name; unknown stops have no departures
#[derive(Clone, Default)]
pub struct ScriptedStationboard {
    boards: Arc<Mutex<HashMap<String, Scripted>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<Vec<(String, Option<u32>)>>>,
}

impl ScriptedStationboard {
    pub fn with_board(self, station: &str, departures: Vec<Departure>) -> Self {
        self.boards
            .lock()
            .unwrap()
            .insert(station.to_string(), Scripted::Board(departures));
        self
    }

    pub fn with_failure(self, station: &str, status: u16) -> Self {
        self.boards
            .lock()
            .unwrap()
            .insert(station.to_string(), Scripted::Failure(status));
        self
    }

    pub fn with_delay(self, station: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(station.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<(String, Option<u32>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StationboardSource for ScriptedStationboard {
    async fn stationboard(
        &self,
        station: &str,
        limit: Option<u32>,
    ) -> StationboardResult<Vec<Departure>> {
        self.requests
            .lock()
            .unwrap()
            .push((station.to_string(), limit));

        let delay = self.delays.lock().unwrap().get(station).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.boards.lock().unwrap().get(station).cloned();
        match scripted {
            Some(Scripted::Board(departures)) => Ok(departures),
            Some(Scripted::Failure(status)) => Err(StationboardError::Status(status)),
            None => Ok(vec![]),
        }
    }
}
