use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use geo::Point;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::geo::from_lon_lat;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres
    pub accuracy: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
        }
    }

    /// Position in map units
    pub fn coordinate(&self) -> Point {
        from_lon_lat(self.longitude, self.latitude)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Position unavailable")]
    Unavailable,
}

/// One-shot location query of the device
#[async_trait]
pub trait Geolocation: Send + Sync {
    async fn current_position(&self) -> Result<GeoPosition, GeolocationError>;
}

/// Always reports the same position, or none at all
pub struct StaticGeolocation {
    position: Option<GeoPosition>,
}

impl StaticGeolocation {
    pub fn new(position: Option<GeoPosition>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocation for StaticGeolocation {
    async fn current_position(&self) -> Result<GeoPosition, GeolocationError> {
        self.position.ok_or(GeolocationError::Unavailable)
    }
}

/// The map's view, as far as the tracker moves it
pub trait MapView: Send {
    fn animate(&mut self, center: Point, zoom: f64, duration: Duration);
}

/// The dot showing where the user is
#[derive(Debug, Clone, PartialEq)]
pub struct PositionMarker {
    coordinate: Point,
}

impl PositionMarker {
    pub fn coordinate(&self) -> Point {
        self.coordinate
    }
}

enum TrackerState {
    Unset,
    Tracking(PositionMarker),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// Marker created and view centred on it
    First,
    Moved,
}

/// Owns the position marker; the first fix creates it and centres the view,
/// later fixes only move it.
pub struct PositionTracker {
    state: TrackerState,
    last_fix: Option<GeoPosition>,
    view: Box<dyn MapView>,
    fix_zoom: f64,
    animation: Duration,
}

impl PositionTracker {
    pub fn new(view: Box<dyn MapView>, fix_zoom: f64, animation: Duration) -> Self {
        Self {
            state: TrackerState::Unset,
            last_fix: None,
            view,
            fix_zoom,
            animation,
        }
    }

    pub fn on_fix(&mut self, position: GeoPosition) -> FixOutcome {
        let coordinate = position.coordinate();

        let outcome = if let TrackerState::Tracking(marker) = &mut self.state {
            marker.coordinate = coordinate;
            FixOutcome::Moved
        } else {
            log::info!(
                "First position fix {:.5},{:.5} (±{:.0} m)",
                position.latitude,
                position.longitude,
                position.accuracy
            );
            self.state = TrackerState::Tracking(PositionMarker { coordinate });
            self.view.animate(coordinate, self.fix_zoom, self.animation);
            FixOutcome::First
        };

        self.last_fix = Some(position);
        outcome
    }

    pub fn marker(&self) -> Option<&PositionMarker> {
        match &self.state {
            TrackerState::Unset => None,
            TrackerState::Tracking(marker) => Some(marker),
        }
    }

    pub fn last_fix(&self) -> Option<GeoPosition> {
        self.last_fix
    }
}

/// Asks for the current position once and feeds it to the tracker.
///
/// A failed query changes nothing; the user sees no message.
pub async fn request_location(geolocation: &dyn Geolocation, tracker: &Mutex<PositionTracker>) {
    match geolocation.current_position().await {
        Ok(position) => {
            tracker.lock().await.on_fix(position);
        }
        Err(e) => log::warn!("Geolocation failed: {}", e),
    }
}

/// Periodic location polling, first query immediately
pub struct PositionPoller {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PositionPoller {
    pub fn start(
        geolocation: Arc<dyn Geolocation>,
        tracker: Arc<Mutex<PositionTracker>>,
        period: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                log::debug!("Polling position");
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = request_location(geolocation.as_ref(), &tracker) => {}
                }
            }
            log::debug!("Position poller stopped");
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    pub async fn stop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::error!("Position poller failed: {}", e);
            }
        }
    }
}

impl Drop for PositionPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
