pub mod render;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono_tz::Tz;
use geo::Point;
use tokio::sync::Mutex;

use crate::features::TransitFeature;
use crate::layers::LayerId;
use crate::stationboard::entities::Departure;
use crate::stationboard::StationboardSource;

/// What a lookup was triggered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A click that hit a feature of this layer
    Layer(LayerId),
    /// The startup lookup of the stop closest to the user
    Nearest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartureRow {
    pub time: String,
    /// `category number`
    pub line: String,
    pub destination: String,
}

impl DepartureRow {
    pub fn new(departure: &Departure, tz: Tz) -> Self {
        let time = departure
            .departure_time()
            .map(|t| t.with_timezone(&tz).format("%H:%M").to_string())
            .unwrap_or_else(|| render::NO_TIME.to_string());

        DepartureRow {
            time,
            line: format!(
                "{} {}",
                departure.category.as_deref().unwrap_or(""),
                departure.number.as_deref().unwrap_or("")
            ),
            destination: departure.to.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupBody {
    Loading,
    NoDepartures,
    /// In stationboard order
    Departures(Vec<DepartureRow>),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub stop_name: String,
    pub body: PopupBody,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PopupState {
    #[default]
    Hidden,
    Visible {
        /// Map coordinate the overlay is attached to
        anchor: Point,
        content: PopupContent,
    },
}

/// The element the popup is drawn into
pub trait PopupSurface: Send {
    /// Replaces whatever was shown before
    fn render(&mut self, state: &PopupState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    Hidden,
    Departures(usize),
    NoDepartures,
    Failed,
    /// A later lookup or a hide took over while this one was in flight
    Superseded,
    /// The session was aborted before the lookup finished
    Cancelled,
}

struct Screen {
    surface: Box<dyn PopupSurface>,
    state: PopupState,
}

/// Shows stop popups with live departures.
///
/// Every lookup takes a new generation number; content is only drawn while its
/// generation is still the latest, so a slow response can't replace a newer popup.
pub struct PopupResolver {
    source: Arc<dyn StationboardSource>,
    screen: Mutex<Screen>,
    generation: AtomicU64,
    limit: u32,
    tz: Tz,
}

impl PopupResolver {
    pub fn new(
        source: Arc<dyn StationboardSource>,
        surface: Box<dyn PopupSurface>,
        limit: u32,
        tz: Tz,
    ) -> Self {
        Self {
            source,
            screen: Mutex::new(Screen {
                surface,
                state: PopupState::Hidden,
            }),
            generation: AtomicU64::new(0),
            limit,
            tz,
        }
    }

    pub async fn state(&self) -> PopupState {
        self.screen.lock().await.state.clone()
    }

    pub async fn hide(&self) {
        let generation = self.next_generation();
        self.publish(generation, PopupState::Hidden).await;
    }

    pub async fn show_popup(
        &self,
        feature: &TransitFeature,
        origin: Origin,
        coordinate: Point,
    ) -> PopupOutcome {
        if !matches!(origin, Origin::Layer(LayerId::Points) | Origin::Nearest) {
            self.hide().await;
            return PopupOutcome::Hidden;
        }

        let stop_name = feature.name().unwrap_or_default();
        let generation = self.next_generation();
        log::debug!("Popup #{} for {:?} ({:?})", generation, stop_name, origin);

        let visible = |body| PopupState::Visible {
            anchor: coordinate,
            content: PopupContent {
                stop_name: stop_name.clone(),
                body,
            },
        };

        self.publish(generation, visible(PopupBody::Loading)).await;

        let (body, outcome) = match self.source.stationboard(&stop_name, Some(self.limit)).await {
            Ok(departures) if departures.is_empty() => {
                (PopupBody::NoDepartures, PopupOutcome::NoDepartures)
            }
            Ok(departures) => {
                let rows = departures
                    .iter()
                    .map(|d| DepartureRow::new(d, self.tz))
                    .collect::<Vec<_>>();
                let count = rows.len();
                (PopupBody::Departures(rows), PopupOutcome::Departures(count))
            }
            Err(e) => {
                log::error!("Error loading departures for {:?}: {}", stop_name, e);
                (PopupBody::Failed, PopupOutcome::Failed)
            }
        };

        if self.publish(generation, visible(body)).await {
            outcome
        } else {
            log::debug!("Discarding stale result of popup #{}", generation);
            PopupOutcome::Superseded
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Draws `state` unless a newer generation has started
    async fn publish(&self, generation: u64, state: PopupState) -> bool {
        let mut screen = self.screen.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        screen.surface.render(&state);
        screen.state = state;
        true
    }
}
