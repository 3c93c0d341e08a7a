use std::sync::Arc;

use geo::Point;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::Config;
use crate::features::{FeatureSource, TransitFeature};
use crate::layers::{LayerId, MapDefinition, ThematicLayer};
use crate::nearest::nearest_lookup;
use crate::popup::{Origin, PopupOutcome, PopupResolver, PopupSurface};
use crate::position::{Geolocation, MapView, PositionPoller, PositionTracker};
use crate::stationboard::StationboardSource;

/// The outside world a session talks to
pub struct Services {
    pub stationboard: Arc<dyn StationboardSource>,
    pub geolocation: Arc<dyn Geolocation>,
    pub view: Box<dyn MapView>,
    pub popup: Box<dyn PopupSurface>,
}

/// Everything one open map owns: its layers, the position marker and the popup
pub struct Session {
    config: Config,
    points: Arc<ThematicLayer>,
    lines: Arc<ThematicLayer>,
    tracker: Arc<Mutex<PositionTracker>>,
    resolver: Arc<PopupResolver>,
    geolocation: Arc<dyn Geolocation>,
    poller: Option<PositionPoller>,
    tasks: TaskTracker,
    token: CancellationToken,
}

impl Session {
    pub fn new(config: Config, points: FeatureSource, lines: FeatureSource, services: Services) -> Self {
        let tracker = PositionTracker::new(services.view, config.fix_zoom, config.animation_duration);
        let resolver = PopupResolver::new(
            services.stationboard,
            services.popup,
            config.popup_limit,
            config.display_tz,
        );

        Session {
            points: Arc::new(ThematicLayer::points(points)),
            lines: Arc::new(ThematicLayer::lines(lines)),
            tracker: Arc::new(Mutex::new(tracker)),
            resolver: Arc::new(resolver),
            geolocation: services.geolocation,
            poller: None,
            tasks: TaskTracker::new(),
            token: CancellationToken::new(),
            config,
        }
    }

    /// Starts position polling and schedules the one-shot nearest-stop lookup
    pub fn start(&mut self) {
        if self.poller.as_ref().is_some_and(PositionPoller::is_running) {
            log::warn!("Session already started");
            return;
        }

        log::info!(
            "Starting session: polling position every {:?}, nearest stop after {:?}",
            self.config.poll_interval,
            self.config.nearest_delay
        );
        self.poller = Some(PositionPoller::start(
            self.geolocation.clone(),
            self.tracker.clone(),
            self.config.poll_interval,
        ));

        let token = self.token.clone();
        let delay = self.config.nearest_delay;
        let points = self.points.clone();
        let tracker = self.tracker.clone();
        let resolver = self.resolver.clone();
        self.tasks.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = sleep(delay) => {
                    nearest_lookup(points.source(), &tracker, &resolver).await;
                }
            }
        });
    }

    /// A click on the map; `hit` is the feature under the cursor and its layer, if any
    pub fn click(&self, hit: Option<(TransitFeature, LayerId)>, coordinate: Point) -> JoinHandle<PopupOutcome> {
        let resolver = self.resolver.clone();
        let token = self.token.clone();
        self.tasks.spawn(async move {
            let lookup = async {
                match hit {
                    Some((feature, layer)) => {
                        resolver
                            .show_popup(&feature, Origin::Layer(layer), coordinate)
                            .await
                    }
                    None => {
                        resolver.hide().await;
                        PopupOutcome::Hidden
                    }
                }
            };

            tokio::select! {
                _ = token.cancelled() => {
                    log::debug!("Dropping popup lookup of aborted session");
                    PopupOutcome::Cancelled
                }
                outcome = lookup => outcome,
            }
        })
    }

    /// Stop point with this name, as a click would hit it
    pub fn stop_named(&self, name: &str) -> Option<(TransitFeature, LayerId)> {
        self.points
            .source()
            .find_by_name(name)
            .map(|f| (f.clone(), self.points.id()))
    }

    pub fn layers(&self) -> [&ThematicLayer; 2] {
        [self.lines.as_ref(), self.points.as_ref()]
    }

    pub fn map_definition(&self) -> MapDefinition {
        MapDefinition::new(&self.config, &self.layers())
    }

    #[cfg(test)]
    pub fn resolver(&self) -> &PopupResolver {
        &self.resolver
    }

    pub fn tracker(&self) -> &Mutex<PositionTracker> {
        &self.tracker
    }

    /// Stops polling and waits for lookups still in flight, including a
    /// nearest-stop lookup that hasn't reached its deadline yet
    pub async fn shutdown(&mut self) {
        log::info!("Stopping session");
        if let Some(mut poller) = self.poller.take() {
            poller.stop().await;
        }
        self.tasks.close();
        self.tasks.wait().await;
    }

    /// Like [`Session::shutdown`], but drops the pending nearest-stop lookup
    /// and any popup lookup still waiting on the stationboard
    pub async fn abort(&mut self) {
        self.token.cancel();
        self.shutdown().await;
    }
}
