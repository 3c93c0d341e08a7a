use tokio::sync::Mutex;

use crate::features::FeatureSource;
use crate::popup::{Origin, PopupOutcome, PopupResolver};
use crate::position::PositionTracker;

/// Opens the popup of the stop closest to the last known position.
///
/// Does nothing (and returns `None`) while there is no fix yet or no stops are loaded.
pub async fn nearest_lookup(
    points: &FeatureSource,
    tracker: &Mutex<PositionTracker>,
    resolver: &PopupResolver,
) -> Option<PopupOutcome> {
    let Some(position) = tracker.lock().await.last_fix() else {
        log::info!("No position yet, not looking up the nearest stop");
        return None;
    };

    let coordinate = position.coordinate();
    let feature = points.closest_to(coordinate)?;
    let anchor = feature.closest_point(&coordinate)?;
    log::info!("Nearest stop is {:?}", feature.name());

    Some(resolver.show_popup(feature, Origin::Nearest, anchor).await)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono_tz::Tz;

    use super::*;
    use crate::geo::from_lon_lat;
    use crate::popup::PopupState;
    use crate::position::GeoPosition;
    use crate::test_utils::{stop_at, RecordingSurface, RecordingView, ScriptedStationboard};

    fn setup() -> (FeatureSource, Mutex<PositionTracker>, PopupResolver, RecordingSurface, ScriptedStationboard) {
        let points = FeatureSource::new(vec![
            stop_at("Bern", 7.4391, 46.9490),
            stop_at("Bern, Zytglogge", 7.4474, 46.9480),
            stop_at("Thun", 7.6296, 46.7548),
        ]);
        let tracker = Mutex::new(PositionTracker::new(
            Box::new(RecordingView::default()),
            15.0,
            Duration::from_millis(1000),
        ));
        let source = ScriptedStationboard::default();
        let surface = RecordingSurface::default();
        let resolver = PopupResolver::new(
            Arc::new(source.clone()),
            Box::new(surface.clone()),
            8,
            Tz::Europe__Zurich,
        );
        (points, tracker, resolver, surface, source)
    }

    #[tokio::test]
    async fn test_without_fix_does_nothing() {
        let (points, tracker, resolver, surface, source) = setup();

        assert_eq!(nearest_lookup(&points, &tracker, &resolver).await, None);
        assert!(surface.states().is_empty());
        assert!(source.requests().is_empty());
        assert_eq!(resolver.state().await, PopupState::Hidden);
    }

    #[tokio::test]
    async fn test_opens_closest_stop() {
        let (points, tracker, resolver, surface, source) = setup();
        tracker
            .lock()
            .await
            .on_fix(GeoPosition::new(46.9479, 7.4460, 15.0));

        let outcome = nearest_lookup(&points, &tracker, &resolver).await;
        assert!(outcome.is_some());
        assert_eq!(source.requests(), vec![("Bern, Zytglogge".to_string(), Some(8))]);

        match surface.last().unwrap() {
            PopupState::Visible { anchor, content } => {
                assert_eq!(content.stop_name, "Bern, Zytglogge");
                assert_eq!(anchor, from_lon_lat(7.4474, 46.9480));
            }
            PopupState::Hidden => panic!("popup is hidden"),
        }
    }

    #[tokio::test]
    async fn test_no_stops_loaded() {
        let (_, tracker, resolver, surface, _) = setup();
        tracker.lock().await.on_fix(GeoPosition::new(46.0, 7.0, 1.0));

        assert_eq!(nearest_lookup(&FeatureSource::default(), &tracker, &resolver).await, None);
        assert!(surface.states().is_empty());
    }
}
