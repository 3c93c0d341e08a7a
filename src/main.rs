extern crate derive_builder;

mod config;
mod error;
mod features;
mod geo;
mod layers;
mod nearest;
mod popup;
mod position;
mod session;
mod stationboard;
mod style;
mod terminal;

#[cfg(test)]
mod test_utils;

use std::{env, io::BufRead, sync::Arc, thread};

use ::geo::Point;
use tokio::select;
use tokio::sync::mpsc;

use config::Config;
use error::{OevError, OevResult};
use features::FeatureSource;
use position::StaticGeolocation;
use session::{Services, Session};
use stationboard::client::StationboardClient;
use terminal::{LoggingView, TerminalSurface};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    dotenvy::from_filename(".env").ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::try_init().ok();

    log::debug!("Debug logging enabled");

    let mut session = open_session()?;
    describe(&session)?;

    session.start();

    let mut lines = read_lines();
    loop {
        select! {
            line = lines.recv() => {
                match line {
                    Some(line) => click_named(&session, line.trim()),
                    None => {
                        log::info!("Input closed");
                        session.shutdown().await;
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted");
                session.abort().await;
                break;
            }
        }
    }

    match session.tracker().lock().await.last_fix() {
        Some(fix) => log::info!(
            "Last position {:.5}, {:.5} (±{} m)",
            fix.latitude,
            fix.longitude,
            fix.accuracy
        ),
        None => log::info!("No position was ever found"),
    }

    Ok(())
}

fn open_session() -> OevResult<Session> {
    let config = Config::from_env()?;

    let points = FeatureSource::load(&config.points_path)?;
    let lines = FeatureSource::load(&config.lines_path)?;
    let stationboard = StationboardClient::new(&config.stationboard_url, config.request_timeout)?;

    let services = Services {
        stationboard: Arc::new(stationboard),
        geolocation: Arc::new(StaticGeolocation::new(config.fixed_position)),
        view: Box::new(LoggingView),
        popup: Box::new(TerminalSurface::new(std::io::stdout(), config.popup_format)),
    };

    Ok(Session::new(config, points, lines, services))
}

fn describe(session: &Session) -> OevResult<()> {
    let definition = session.map_definition();
    log::debug!(
        "Map definition: {}",
        serde_json::to_string(&definition).map_err(|e| OevError::Config(e.to_string()))?
    );

    let overview = crate::geo::resolution_for_zoom(definition.view.zoom);
    let close_up = crate::geo::resolution_for_zoom(definition.fix_zoom);
    for layer in session.layers() {
        let drawn = |resolution| {
            layer
                .render(resolution)
                .iter()
                .filter(|(_, style)| style.is_drawn())
                .count()
        };
        log::info!(
            "{}: {} features, {} drawn at overview, {} drawn around a fix",
            layer.title(),
            layer.source().len(),
            drawn(overview),
            drawn(close_up)
        );
    }
    Ok(())
}

/// Stdin lines, read on their own thread so a pending read never holds up shutdown
fn read_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// A typed stop name stands in for a click on that stop; anything else clicks empty map
fn click_named(session: &Session, name: &str) {
    if name.is_empty() {
        return;
    }

    match session.stop_named(name) {
        Some((feature, layer)) => {
            let anchor = feature.anchor().unwrap_or_else(|| Point::new(0.0, 0.0));
            session.click(Some((feature, layer)), anchor);
        }
        None => {
            log::info!("No stop named {:?}", name);
            session.click(None, Point::new(0.0, 0.0));
        }
    }
}
