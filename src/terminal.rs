use std::io::Write;
use std::time::Duration;

use geo::Point;

use crate::popup::render::{self, PopupFormat};
use crate::popup::{PopupState, PopupSurface};
use crate::position::MapView;

pub const CLOSED: &str = "(popup closed)";

/// Writes every popup change to a terminal, or any other writer
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    format: PopupFormat,
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W, format: PopupFormat) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> PopupSurface for TerminalSurface<W> {
    fn render(&mut self, state: &PopupState) {
        let rendered = match state {
            PopupState::Hidden => CLOSED.to_string(),
            PopupState::Visible { content, .. } => render::format(content, self.format),
        };

        if let Err(e) = writeln!(self.out, "{}", rendered).and_then(|_| self.out.flush()) {
            log::warn!("Failed to write popup: {}", e);
        }
    }
}

/// A view nobody looks at; animations only show up in the log
#[derive(Default)]
pub struct LoggingView;

impl MapView for LoggingView {
    fn animate(&mut self, center: Point, zoom: f64, duration: Duration) {
        log::info!(
            "Centering map on ({:.1}, {:.1}) at zoom {} over {:?}",
            center.x(),
            center.y(),
            zoom,
            duration
        );
    }
}
