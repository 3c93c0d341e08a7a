use std::str::FromStr;

use itertools::Itertools;

use super::{DepartureRow, PopupBody, PopupContent};

/// How popup content is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupFormat {
    #[default]
    Text,
    Html,
}

impl FromStr for PopupFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(PopupFormat::Text),
            "html" => Ok(PopupFormat::Html),
            other => Err(format!("unknown popup format {:?}", other)),
        }
    }
}

pub fn format(content: &PopupContent, format: PopupFormat) -> String {
    match format {
        PopupFormat::Text => text(content),
        PopupFormat::Html => html(content),
    }
}

pub const LOADING: &str = "lade Abfahrten…";
pub const NO_DEPARTURES: &str = "Keine Abfahrten gefunden.";
pub const FAILED: &str = "Fehler beim Laden der Abfahrten.";
/// Shown instead of a time when the stationboard has none
pub const NO_TIME: &str = "—";

/// Inner HTML of the popup element
pub fn html(content: &PopupContent) -> String {
    let name = escape(&content.stop_name);
    match &content.body {
        PopupBody::Loading => format!("<strong>{}</strong><div>{}</div>", name, LOADING),
        PopupBody::NoDepartures => format!("<strong>{}</strong><div>{}</div>", name, NO_DEPARTURES),
        PopupBody::Failed => format!("<strong>{}</strong><div>{}</div>", name, FAILED),
        PopupBody::Departures(rows) => format!(
            "<strong>{}</strong><div style=\"margin-top:8px;\">{}</div>",
            name,
            rows.iter().map(row_html).join("")
        ),
    }
}

fn row_html(row: &DepartureRow) -> String {
    format!(
        "<div style=\"margin-bottom:6px;\">\
         <span style=\"font-weight:600\">{}</span>\
         &nbsp; <span style=\"color:#333\">{}</span>\
         &nbsp;→&nbsp; <span>{}</span>\
         </div>",
        escape(&row.time),
        escape(&row.line),
        escape(&row.destination)
    )
}

/// Same content for a terminal
pub fn text(content: &PopupContent) -> String {
    let body = match &content.body {
        PopupBody::Loading => format!("  {}", LOADING),
        PopupBody::NoDepartures => format!("  {}", NO_DEPARTURES),
        PopupBody::Failed => format!("  {}", FAILED),
        PopupBody::Departures(rows) => rows
            .iter()
            .map(|row| format!("  {:<5}  {}  → {}", row.time, row.line, row.destination))
            .join("\n"),
    };
    format!("{}\n{}", content.stop_name, body)
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
