use serde::Serialize;

use crate::config::Config;
use crate::features::{FeatureSource, TransitFeature};
use crate::geo::{from_lon_lat, lv95_to_lon_lat, view_zoom, zoom_for_resolution, SWITZERLAND_CENTER_LV95};
use crate::style::{line_style, point_style, Color, LineStyle, PointStyle};

const POINTS_MIN_ZOOM: f64 = 11.5;
const INITIAL_ZOOM: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerId {
    Lines,
    Points,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureStyle {
    Line(LineStyle),
    Point(PointStyle),
}

impl FeatureStyle {
    /// Whether anything ends up on screen
    pub fn is_drawn(&self) -> bool {
        match self {
            FeatureStyle::Line(style) => style.stroke.color != Color::Transparent,
            FeatureStyle::Point(style) => style.icon.effective_opacity() > 0.0,
        }
    }
}

/// One of the two transit layers with its features
#[derive(Debug, Clone)]
pub struct ThematicLayer {
    id: LayerId,
    title: &'static str,
    min_zoom: Option<f64>,
    source: FeatureSource,
}

impl ThematicLayer {
    pub fn lines(source: FeatureSource) -> Self {
        Self {
            id: LayerId::Lines,
            title: "öV Linien",
            min_zoom: None,
            source,
        }
    }

    pub fn points(source: FeatureSource) -> Self {
        Self {
            id: LayerId::Points,
            title: "öV Punkte",
            min_zoom: Some(POINTS_MIN_ZOOM),
            source,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn source(&self) -> &FeatureSource {
        &self.source
    }

    pub fn is_visible_at(&self, resolution: f64) -> bool {
        match self.min_zoom {
            Some(min_zoom) => view_zoom(resolution) > min_zoom,
            None => true,
        }
    }

    /// Evaluates the style of every feature for a render at `resolution`
    pub fn render(&self, resolution: f64) -> Vec<(&TransitFeature, FeatureStyle)> {
        if !self.is_visible_at(resolution) {
            return vec![];
        }

        let zoom = zoom_for_resolution(resolution);
        self.source
            .features()
            .iter()
            .map(|feature| {
                let style = match self.id {
                    LayerId::Points => FeatureStyle::Point(point_style(feature, zoom)),
                    LayerId::Lines => FeatureStyle::Line(line_style(feature, zoom)),
                };
                (feature, style)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseLayer {
    pub title: &'static str,
    pub url: &'static str,
    pub kind: &'static str,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeLayer {
    pub id: LayerId,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDefinition {
    /// EPSG:3857
    pub center: [f64; 2],
    pub zoom: f64,
}

/// Static composition of the page's map, for the front-end that draws it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDefinition {
    pub target: &'static str,
    pub basemaps: Vec<BaseLayer>,
    pub themes: Vec<ThemeLayer>,
    pub controls: Vec<&'static str>,
    pub interactions: Vec<&'static str>,
    pub popup_auto_pan_ms: u64,
    pub fix_zoom: f64,
    pub view: ViewDefinition,
}

impl MapDefinition {
    pub fn new(config: &Config, themes: &[&ThematicLayer]) -> Self {
        let (east, north) = SWITZERLAND_CENTER_LV95;
        let (lon, lat) = lv95_to_lon_lat(east, north);
        let center = from_lon_lat(lon, lat);

        MapDefinition {
            target: "map",
            basemaps: vec![
                BaseLayer {
                    title: "SwissImage",
                    url: "https://wmts.geo.admin.ch/1.0.0/ch.swisstopo.swissimage/default/current/3857/{z}/{x}/{y}.jpeg",
                    kind: "xyz",
                    visible: true,
                },
                BaseLayer {
                    title: "LightBasemap",
                    url: "https://vectortiles.geo.admin.ch/styles/ch.swisstopo.lightbasemap.vt/style.json",
                    kind: "vector-style",
                    visible: false,
                },
            ],
            themes: themes
                .iter()
                .map(|layer| ThemeLayer {
                    id: layer.id,
                    title: layer.title,
                    min_zoom: layer.min_zoom,
                })
                .collect(),
            controls: vec!["zoom", "rotate", "attribution", "scaleLine", "layerSwitcher"],
            interactions: vec!["defaults", "dragRotateAndZoom"],
            popup_auto_pan_ms: 250,
            fix_zoom: config.fix_zoom,
            view: ViewDefinition {
                center: [center.x(), center.y()],
                zoom: INITIAL_ZOOM,
            },
        }
    }
}
