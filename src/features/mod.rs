pub mod attributes;

use std::path::Path;

use geo::{Closest, ClosestPoint, Coord, EuclideanDistance, Geometry, MapCoords, Point};
use geojson::{GeoJson, JsonObject};
use serde_json::Value;

use crate::geo::from_lon_lat;
use crate::style::Category;

#[derive(thiserror::Error, Debug)]
pub enum FeatureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Expected a FeatureCollection")]
    NotACollection,
}

pub type FeatureResult<T> = Result<T, FeatureError>;

/// A stop or line of the transit theme, with its geometry in map units (EPSG:3857)
#[derive(Debug, Clone, PartialEq)]
pub struct TransitFeature {
    geometry: Geometry,
    properties: JsonObject,
}

impl TransitFeature {
    pub fn new(geometry: Geometry, properties: JsonObject) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// `OBJEKTART`
    pub fn category(&self) -> Category {
        Category::from_attribute(self.get("OBJEKTART"))
    }

    /// `ANSCHLUSSGLEIS`, only meaningful for rail track
    pub fn is_siding(&self) -> bool {
        attributes::equals_number(self.get("ANSCHLUSSGLEIS"), 1.0)
    }

    /// `NAME`, stop name of point features
    pub fn name(&self) -> Option<String> {
        self.get("NAME").and_then(attributes::as_text)
    }

    /// Where a popup for this feature is attached; only points have one
    pub fn anchor(&self) -> Option<Point> {
        match &self.geometry {
            Geometry::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Point of the geometry nearest to `coordinate`
    pub fn closest_point(&self, coordinate: &Point) -> Option<Point> {
        match self.geometry.closest_point(coordinate) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => Some(p),
            Closest::Indeterminate => None,
        }
    }
}

/// Features of one theme (points or lines), loaded once
#[derive(Debug, Clone, Default)]
pub struct FeatureSource {
    features: Vec<TransitFeature>,
}

impl FeatureSource {
    pub fn new(features: Vec<TransitFeature>) -> Self {
        Self { features }
    }

    /// Reads a WGS84 GeoJSON file and projects it into map units
    pub fn load(path: &Path) -> FeatureResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let source = Self::parse(&content)?;
        log::info!("Loaded {} features from {}", source.len(), path.display());
        Ok(source)
    }

    pub fn parse(content: &str) -> FeatureResult<Self> {
        let collection = match content.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(fc) => fc,
            GeoJson::Feature(_) | GeoJson::Geometry(_) => return Err(FeatureError::NotACollection),
        };

        let mut features = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let Some(geometry) = feature.geometry else {
                log::debug!("Skipping feature without geometry: {:?}", feature.id);
                continue;
            };
            let geometry: Geometry = geometry.try_into()?;
            let projected = geometry.map_coords(|c| Coord::from(from_lon_lat(c.x, c.y)));
            features.push(TransitFeature::new(
                projected,
                feature.properties.unwrap_or_default(),
            ));
        }

        Ok(Self { features })
    }

    pub fn features(&self) -> &[TransitFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// First feature whose `NAME` matches, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&TransitFeature> {
        let name = name.trim();
        self.features.iter().find(|f| {
            f.name()
                .map(|n| n.trim().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
    }

    /// Feature with the smallest straight-line distance in map units; ties keep the first
    pub fn closest_to(&self, coordinate: Point) -> Option<&TransitFeature> {
        self.features
            .iter()
            .filter_map(|f| {
                f.closest_point(&coordinate)
                    .map(|p| (f, p.euclidean_distance(&coordinate)))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(f, _)| f)
    }
}
