use std::f64::consts::{LN_2, PI};

use geo::Point;

/// Radius of the spherical Web Mercator earth (EPSG:3857)
pub const EARTH_RADIUS: f64 = 6_378_137.0;
const HALF_SIZE: f64 = PI * EARTH_RADIUS;

/// Metres per pixel at zoom 0 of a 256px tile pyramid
pub const RESOLUTION_AT_ZOOM_0: f64 = 156_543.033_928_040_97;

/// Latitude the zoom derivation is evaluated at
pub const REFERENCE_LATITUDE_DEGREES: f64 = 46.8182;

/// Initial view centre, Swiss LV95 easting/northing
pub const SWITZERLAND_CENTER_LV95: (f64, f64) = (2_660_158.0, 1_183_640.0);

/// Projects WGS84 longitude/latitude into Web Mercator map units
pub fn from_lon_lat(lon: f64, lat: f64) -> Point {
    let x = EARTH_RADIUS * PI * lon / 180.0;
    let y = EARTH_RADIUS * (PI * (lat + 90.0) / 360.0).tan().ln();
    Point::new(x, y.clamp(-HALF_SIZE, HALF_SIZE))
}

/// Swiss LV95 (EPSG:2056) easting/northing to WGS84 longitude/latitude.
///
/// swisstopo's approximate formulas, good to about a metre inside Switzerland.
pub fn lv95_to_lon_lat(east: f64, north: f64) -> (f64, f64) {
    let y = (east - 2_600_000.0) / 1_000_000.0;
    let x = (north - 1_200_000.0) / 1_000_000.0;

    let lon = 2.677_909_4 + 4.728_982 * y + 0.791_484 * y * x + 0.130_6 * y * x.powi(2)
        - 0.043_6 * y.powi(3);
    let lat = 16.902_389_2 + 3.238_272 * x
        - 0.270_978 * y.powi(2)
        - 0.002_528 * x.powi(2)
        - 0.044_7 * y.powi(2) * x
        - 0.014_0 * x.powi(3);

    // units of 10000"
    (lon * 100.0 / 36.0, lat * 100.0 / 36.0)
}

/// Zoom level used by the styling rules.
///
/// Same arithmetic as the browser page (natural log over ln 2, then round-half-up)
/// so that the thresholds flip at exactly the same resolutions.
pub fn zoom_for_resolution(resolution: f64) -> f64 {
    let ratio = RESOLUTION_AT_ZOOM_0 * (REFERENCE_LATITUDE_DEGREES * PI / 180.0).cos() / resolution;
    round_half_up(ratio.ln() / LN_2)
}

/// Un-rounded view zoom, as the mapping engine reports it
pub fn view_zoom(resolution: f64) -> f64 {
    (RESOLUTION_AT_ZOOM_0 / resolution).ln() / LN_2
}

pub fn resolution_for_zoom(zoom: f64) -> f64 {
    RESOLUTION_AT_ZOOM_0 / 2f64.powf(zoom)
}

// ties go towards positive infinity
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
