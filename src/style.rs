use serde_json::Value;

use crate::features::{attributes, TransitFeature};

/// Rail track stroke
pub const RAIL_COLOR: &str = "#f32501";
/// Every other line, once zoomed in
pub const LINE_COLOR: &str = "#ff8d12";

pub const ICON_WIDTH: f64 = 15.0;

const LINE_MIN_ZOOM: f64 = 15.0;
const ICON_MIN_ZOOM: f64 = 13.5;

/// `OBJEKTART` of a transit feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// 0
    RailTrack,
    /// 1
    Bus,
    /// 2
    Ship,
    /// 4
    CableCar,
    /// Everything else, including a missing code. On the point layer this is also where
    /// rail track ends up. Unlike the other icons it has no zoom-dependent opacity; that
    /// difference is kept as found in the data's styling.
    TrainLike,
}

impl Category {
    pub fn from_attribute(value: Option<&Value>) -> Self {
        match value.and_then(attributes::as_number) {
            Some(code) if code == 0.0 => Category::RailTrack,
            Some(code) if code == 1.0 => Category::Bus,
            Some(code) if code == 2.0 => Category::Ship,
            Some(code) if code == 4.0 => Category::CableCar,
            _ => Category::TrainLike,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Transparent,
    Hex(&'static str),
}

impl Color {
    #[allow(dead_code)]
    pub fn css(&self) -> &'static str {
        match self {
            Color::Transparent => "transparent",
            Color::Hex(hex) => *hex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub stroke: Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconImage {
    Ship,
    Bus,
    CableCar,
    Train,
}

impl IconImage {
    pub fn src(&self) -> &'static str {
        match self {
            IconImage::Ship => "ship-solid-full.png",
            IconImage::Bus => "bus-solid-full.png",
            IconImage::CableCar => "cable-car-solid-full.png",
            IconImage::Train => "train-solid-full.png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Icon {
    pub image: IconImage,
    /// Fraction of the image size, both axes
    pub anchor: [f64; 2],
    pub width: f64,
    /// `None` leaves the renderer's default (fully opaque)
    pub opacity: Option<f64>,
}

impl Icon {
    fn new(image: IconImage, opacity: Option<f64>) -> Self {
        Icon {
            image,
            anchor: [0.5, 0.5],
            width: ICON_WIDTH,
            opacity,
        }
    }

    pub fn effective_opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub icon: Icon,
}

pub fn line_style(feature: &TransitFeature, zoom: f64) -> LineStyle {
    let stroke = match feature.category() {
        Category::RailTrack => Stroke {
            color: Color::Hex(RAIL_COLOR),
            width: if feature.is_siding() { 1.5 } else { 0.75 },
        },
        _ => Stroke {
            color: if zoom < LINE_MIN_ZOOM {
                Color::Transparent
            } else {
                Color::Hex(LINE_COLOR)
            },
            width: 1.0,
        },
    };
    LineStyle { stroke }
}

pub fn point_style(feature: &TransitFeature, zoom: f64) -> PointStyle {
    let fade = || Some(if zoom < ICON_MIN_ZOOM { 0.0 } else { 1.0 });
    let icon = match feature.category() {
        Category::Ship => Icon::new(IconImage::Ship, fade()),
        Category::Bus => Icon::new(IconImage::Bus, fade()),
        Category::CableCar => Icon::new(IconImage::CableCar, fade()),
        Category::RailTrack | Category::TrainLike => Icon::new(IconImage::Train, None),
    };
    PointStyle { icon }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::test_utils::feature_with;

    const ZOOMS: [f64; 8] = [0.0, 8.0, 12.0, 13.0, 14.0, 15.0, 16.0, 22.0];

    #[test]
    fn test_category_codes() {
        assert_eq!(Category::from_attribute(Some(&json!(0))), Category::RailTrack);
        assert_eq!(Category::from_attribute(Some(&json!(1))), Category::Bus);
        assert_eq!(Category::from_attribute(Some(&json!("2"))), Category::Ship);
        assert_eq!(Category::from_attribute(Some(&json!(4.0))), Category::CableCar);
        assert_eq!(Category::from_attribute(Some(&json!(3))), Category::TrainLike);
        assert_eq!(Category::from_attribute(Some(&json!(null))), Category::TrainLike);
        assert_eq!(Category::from_attribute(None), Category::TrainLike);
    }

    #[test]
    fn test_unknown_category_is_always_visible_train() {
        for code in [json!(3), json!(5), json!(-1), json!(0.5), json!("Tram"), json!(null)] {
            let feature = feature_with(&[("OBJEKTART", code.clone())]);
            for zoom in ZOOMS {
                let style = point_style(&feature, zoom);
                assert_eq!(style.icon.image, IconImage::Train, "code {}", code);
                assert_eq!(style.icon.opacity, None);
                assert_eq!(style.icon.effective_opacity(), 1.0);
            }
        }
    }

    #[test]
    fn test_rail_track_point_uses_train_icon() {
        let feature = feature_with(&[("OBJEKTART", json!(0))]);
        assert_eq!(point_style(&feature, 3.0).icon.image, IconImage::Train);
        assert_eq!(point_style(&feature, 3.0).icon.opacity, None);
    }

    #[test]
    fn test_icons_fade_below_threshold() {
        let cases = [
            (1, IconImage::Bus),
            (2, IconImage::Ship),
            (4, IconImage::CableCar),
        ];
        for (code, image) in cases {
            let feature = feature_with(&[("OBJEKTART", json!(code))]);
            for zoom in ZOOMS {
                let style = point_style(&feature, zoom);
                assert_eq!(style.icon.image, image);
                let expected = if zoom < 13.5 { 0.0 } else { 1.0 };
                assert_eq!(style.icon.opacity, Some(expected), "code {} zoom {}", code, zoom);
            }
        }
    }

    #[test]
    fn test_icon_geometry() {
        let feature = feature_with(&[("OBJEKTART", json!(1))]);
        let icon = point_style(&feature, 14.0).icon;
        assert_eq!(icon.anchor, [0.5, 0.5]);
        assert_eq!(icon.width, 15.0);
        assert_eq!(icon.image.src(), "bus-solid-full.png");
    }

    #[test]
    fn test_rail_width_ignores_zoom() {
        let siding = feature_with(&[("OBJEKTART", json!(0)), ("ANSCHLUSSGLEIS", json!(1))]);
        let siding_bool = feature_with(&[("OBJEKTART", json!("0")), ("ANSCHLUSSGLEIS", json!(true))]);
        let main_line = feature_with(&[("OBJEKTART", json!(0)), ("ANSCHLUSSGLEIS", json!(0))]);
        let unflagged = feature_with(&[("OBJEKTART", json!(0))]);

        for zoom in ZOOMS {
            for feature in [&siding, &siding_bool] {
                let style = line_style(feature, zoom);
                assert_eq!(style.stroke.width, 1.5);
                assert_eq!(style.stroke.color, Color::Hex(RAIL_COLOR));
            }
            for feature in [&main_line, &unflagged] {
                let style = line_style(feature, zoom);
                assert_eq!(style.stroke.width, 0.75);
                assert_eq!(style.stroke.color, Color::Hex(RAIL_COLOR));
            }
        }
    }

    #[test]
    fn test_other_lines_hidden_below_15() {
        for code in [json!(1), json!(2), json!(4), json!(7), json!(null)] {
            let feature = feature_with(&[("OBJEKTART", code)]);
            for zoom in ZOOMS {
                let style = line_style(&feature, zoom);
                assert_eq!(style.stroke.width, 1.0);
                if zoom < 15.0 {
                    assert_eq!(style.stroke.color, Color::Transparent);
                    assert_eq!(style.stroke.color.css(), "transparent");
                } else {
                    assert_eq!(style.stroke.color, Color::Hex(LINE_COLOR));
                }
            }
        }
    }
}
