//! Options round-trip through JSON when the `serde` feature is enabled.
#![cfg(feature = "serde")]

use regular_shape::{
    DeclutterMode, FillSpec, Gradient, LineCap, LineJoin, Paint, Points, RegularShape,
    RegularShapeOptions, Rgba8, StrokeSpec, StyleImage,
};

#[test]
fn options_from_json() {
    let json = r##"{
        "points": {"regular": 5},
        "radius": 10,
        "radius2": 4,
        "angle": 0.5,
        "fill": {"color": "rgba(255, 0, 0, 0.5)"},
        "stroke": {"color": "#00f", "width": 2, "line_cap": "square", "line_join": "bevel",
                   "line_dash": [2, 1]},
        "displacement": [1, 2],
        "declutter_mode": "obstacle"
    }"##;
    let options: RegularShapeOptions = serde_json::from_str(json).unwrap();
    assert_eq!(options.points, Points::Regular(5));
    assert_eq!(options.radius, Some(10.0));
    assert_eq!(options.radius2, Some(4.0));
    assert_eq!(
        options.fill.as_ref().and_then(|f| f.color.clone()),
        Some(Paint::Solid(Rgba8::new(255, 0, 0, 128)))
    );
    let stroke = options.stroke.clone().unwrap();
    assert_eq!(stroke.color, Some(Paint::Solid(Rgba8::new_opaque(0, 0, 255))));
    assert_eq!(stroke.line_cap, Some(LineCap::Square));
    assert_eq!(stroke.line_join, Some(LineJoin::Bevel));
    assert_eq!(stroke.line_dash, Some(vec![2.0, 1.0]));
    assert_eq!(stroke.miter_limit, None);
    assert_eq!(options.opacity, 1.0);
    assert_eq!(options.declutter_mode, Some(DeclutterMode::Obstacle));

    let shape = RegularShape::new(options).unwrap();
    assert_eq!(shape.size(), [25, 25]);
    assert_eq!(shape.anchor(), [11.5, 14.5]);
}

#[test]
fn circle_and_defaults_from_json() {
    let options: RegularShapeOptions =
        serde_json::from_str(r#"{"points": "circle", "radius": 3}"#).unwrap();
    assert_eq!(options.points, Points::Circle);
    assert_eq!(options.scale, [1.0, 1.0]);
    assert!(options.fill.is_none());
    assert!(options.stroke.is_none());
}

#[test]
fn solid_options_round_trip() {
    let options = RegularShapeOptions {
        points: Points::Regular(4),
        radii: Some(vec![8.0, 3.0, 8.0]),
        angle_ratios: Some(vec![0.0, 0.5, 0.75]),
        fill: Some(FillSpec::new(Rgba8::new(1, 2, 3, 4))),
        stroke: Some(StrokeSpec::new().with_width(1.5).with_line_cap(LineCap::Butt)),
        ..Default::default()
    };
    let json = serde_json::to_string(&options).unwrap();
    let back: RegularShapeOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn bad_color_and_gradient_are_rejected() {
    let err = serde_json::from_str::<FillSpec>(r#"{"color": "nope"}"#);
    assert!(err.is_err());

    let gradient = FillSpec::new(Gradient::linear(0.0, 0.0, 1.0, 1.0));
    assert!(serde_json::to_string(&gradient).is_err());
}
