//! Integration tests for shape geometry, rendering and the symbol API.

use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use approx::assert_relative_eq;
use regular_shape::{
    outline_vertices, render, trace_outline, DrawingSurface, Error, FillSpec, Gradient, Paint,
    Pattern, Points, RasterSurface, RasterSurfaceFactory, RegularShape, RegularShapeOptions,
    Repetition, Rgba8, ShapeSpec, StrokeSpec, StyleImage, SurfaceFactory, MAX_VERTICES,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn factory() -> RasterSurfaceFactory {
    RasterSurfaceFactory::default()
}

fn center_pixel(bitmap: &regular_shape::Bitmap) -> Rgba8 {
    bitmap.pixel(bitmap.width() / 2, bitmap.height() / 2).unwrap()
}

#[test]
fn polygon_vertices_lie_on_radius_with_even_spacing() {
    for n in 3..=12 {
        let angle = 0.37;
        let spec = ShapeSpec::polygon(n, 15.0, angle).unwrap();
        let verts = outline_vertices(&spec, 20.0, 30.0);
        assert_eq!(verts.len(), n as usize);

        let sector = 2.0 * PI / n as f64;
        for (i, p) in verts.iter().enumerate() {
            let (dx, dy) = (p.x - 20.0, p.y - 30.0);
            assert_relative_eq!((dx * dx + dy * dy).sqrt(), 15.0, epsilon = 1e-9);
            let expected = i as f64 * sector - FRAC_PI_2 + angle;
            assert_relative_eq!(dx, 15.0 * expected.cos(), epsilon = 1e-9);
            assert_relative_eq!(dy, 15.0 * expected.sin(), epsilon = 1e-9);
        }
    }
}

#[test]
fn star_vertices_alternate_between_radii() {
    let spec = ShapeSpec::star(6, 12.0, 5.0, 0.0).unwrap();
    let verts = outline_vertices(&spec, 0.0, 0.0);
    assert_eq!(verts.len(), 12);
    for (k, p) in verts.iter().enumerate() {
        let r = (p.x * p.x + p.y * p.y).sqrt();
        let expected = if k % 2 == 0 { 12.0 } else { 5.0 };
        assert_relative_eq!(r, expected, epsilon = 1e-9);
    }
}

#[test]
fn circle_is_an_arc_of_the_first_radius() {
    let spec = ShapeSpec::new(Points::Circle, vec![9.0, 3.0], None, 1.0).unwrap();
    let mut surface = RasterSurface::new(30, 30);
    trace_outline(&spec, 15.0, 15.0, &mut surface);
    let verts = surface.path().vertices();
    assert!(verts.len() > 4);
    for v in verts {
        let r = ((v.x - 15.0).powi(2) + (v.y - 15.0).powi(2)).sqrt();
        assert_relative_eq!(r, 9.0, epsilon = 1e-9);
    }
}

#[test]
fn size_formula_before_rounding() {
    init();
    let spec = ShapeSpec::polygon(5, 10.0, 0.0).unwrap();
    let glyph = render(&factory(), &spec, None, Some(&FillSpec::default()), [0.0, 0.0]).unwrap();
    assert_eq!(glyph.size(), [21, 21]);
    assert_eq!(glyph.image().size(), [21, 21]);
}

#[test]
fn fractional_size_rounds_up() {
    init();
    let spec = ShapeSpec::polygon(5, 9.75, 0.0).unwrap();
    // 2 * 9.75 + 1 = 20.5
    let glyph = render(&factory(), &spec, None, None, [0.0, 0.0]).unwrap();
    assert_eq!(glyph.size(), [21, 21]);
    assert_eq!(glyph.anchor(), [10.5, 10.5]);
}

#[test]
fn anchor_follows_displacement() {
    init();
    let spec = ShapeSpec::circle(10.0).unwrap();
    for (dx, dy) in [(0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (-3.5, 2.25)] {
        let glyph = render(&factory(), &spec, None, None, [dx, dy]).unwrap();
        assert_eq!(glyph.anchor(), [10.5 - dx, 10.5 + dy]);
    }
}

#[test]
fn render_twice_gives_same_size_and_anchor() {
    init();
    let spec = ShapeSpec::new(
        Points::Regular(7),
        vec![14.0, 9.0, 11.0],
        Some(vec![0.0, 0.4, 0.7]),
        0.5,
    )
    .unwrap();
    let stroke = StrokeSpec::new().with_width(1.5);
    let fill = FillSpec::new(Rgba8::new_opaque(0, 128, 0));
    let a = render(&factory(), &spec, Some(&stroke), Some(&fill), [2.0, -1.0]).unwrap();
    let b = render(&factory(), &spec, Some(&stroke), Some(&fill), [2.0, -1.0]).unwrap();
    assert_eq!(a.size(), b.size());
    assert_eq!(a.anchor(), b.anchor());
}

#[test]
fn hit_detection_aliases_unless_fill_is_transparent_solid() {
    init();
    let spec = ShapeSpec::star(5, 10.0, 4.0, 0.0).unwrap();
    let mut gradient = Gradient::radial(10.5, 10.5, 10.0);
    gradient.add_color_stop(0.0, Rgba8::TRANSPARENT);
    let pattern = Pattern::new(
        regular_shape::Bitmap::from_rgba(1, 1, vec![0, 0, 0, 0]).unwrap(),
        Repetition::Repeat,
    );

    let aliasing = [
        None,
        Some(FillSpec::default()),
        Some(FillSpec::new(Rgba8::new(0, 0, 0, 1))),
        Some(FillSpec::new(gradient)),
        Some(FillSpec::new(pattern)),
    ];
    for fill in &aliasing {
        let glyph = render(&factory(), &spec, None, fill.as_ref(), [0.0, 0.0]).unwrap();
        assert!(Arc::ptr_eq(glyph.image(), glyph.hit_detection_image()));
    }

    let fill = FillSpec::new(Paint::parse("rgba(255, 0, 0, 0)").unwrap());
    let glyph = render(&factory(), &spec, None, Some(&fill), [0.0, 0.0]).unwrap();
    assert!(!Arc::ptr_eq(glyph.image(), glyph.hit_detection_image()));
    assert_eq!(glyph.hit_detection_image().size(), glyph.image().size());
}

#[test]
fn transparent_fill_hit_detection_is_opaque() {
    init();
    let shape = RegularShape::new(RegularShapeOptions {
        points: Points::Regular(4),
        radius: Some(10.0),
        fill: Some(FillSpec::new(Rgba8::TRANSPARENT)),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(center_pixel(shape.image()).a, 0);
    assert_eq!(center_pixel(shape.hit_detection_image()), Rgba8::BLACK);
}

#[test]
fn opaque_fill_renders_opaque_center() {
    init();
    let red = Rgba8::new_opaque(255, 0, 0);
    let shape = RegularShape::new(RegularShapeOptions {
        points: Points::Regular(6),
        radius: Some(10.0),
        fill: Some(FillSpec::new(red)),
        stroke: Some(StrokeSpec::new()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(center_pixel(shape.image()), red);
    assert_eq!(shape.image().pixel(0, 0).unwrap().a, 0);
}

#[test]
fn dashed_stroke_covers_less_than_solid() {
    init();
    let ring = |stroke: StrokeSpec| {
        RegularShape::new(RegularShapeOptions {
            points: Points::Circle,
            radius: Some(10.0),
            stroke: Some(stroke),
            ..Default::default()
        })
        .unwrap()
    };
    let coverage = |shape: &RegularShape| -> u32 {
        shape.image().data().chunks_exact(4).map(|p| p[3] as u32).sum()
    };

    let solid = ring(StrokeSpec::new().with_width(2.0));
    let dashed = ring(StrokeSpec::new().with_width(2.0).with_line_dash(vec![3.0], 0.0));
    assert_eq!(dashed.size(), [25, 25]);
    assert_eq!(center_pixel(dashed.image()).a, 0);
    assert!(coverage(&dashed) > 0);
    assert!(coverage(&dashed) < coverage(&solid));
}

#[test]
fn invalid_specs_fail_at_construction() {
    let cases = [
        (
            RegularShapeOptions {
                points: Points::Regular(5),
                radii: Some(vec![]),
                ..Default::default()
            },
            Error::EmptyRadii,
        ),
        (
            RegularShapeOptions {
                points: Points::Regular(5),
                radius: Some(10.0),
                radius2: Some(5.0),
                angle_ratios: Some(vec![0.0, 0.5, 0.7]),
                ..Default::default()
            },
            Error::AngleRatioMismatch {
                radii: 2,
                angle_ratios: 3,
            },
        ),
        (
            RegularShapeOptions {
                points: Points::Regular(2),
                radius: Some(10.0),
                ..Default::default()
            },
            Error::TooFewPoints(2),
        ),
        (
            RegularShapeOptions {
                points: Points::Regular(u32::MAX),
                radius: Some(10.0),
                ..Default::default()
            },
            Error::TooManyVertices {
                points: u32::MAX,
                radii: 1,
                max: MAX_VERTICES,
            },
        ),
        (
            RegularShapeOptions {
                points: Points::Circle,
                radius: Some(0.0),
                ..Default::default()
            },
            Error::InvalidRadius(0.0),
        ),
    ];
    for (options, expected) in cases {
        assert_eq!(RegularShape::new(options).unwrap_err(), expected);
    }
}

#[test]
fn oversized_surface_is_an_error() {
    let spec = ShapeSpec::circle(100.0).unwrap();
    let small = RasterSurfaceFactory::new(64);
    assert!(matches!(
        render(&small, &spec, None, None, [0.0, 0.0]),
        Err(Error::SurfaceAllocation { .. })
    ));
}

#[test]
fn clones_render_their_own_images() {
    init();
    let original = RegularShape::new(RegularShapeOptions {
        points: Points::Regular(5),
        radius: Some(10.0),
        radius2: Some(4.0),
        fill: Some(FillSpec::new(Rgba8::TRANSPARENT)),
        stroke: Some(StrokeSpec::new().with_color(Rgba8::new_opaque(0, 0, 255))),
        displacement: [1.0, 2.0],
        ..Default::default()
    })
    .unwrap();
    let clone = original.try_clone().unwrap();

    assert!(!Arc::ptr_eq(original.image(), clone.image()));
    assert!(!Arc::ptr_eq(
        original.hit_detection_image(),
        clone.hit_detection_image()
    ));
    assert_eq!(original.image().as_ref(), clone.image().as_ref());
    assert_eq!(original.anchor(), clone.anchor());
    assert_eq!(original.size(), clone.size());
    assert_eq!(original.radii(), clone.radii());
    assert_eq!(original.fill(), clone.fill());
    assert_eq!(original.stroke(), clone.stroke());
}

#[test]
fn custom_surface_without_dash_support_still_strokes() {
    init();

    /// Wraps the raster surface but reports no dash support.
    struct Plain(RasterSurface);

    impl DrawingSurface for Plain {
        fn width(&self) -> u32 {
            self.0.width()
        }
        fn height(&self) -> u32 {
            self.0.height()
        }
        fn reset_transform(&mut self) {
            self.0.reset_transform()
        }
        fn set_transform(&mut self, t: regular_shape::TransAffine) {
            self.0.set_transform(t)
        }
        fn begin_path(&mut self) {
            self.0.begin_path()
        }
        fn move_to(&mut self, x: f64, y: f64) {
            self.0.move_to(x, y)
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.0.line_to(x, y)
        }
        fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, acw: bool) {
            self.0.arc(x, y, r, a0, a1, acw)
        }
        fn close_path(&mut self) {
            self.0.close_path()
        }
        fn set_fill_style(&mut self, paint: Paint) {
            self.0.set_fill_style(paint)
        }
        fn fill(&mut self) {
            self.0.fill()
        }
        fn set_stroke_style(&mut self, paint: Paint) {
            self.0.set_stroke_style(paint)
        }
        fn set_line_width(&mut self, w: f64) {
            self.0.set_line_width(w)
        }
        fn set_line_cap(&mut self, cap: regular_shape::LineCap) {
            self.0.set_line_cap(cap)
        }
        fn set_line_join(&mut self, join: regular_shape::LineJoin) {
            self.0.set_line_join(join)
        }
        fn set_miter_limit(&mut self, limit: f64) {
            self.0.set_miter_limit(limit)
        }
        fn stroke(&mut self) {
            self.0.stroke()
        }
        fn into_bitmap(self) -> regular_shape::Bitmap {
            self.0.into_bitmap()
        }
    }

    struct PlainFactory;

    impl SurfaceFactory for PlainFactory {
        type Surface = Plain;

        fn create_surface(&self, w: f64, h: f64) -> regular_shape::Result<Plain> {
            RasterSurfaceFactory::default().create_surface(w, h).map(Plain)
        }
    }

    let spec = ShapeSpec::polygon(4, 10.0, 0.0).unwrap();
    let dashed = StrokeSpec::new().with_width(2.0).with_line_dash(vec![1.0, 1.0], 0.0);
    let solid = StrokeSpec::new().with_width(2.0);
    let a = render(&PlainFactory, &spec, Some(&dashed), None, [0.0, 0.0]).unwrap();
    let b = render(&PlainFactory, &spec, Some(&solid), None, [0.0, 0.0]).unwrap();
    assert_eq!(a.image().as_ref(), b.image().as_ref());
}
