//! # regular-shape
//!
//! Parametric point symbols (circles, regular polygons, stars and bursts)
//! rendered once into cached RGBA images, with a second image for hit
//! detection that stays opaque even when the visible fill is transparent.
//!
//! ```no_run
//! use regular_shape::{FillSpec, Points, RegularShape, RegularShapeOptions, Rgba8, StyleImage};
//!
//! let star = RegularShape::new(RegularShapeOptions {
//!     points: Points::Regular(5),
//!     radius: Some(10.0),
//!     radius2: Some(4.0),
//!     fill: Some(FillSpec::new(Rgba8::new_opaque(255, 200, 0))),
//!     ..Default::default()
//! })?;
//! assert_eq!(star.size(), [21, 21]);
//! # Ok::<(), regular_shape::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Shapes are drawn through a small anti-aliased scanline pipeline:
//!
//! 1. **Vertex Source**: paths and arcs produce vertices
//! 2. **Conversion**: dash and stroke generators turn center lines into
//!    outlines
//! 3. **Scanline Rasterizer**: converts polygons to anti-aliased coverage
//! 4. **Scanline Container**: holds coverage spans for one row
//! 5. **Renderer**: blends solid, gradient or pattern paint into the buffer
//!
//! [`RasterSurface`] wraps the pipeline in a 2D drawing context behind the
//! [`DrawingSurface`] trait, so the renderer can target other surfaces.

// Foundation types and math
pub mod basics;
pub mod color;
pub mod error;
pub mod math;

// Geometry
pub mod arc;
pub mod dash;
pub mod path_storage;
pub mod stroke;
pub mod trans_affine;
pub mod vertex_sequence;

// Scanline rasterizer
pub mod rasterizer_cells_aa;
pub mod rasterizer_scanline_aa;
pub mod scanline_u;

// Pixel formats and renderers
pub mod paint;
pub mod pixfmt_rgba;
pub mod renderer_base;
pub mod renderer_scanline;
pub mod rendering_buffer;
pub mod surface;

// Shape symbols
pub mod image_style;
pub mod regular_shape;
pub mod render;
pub mod shape;
pub mod style;

pub use color::{parse_color, to_array, Rgba8};
pub use error::{Error, Result};
pub use image_style::{DeclutterMode, ImageState, ImageStyle, StyleImage};
pub use paint::{Gradient, Paint, Pattern, Repetition};
pub use regular_shape::{RegularShape, RegularShapeOptions};
pub use render::{derive_hit_detection, render, RenderedGlyph};
pub use rendering_buffer::Bitmap;
pub use shape::{outline_vertices, trace_outline, Points, ShapeSpec, MAX_VERTICES};
pub use stroke::{LineCap, LineJoin};
pub use style::{
    FillSpec, RenderOptions, ResolvedStroke, StrokeSpec, DEFAULT_FILL_COLOR, DEFAULT_LINE_CAP,
    DEFAULT_LINE_JOIN, DEFAULT_LINE_WIDTH, DEFAULT_MITER_LIMIT, DEFAULT_STROKE_COLOR,
};
pub use surface::{DrawingSurface, RasterSurface, RasterSurfaceFactory, SurfaceFactory};
pub use trans_affine::TransAffine;
