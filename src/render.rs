//! Rendering a shape into its image and hit-detection image.

use std::sync::Arc;

use log::{debug, trace};

use crate::error::Result;
use crate::paint::Paint;
use crate::rendering_buffer::Bitmap;
use crate::shape::{trace_outline, ShapeSpec};
use crate::style::{FillSpec, RenderOptions, StrokeSpec, DEFAULT_FILL_COLOR};
use crate::surface::{DrawingSurface, SurfaceFactory};

/// The rendered images of a shape and where they are anchored.
///
/// `hit_detection_image` is either the same allocation as `image` or a
/// separate image with an opaque fill.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGlyph {
    image: Arc<Bitmap>,
    hit_detection_image: Arc<Bitmap>,
    anchor: [f64; 2],
    size: [u32; 2],
    image_size: [u32; 2],
}

impl RenderedGlyph {
    pub fn image(&self) -> &Arc<Bitmap> {
        &self.image
    }

    pub fn hit_detection_image(&self) -> &Arc<Bitmap> {
        &self.hit_detection_image
    }

    /// Pixel position in the image that lines up with the feature.
    pub fn anchor(&self) -> [f64; 2] {
        self.anchor
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn image_size(&self) -> [u32; 2] {
        self.image_size
    }

    pub fn hit_detection_image_size(&self) -> [u32; 2] {
        self.hit_detection_image.size()
    }

    /// Whether the hit-detection image is the primary image.
    pub fn shares_hit_detection_image(&self) -> bool {
        Arc::ptr_eq(&self.image, &self.hit_detection_image)
    }
}

/// Render `spec` with optional stroke and fill onto a square surface from
/// `factory`.
///
/// The anchor is the surface center moved by `displacement`, with y
/// pointing up.
pub fn render<F: SurfaceFactory + ?Sized>(
    factory: &F,
    spec: &ShapeSpec,
    stroke: Option<&StrokeSpec>,
    fill: Option<&FillSpec>,
    displacement: [f64; 2],
) -> Result<RenderedGlyph> {
    let options = RenderOptions::resolve(spec, stroke);
    let mut surface = factory.create_surface(options.size, options.size)?;
    let size = surface.width();

    draw(&mut surface, spec, &options, fill.map(FillSpec::paint));
    let image = Arc::new(surface.into_bitmap());
    let hit_detection_image = derive_hit_detection(factory, spec, &options, fill, &image)?;

    let half = size as f64 / 2.0;
    let glyph = RenderedGlyph {
        image,
        hit_detection_image,
        anchor: [half - displacement[0], half + displacement[1]],
        size: [size, size],
        image_size: [size, size],
    };
    trace!(
        "rendered {:?} shape: requested size {}, realized {}, anchor {:?}",
        spec.points(),
        options.size,
        size,
        glyph.anchor
    );
    Ok(glyph)
}

/// The hit-detection image for a rendered shape.
///
/// This is `image` itself unless the fill is a fully transparent solid
/// color, in which case the shape is drawn again on a surface of the same
/// size with the default fill color and the same stroke.
pub fn derive_hit_detection<F: SurfaceFactory + ?Sized>(
    factory: &F,
    spec: &ShapeSpec,
    options: &RenderOptions,
    fill: Option<&FillSpec>,
    image: &Arc<Bitmap>,
) -> Result<Arc<Bitmap>> {
    if !fill.is_some_and(FillSpec::is_transparent) {
        return Ok(Arc::clone(image));
    }
    debug!("fill is transparent, drawing an opaque hit-detection image");
    let side = image.width() as f64;
    let mut surface = factory.create_surface(side, side)?;
    draw(
        &mut surface,
        spec,
        options,
        Some(Paint::Solid(DEFAULT_FILL_COLOR)),
    );
    Ok(Arc::new(surface.into_bitmap()))
}

fn draw<S: DrawingSurface>(
    surface: &mut S,
    spec: &ShapeSpec,
    options: &RenderOptions,
    fill: Option<Paint>,
) {
    surface.reset_transform();
    surface.begin_path();
    let center = surface.width() as f64 / 2.0;
    trace_outline(spec, center, center, surface);

    if let Some(paint) = fill {
        surface.set_fill_style(paint);
        surface.fill();
    }

    if let Some(stroke) = &options.stroke {
        surface.set_stroke_style(stroke.paint.clone());
        surface.set_line_width(stroke.width);
        surface.set_line_cap(stroke.line_cap);
        surface.set_line_join(stroke.line_join);
        surface.set_miter_limit(stroke.miter_limit);
        if let Some(dash) = &stroke.line_dash {
            if surface.supports_line_dash() {
                surface.set_line_dash(dash);
                surface.set_line_dash_offset(stroke.line_dash_offset);
            } else {
                debug!("surface has no line dash support, stroking solid");
            }
        }
        surface.stroke();
    }
}
