//! The regular shape symbol: a circle, polygon or star rendered once into a
//! cached image.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::image_style::{DeclutterMode, ImageState, ImageStyle, StyleImage};
use crate::render::{render, RenderedGlyph};
use crate::rendering_buffer::Bitmap;
use crate::shape::{Points, ShapeSpec};
use crate::style::{FillSpec, StrokeSpec};
use crate::surface::{RasterSurfaceFactory, SurfaceFactory};

/// Construction options for [`RegularShape`].
///
/// Radii come from `radii` when it is set. Otherwise the first radius is
/// `radius` (or its older name `radius1`) and `radius2`, when set, adds an
/// inner radius for a star.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegularShapeOptions {
    pub points: Points,
    pub radius: Option<f64>,
    pub radius1: Option<f64>,
    pub radius2: Option<f64>,
    pub radii: Option<Vec<f64>>,
    pub angle_ratios: Option<Vec<f64>>,
    /// Radians; 0 puts the first point straight up.
    pub angle: f64,
    pub fill: Option<FillSpec>,
    pub stroke: Option<StrokeSpec>,
    pub displacement: [f64; 2],
    pub rotation: f64,
    pub rotate_with_view: bool,
    pub scale: [f64; 2],
    pub opacity: f64,
    pub declutter_mode: Option<DeclutterMode>,
}

impl Default for RegularShapeOptions {
    fn default() -> Self {
        Self {
            points: Points::Circle,
            radius: None,
            radius1: None,
            radius2: None,
            radii: None,
            angle_ratios: None,
            angle: 0.0,
            fill: None,
            stroke: None,
            displacement: [0.0, 0.0],
            rotation: 0.0,
            rotate_with_view: false,
            scale: [1.0, 1.0],
            opacity: 1.0,
            declutter_mode: None,
        }
    }
}

impl RegularShapeOptions {
    /// The radius list these options describe.
    pub fn resolve_radii(&self) -> Result<Vec<f64>> {
        if let Some(radii) = &self.radii {
            return Ok(radii.clone());
        }
        let first = self.radius.or(self.radius1).ok_or(Error::EmptyRadii)?;
        Ok(std::iter::once(first).chain(self.radius2).collect())
    }

    /// Validated shape geometry.
    pub fn shape_spec(&self) -> Result<ShapeSpec> {
        ShapeSpec::new(
            self.points,
            self.resolve_radii()?,
            self.angle_ratios.clone(),
            self.angle,
        )
    }
}

/// A circle, polygon or star symbol.
///
/// The image is rendered when the shape is built and never changes. A
/// shape only exists if rendering succeeded.
#[derive(Debug)]
pub struct RegularShape {
    spec: ShapeSpec,
    fill: Option<FillSpec>,
    stroke: Option<StrokeSpec>,
    image_style: ImageStyle,
    rendered: RenderedGlyph,
}

impl RegularShape {
    /// Build and render with the default raster surfaces.
    pub fn new(options: RegularShapeOptions) -> Result<Self> {
        Self::with_factory(options, &RasterSurfaceFactory::default())
    }

    /// Build and render on surfaces from `factory`.
    pub fn with_factory<F: SurfaceFactory + ?Sized>(
        options: RegularShapeOptions,
        factory: &F,
    ) -> Result<Self> {
        let spec = options.shape_spec()?;
        let image_style = ImageStyle::new(
            options.opacity,
            options.rotate_with_view,
            options.rotation,
            options.scale,
            options.displacement,
            options.declutter_mode,
        );
        let rendered = render(
            factory,
            &spec,
            options.stroke.as_ref(),
            options.fill.as_ref(),
            options.displacement,
        )?;
        Ok(Self {
            spec,
            fill: options.fill,
            stroke: options.stroke,
            image_style,
            rendered,
        })
    }

    /// The options this shape was built from, with radii spelled out.
    pub fn options(&self) -> RegularShapeOptions {
        let s = &self.image_style;
        RegularShapeOptions {
            points: self.spec.points(),
            radius: None,
            radius1: None,
            radius2: None,
            radii: Some(self.spec.radii().to_vec()),
            angle_ratios: self.spec.angle_ratios().map(<[f64]>::to_vec),
            angle: self.spec.angle(),
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            displacement: s.displacement(),
            rotation: s.rotation(),
            rotate_with_view: s.rotate_with_view(),
            scale: s.scale(),
            opacity: s.opacity(),
            declutter_mode: s.declutter_mode(),
        }
    }

    /// A copy with its own freshly rendered images.
    pub fn try_clone(&self) -> Result<Self> {
        self.try_clone_with(&RasterSurfaceFactory::default())
    }

    pub fn try_clone_with<F: SurfaceFactory + ?Sized>(&self, factory: &F) -> Result<Self> {
        Self::with_factory(self.options(), factory)
    }

    pub fn shape(&self) -> &ShapeSpec {
        &self.spec
    }

    pub fn points(&self) -> Points {
        self.spec.points()
    }

    pub fn radius(&self) -> f64 {
        self.spec.radii()[0]
    }

    /// Inner radius of a star.
    pub fn radius2(&self) -> Option<f64> {
        self.spec.radii().get(1).copied()
    }

    pub fn radii(&self) -> &[f64] {
        self.spec.radii()
    }

    pub fn angle_ratios(&self) -> Option<&[f64]> {
        self.spec.angle_ratios()
    }

    pub fn angle(&self) -> f64 {
        self.spec.angle()
    }

    pub fn fill(&self) -> Option<&FillSpec> {
        self.fill.as_ref()
    }

    pub fn stroke(&self) -> Option<&StrokeSpec> {
        self.stroke.as_ref()
    }

    pub fn displacement(&self) -> [f64; 2] {
        self.image_style.displacement()
    }

    pub fn rotation(&self) -> f64 {
        self.image_style.rotation()
    }

    pub fn rotate_with_view(&self) -> bool {
        self.image_style.rotate_with_view()
    }

    pub fn scale(&self) -> [f64; 2] {
        self.image_style.scale()
    }

    pub fn opacity(&self) -> f64 {
        self.image_style.opacity()
    }

    pub fn declutter_mode(&self) -> Option<DeclutterMode> {
        self.image_style.declutter_mode()
    }

    pub fn rendered(&self) -> &RenderedGlyph {
        &self.rendered
    }
}

impl StyleImage for RegularShape {
    fn image_style(&self) -> &ImageStyle {
        &self.image_style
    }

    fn anchor(&self) -> [f64; 2] {
        self.rendered.anchor()
    }

    fn image(&self) -> &Arc<Bitmap> {
        self.rendered.image()
    }

    fn image_size(&self) -> [u32; 2] {
        self.rendered.image_size()
    }

    fn size(&self) -> [u32; 2] {
        self.rendered.size()
    }

    fn hit_detection_image(&self) -> &Arc<Bitmap> {
        self.rendered.hit_detection_image()
    }

    fn hit_detection_image_size(&self) -> [u32; 2] {
        self.rendered.hit_detection_image_size()
    }

    /// Always loaded: the image is drawn synchronously.
    fn image_state(&self) -> ImageState {
        ImageState::Loaded
    }
}
