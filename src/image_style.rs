//! The image-style contract shared by point symbols.
//!
//! [`ImageStyle`] holds the placement properties every image symbol has.
//! [`StyleImage`] is the interface a renderer uses to place a symbol's
//! bitmap.

use std::sync::Arc;

use crate::rendering_buffer::Bitmap;

/// How a symbol takes part in decluttering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeclutterMode {
    /// Hidden when it overlaps an already placed symbol.
    Declutter,
    /// Always drawn, and blocks later symbols.
    Obstacle,
    /// Always drawn, never blocks.
    None,
}

/// Load state of a symbol's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Placement properties of an image symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStyle {
    opacity: f64,
    rotate_with_view: bool,
    rotation: f64,
    scale: [f64; 2],
    displacement: [f64; 2],
    declutter_mode: Option<DeclutterMode>,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            rotate_with_view: false,
            rotation: 0.0,
            scale: [1.0, 1.0],
            displacement: [0.0, 0.0],
            declutter_mode: None,
        }
    }
}

impl ImageStyle {
    pub fn new(
        opacity: f64,
        rotate_with_view: bool,
        rotation: f64,
        scale: [f64; 2],
        displacement: [f64; 2],
        declutter_mode: Option<DeclutterMode>,
    ) -> Self {
        Self {
            opacity,
            rotate_with_view,
            rotation,
            scale,
            displacement,
            declutter_mode,
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn rotate_with_view(&self) -> bool {
        self.rotate_with_view
    }

    /// Rotation in radians, clockwise.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn scale(&self) -> [f64; 2] {
        self.scale
    }

    /// Offset of the symbol in pixels; positive y moves it up.
    pub fn displacement(&self) -> [f64; 2] {
        self.displacement
    }

    pub fn declutter_mode(&self) -> Option<DeclutterMode> {
        self.declutter_mode
    }
}

/// A symbol drawn from a bitmap.
pub trait StyleImage {
    fn image_style(&self) -> &ImageStyle;

    /// Pixel in the image that is placed on the feature's position.
    fn anchor(&self) -> [f64; 2];

    fn image(&self) -> &Arc<Bitmap>;

    fn image_size(&self) -> [u32; 2];

    /// Size of the symbol before scaling.
    fn size(&self) -> [u32; 2];

    /// Image used for picking. Never fully transparent where the symbol is.
    fn hit_detection_image(&self) -> &Arc<Bitmap>;

    fn hit_detection_image_size(&self) -> [u32; 2];

    /// Top-left corner of the symbol within the image.
    fn origin(&self) -> [f64; 2] {
        [0.0, 0.0]
    }

    fn image_state(&self) -> ImageState;

    /// Start loading the image, if it needs loading.
    fn load(&self) {}

    fn listen_image_change(&self, _listener: &dyn Fn(ImageState)) {}

    fn unlisten_image_change(&self, _listener: &dyn Fn(ImageState)) {}
}
