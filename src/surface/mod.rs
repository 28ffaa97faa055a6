//! Host-facing drawing abstractions.
//!
//! The renderer never talks to a concrete graphics API. It asks a [`Host`]
//! for a container box and a [`Context2d`], then issues canvas-style calls
//! (scoped transforms, paths, clip, text) against that context.

mod recording;
mod svg;
mod transform;

pub use recording::{DrawCommand, RecordingContext, RecordingHost};
pub use svg::{StaticHost, SvgContext};
pub use transform::Transform;

use serde::Serialize;

use crate::hero::DecodedImage;

/// Client box of a resolved container, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBox {
    pub client_width: f32,
    pub client_height: f32,
}

/// Pixel dimensions of a drawing surface. Fixed for the whole render session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: f32,
    pub family: String,
}

impl Font {
    pub fn new(size: f32, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
        }
    }

    /// CSS shorthand, e.g. `14px sans-serif`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(10.0, "sans-serif")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
    Bottom,
}

/// Canvas-style immediate-mode 2D context.
///
/// Coordinates passed to path and text calls are interpreted in the current
/// user space, i.e. after every `translate`/`rotate`/`scale` issued since the
/// matching `save`. Angles are in radians.
pub trait Context2d {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);
    fn stroke(&mut self);
    /// Intersects the current clip region with the current path.
    fn clip(&mut self);
    fn set_line_width(&mut self, width: f32);

    fn set_font(&mut self, font: &Font);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    /// Rendered advance width of `text` under the current font. Unaffected by
    /// the current transform.
    fn measure_text(&mut self, text: &str) -> f32;
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    fn draw_image(&mut self, image: &DecodedImage, x: f32, y: f32, width: f32, height: f32);

    /// Device width of the backing surface, when the context has one.
    fn surface_width(&self) -> Option<f32> {
        None
    }

    /// The host's computed line height, when it has one.
    fn line_height(&self) -> Option<f32> {
        None
    }
}

/// A host environment that owns containers and can mint drawing surfaces.
pub trait Host {
    type Context: Context2d;

    fn resolve_container(&self, tag_id: &str) -> Option<ContainerBox>;

    /// Creates a surface of `size` device pixels and attaches it under the
    /// container named `tag_id`.
    fn attach_surface(&mut self, tag_id: &str, size: SurfaceSize);

    /// Hands out the 2D context of the surface attached last, or `None` if the
    /// host has no 2D drawing capability.
    fn context_2d(&mut self, size: SurfaceSize) -> Option<Self::Context>;
}
