//! Radial label layout.
//!
//! All layout math is authored against a fixed 500×500 logical space; the
//! compositor scales that space onto the real surface before drawing.

mod label;
pub mod rules;
pub mod wrap;

pub use label::{LabelPlacement, draw_label, plan_label};
pub use rules::{
    ElbowBranch, ElbowPlacement, TextBranch, TextPlacement, elbow_rotation, text_placement,
};
pub use wrap::{WrapOptions, WrappedText, fill_lines, wrap_lines, wrap_text};

use serde::Serialize;

use crate::surface::{Font, SurfaceSize};

/// Side of the square logical space.
pub const LOGICAL_SIZE: f32 = 500.0;
/// Logical size the hero image is drawn at.
pub const IMAGE_FOOTPRINT: (f32, f32) = (160.0, 160.0);
/// How far the radial leader reaches past the image edge.
pub const LEADER_EXTENSION: f32 = 60.0;
pub const ELBOW_LENGTH: f32 = 20.0;
pub const WRAP_WIDTH: f32 = 80.0;
pub const LINE_HEIGHT: f32 = 16.0;
pub const LABEL_FONT_SIZE: f32 = 14.0;
pub const LABEL_FONT_FAMILY: &str = "sans-serif";

pub fn label_font() -> Font {
    Font::new(LABEL_FONT_SIZE, LABEL_FONT_FAMILY)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CenterPoint {
    pub x: f32,
    pub y: f32,
}

impl CenterPoint {
    /// Pixel center of a surface, rounded down.
    pub fn of_surface(size: SurfaceSize) -> Self {
        Self {
            x: (size.width / 2) as f32,
            y: (size.height / 2) as f32,
        }
    }

    /// The same point expressed in logical units under `scale`.
    pub fn to_logical(self, scale: ScaleFactors) -> Self {
        Self {
            x: self.x / scale.x,
            y: self.y / scale.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleFactors {
    pub x: f32,
    pub y: f32,
}

impl ScaleFactors {
    /// Factors mapping the logical space onto a surface of `size`.
    pub fn for_surface(size: SurfaceSize) -> Self {
        Self {
            x: size.width as f32 / LOGICAL_SIZE,
            y: size.height as f32 / LOGICAL_SIZE,
        }
    }
}

/// One label's position in the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSlot<'a> {
    pub index: usize,
    pub angle_degrees: f32,
    pub text: &'a str,
}

/// Angle of slot `index` out of `count`: `(360 / count) * (index + 1)`.
///
/// Computed as `360 * (index + 1) / count` so the closing slot lands on
/// exactly 360.
pub fn slot_angle(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    (360.0 * (index + 1) as f64 / count as f64) as f32
}

pub fn label_slots<S: AsRef<str>>(labels: &[S]) -> impl Iterator<Item = LabelSlot<'_>> {
    let count = labels.len();
    labels.iter().enumerate().map(move |(index, text)| LabelSlot {
        index,
        angle_degrees: slot_angle(index, count),
        text: text.as_ref(),
    })
}
