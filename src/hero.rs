//! Hero image acquisition and the circular clip draw.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use serde::Serialize;

use crate::error::ImageLoadError;
use crate::layout::{CenterPoint, IMAGE_FOOTPRINT};
use crate::surface::Context2d;

/// A decoded raster image, ready to be placed on a surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Self-contained reference to the pixels (a `data:` URI for loaded
    /// files), usable by surfaces that embed rather than blit.
    #[serde(skip)]
    pub href: String,
}

/// Host-provided image decode.
pub trait ImageLoader {
    fn load(&self, url: &str) -> Result<DecodedImage, ImageLoadError>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> Result<DecodedImage, ImageLoadError>,
{
    fn load(&self, url: &str) -> Result<DecodedImage, ImageLoadError> {
        self(url)
    }
}

/// Loads images from local paths, `file://` URLs and `data:` URIs.
///
/// Remote URLs are rejected with [`ImageLoadError::UnsupportedScheme`]; the
/// renderer has no network access.
#[derive(Debug, Clone, Default)]
pub struct FsImageLoader {
    base_dir: Option<PathBuf>,
}

impl FsImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `dir` instead of the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn read_bytes(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        if let Some(rest) = url.strip_prefix("data:") {
            return decode_data_uri(rest);
        }
        if url.contains("://") && !url.starts_with("file://") {
            return Err(ImageLoadError::UnsupportedScheme(url.to_string()));
        }
        let raw = Path::new(url.strip_prefix("file://").unwrap_or(url));
        let path = match &self.base_dir {
            Some(base) if raw.is_relative() => base.join(raw),
            _ => raw.to_path_buf(),
        };
        std::fs::read(&path).map_err(|source| ImageLoadError::Io {
            url: url.to_string(),
            source,
        })
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, url: &str) -> Result<DecodedImage, ImageLoadError> {
        let bytes = self.read_bytes(url)?;
        let decode_error = |source| ImageLoadError::Decode {
            url: url.to_string(),
            source,
        };
        let format = image::guess_format(&bytes).map_err(decode_error)?;
        let decoded = image::load_from_memory_with_format(&bytes, format).map_err(decode_error)?;
        Ok(DecodedImage {
            width: decoded.width(),
            height: decoded.height(),
            href: to_data_uri(format, &bytes),
        })
    }
}

fn decode_data_uri(rest: &str) -> Result<Vec<u8>, ImageLoadError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageLoadError::DataUri("missing ',' separator".to_string()))?;
    if meta.ends_with(";base64") {
        STANDARD
            .decode(payload.trim())
            .map_err(|err| ImageLoadError::DataUri(err.to_string()))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

fn to_data_uri(format: ImageFormat, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    )
}

/// Radius of the circular clip: half of the shorter side of the footprint.
pub fn image_radius(width: f32, height: f32) -> f32 {
    (width.min(height) / 2.0).floor()
}

/// Clips a circle of `radius` around `center` and draws `image` scaled to the
/// fixed footprint inside it. The clip is scoped to this call.
pub fn draw_clipped_image<C: Context2d + ?Sized>(
    ctx: &mut C,
    center: CenterPoint,
    radius: f32,
    image: &DecodedImage,
) {
    let (width, height) = IMAGE_FOOTPRINT;
    let offset_x = (center.x - width / 2.0).floor();
    let offset_y = (center.y - height / 2.0).floor();

    ctx.save();
    ctx.begin_path();
    ctx.arc(center.x, center.y, radius, 0.0, std::f32::consts::TAU);
    ctx.clip();
    ctx.draw_image(image, offset_x, offset_y, width, height);
    ctx.restore();
}
