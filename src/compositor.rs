//! Orchestrates one render session: mount, scale, image, labels.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::error::{ImageLoadError, RenderError};
use crate::hero::{DecodedImage, ImageLoader, draw_clipped_image, image_radius};
use crate::layout::{
    CenterPoint, IMAGE_FOOTPRINT, LabelPlacement, ScaleFactors, draw_label, label_slots,
};
use crate::surface::{Context2d, Host, SurfaceSize};

/// Cooperative cancellation flag shared between a render and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Drawn { width: u32, height: u32 },
    /// The image failed to load; the circular region was left empty.
    Blank,
}

/// Everything a finished render produced, including the surface's context so
/// the caller can serialize or inspect it.
#[derive(Debug)]
pub struct RenderOutcome<C> {
    pub context: C,
    pub surface: SurfaceSize,
    /// Surface center in device pixels.
    pub center: CenterPoint,
    pub scale: ScaleFactors,
    /// Image radius in logical units.
    pub radius: f32,
    pub image: ImageStatus,
    pub labels: Vec<LabelPlacement>,
}

type ImageErrorCallback<'a> = Box<dyn FnMut(&ImageLoadError) + 'a>;

/// Renders a hero image and its radial labels onto a host surface.
///
/// The render runs in two phases. The image is resolved first (decode
/// failures degrade to a blank circle and are reported through
/// [`Compositor::on_image_error`]); only then are the image and all labels
/// drawn, so output never depends on load timing.
#[derive(Default)]
pub struct Compositor<'a> {
    cancel: CancelToken,
    on_image_error: Option<ImageErrorCallback<'a>>,
}

impl<'a> Compositor<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn on_image_error(mut self, callback: impl FnMut(&ImageLoadError) + 'a) -> Self {
        self.on_image_error = Some(Box::new(callback));
        self
    }

    pub fn render<H, L>(
        &mut self,
        host: &mut H,
        loader: &L,
        config: &LayoutConfig,
    ) -> Result<RenderOutcome<H::Context>, RenderError>
    where
        H: Host,
        L: ImageLoader + ?Sized,
    {
        let tag_id = config.mounted_tag_id.as_str();
        let surface = mount(host, tag_id)?;
        host.attach_surface(tag_id, surface);
        let mut context = host
            .context_2d(surface)
            .ok_or(RenderError::UnsupportedSurface)?;

        let center = CenterPoint::of_surface(surface);
        let scale = ScaleFactors::for_surface(surface);
        let radius = image_radius(IMAGE_FOOTPRINT.0, IMAGE_FOOTPRINT.1);
        debug!(
            tag_id,
            width = surface.width,
            height = surface.height,
            labels = config.description.len(),
            "mounted surface"
        );

        let image = self.resolve_image(loader, &config.img.url);
        self.check_cancelled()?;

        context.scale(scale.x, scale.y);
        let logical_center = center.to_logical(scale);
        let status = match &image {
            Some(image) => {
                draw_clipped_image(&mut context, logical_center, radius, image);
                ImageStatus::Drawn {
                    width: image.width,
                    height: image.height,
                }
            }
            None => ImageStatus::Blank,
        };

        let mut labels = Vec::with_capacity(config.description.len());
        for slot in label_slots(&config.description) {
            self.check_cancelled()?;
            labels.push(draw_label(
                &mut context,
                logical_center,
                radius,
                slot.angle_degrees,
                slot.text,
            ));
        }

        Ok(RenderOutcome {
            context,
            surface,
            center,
            scale,
            radius,
            image: status,
            labels,
        })
    }

    fn resolve_image<L: ImageLoader + ?Sized>(
        &mut self,
        loader: &L,
        url: &str,
    ) -> Option<DecodedImage> {
        let result = loader.load(url);
        if self.cancel.is_cancelled() {
            return None;
        }
        match result {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(url, error = %err, "image failed to load; leaving the circle blank");
                if let Some(callback) = self.on_image_error.as_mut() {
                    callback(&err);
                }
                None
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), RenderError> {
        if self.cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }
}

/// Renders with default options: no cancellation, image errors only logged.
pub fn render<H, L>(
    host: &mut H,
    loader: &L,
    config: &LayoutConfig,
) -> Result<RenderOutcome<H::Context>, RenderError>
where
    H: Host,
    L: ImageLoader + ?Sized,
{
    Compositor::new().render(host, loader, config)
}

fn mount<H: Host>(host: &H, tag_id: &str) -> Result<SurfaceSize, RenderError> {
    if tag_id.is_empty() {
        return Err(RenderError::mount(tag_id, "container id is empty"));
    }
    let container = host
        .resolve_container(tag_id)
        .ok_or_else(|| RenderError::mount(tag_id, "container not found"))?;
    let (width, height) = (container.client_width, container.client_height);
    if !width.is_finite() || !height.is_finite() {
        return Err(RenderError::mount(tag_id, "container size is not finite"));
    }
    if width < 1.0 || height < 1.0 {
        return Err(RenderError::mount(
            tag_id,
            format!("container has no area ({width}x{height})"),
        ));
    }
    Ok(SurfaceSize {
        width: width.floor() as u32,
        height: height.floor() as u32,
    })
}
