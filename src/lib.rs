#[cfg(feature = "cli")]
pub mod cli;
pub mod compositor;
pub mod config;
pub mod error;
pub mod hero;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod surface;
pub mod text_metrics;

#[cfg(feature = "cli")]
pub use cli::run;
pub use compositor::{CancelToken, Compositor, ImageStatus, RenderOutcome, render};
pub use config::{Config, LayoutConfig, RenderConfig, load_config, parse_config};
pub use error::{ImageLoadError, RenderError};
pub use hero::{DecodedImage, FsImageLoader, ImageLoader};
pub use layout::{LabelPlacement, draw_label, wrap_text};
pub use render::render_svg;
pub use surface::{Context2d, Host, RecordingContext, StaticHost, SvgContext};
