use thiserror::Error;

/// Failures that abort (or refuse) a render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The target container is missing or has unusable dimensions. Raised
    /// before anything is drawn.
    #[error("cannot mount onto container `{tag_id}`: {reason}")]
    Mount { tag_id: String, reason: String },

    /// The host attached a surface but could not hand out a 2D context.
    #[error("host does not provide a 2D drawing context")]
    UnsupportedSurface,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("render cancelled")]
    Cancelled,
}

impl RenderError {
    pub(crate) fn mount(tag_id: &str, reason: impl Into<String>) -> Self {
        Self::Mount {
            tag_id: tag_id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Image acquisition failures. These never abort a render: the circular
/// region is left blank and the error is handed to the caller's callback.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("failed to read image `{url}`: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image `{url}`: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed data URI: {0}")]
    DataUri(String),

    #[error("unsupported image source scheme in `{0}`")]
    UnsupportedScheme(String),
}
