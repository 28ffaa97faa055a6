use crate::surface::StaticHost;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TAG_ID: &str = "img-box";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ContainerSize {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    pub url: String,
}

/// What to draw: the hero image and its labels, plus the container they are
/// mounted into. Fixed once a render starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub mounted_tag_id: String,
    pub container: ContainerSize,
    pub img: ImageSource,
    /// Label texts, in clockwise order starting one step past the top.
    pub description: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mounted_tag_id: DEFAULT_TAG_ID.to_string(),
            container: ContainerSize::default(),
            img: ImageSource::default(),
            description: Vec::new(),
        }
    }
}

impl LayoutConfig {
    /// An in-memory host holding exactly the configured container.
    pub fn host(&self) -> StaticHost {
        StaticHost::new().with_container(
            &self.mounted_tag_id,
            self.container.width,
            self.container.height,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Fill behind the drawing; `None` keeps the surface transparent.
    pub background: Option<String>,
    /// Font family handed to the rasterizer for PNG output.
    pub png_font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Some("#FFFFFF".to_string()),
            png_font_family: "sans-serif".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(flatten)]
    layout: LayoutConfig,
    background: Option<String>,
    transparent: Option<bool>,
}

/// Loads a config file. JSON is tried first, then JSON5 (comments, trailing
/// commas, unquoted keys).
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses config text that is already in memory.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed = parse_config_file(contents)?;
    let mut config = Config {
        layout: parsed.layout,
        ..Config::default()
    };
    if let Some(background) = parsed.background {
        config.render.background = Some(background);
    }
    if parsed.transparent == Some(true) {
        config.render.background = None;
    }
    Ok(config)
}

fn parse_config_file(contents: &str) -> anyhow::Result<ConfigFile> {
    match serde_json::from_str(contents) {
        Ok(parsed) => Ok(parsed),
        Err(json_err) => json5::from_str(contents).map_err(|json5_err| {
            anyhow::anyhow!("invalid config: {json_err} (as JSON5: {json5_err})")
        }),
    }
}
