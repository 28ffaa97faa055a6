use radial_label_renderer::{
    Compositor, Config, FsImageLoader, ImageLoadError, ImageLoader, ImageStatus, StaticHost,
    parse_config, render_svg,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadialRenderOptions {
    background: Option<String>,
    transparent: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RadialRenderResult {
    svg: String,
    image_drawn: bool,
    image_error: Option<String>,
}

fn apply_options(config: &mut Config, options: RadialRenderOptions) {
    if let Some(background) = options.background {
        config.render.background = Some(background);
    }
    if options.transparent == Some(true) {
        config.render.background = None;
    }
}

fn render_config(config: &Config) -> Result<RadialRenderResult, String> {
    // No filesystem in the browser: only `data:` URIs load.
    let loader = |url: &str| {
        if url.starts_with("data:") {
            FsImageLoader::new().load(url)
        } else {
            Err(ImageLoadError::UnsupportedScheme(url.to_string()))
        }
    };
    let mut image_error = None;
    let outcome = Compositor::new()
        .on_image_error(|err| image_error = Some(err.to_string()))
        .render(&mut host_for(config), &loader, &config.layout)
        .map_err(|error| error.to_string())?;
    Ok(RadialRenderResult {
        svg: outcome.context.to_svg(),
        image_drawn: matches!(outcome.image, ImageStatus::Drawn { .. }),
        image_error,
    })
}

fn host_for(config: &Config) -> StaticHost {
    let host = config.layout.host();
    match &config.render.background {
        Some(background) => host.with_background(background.clone()),
        None => host,
    }
}

/// Renders a layout config (JSON or JSON5) to SVG. Returns a JSON object
/// `{ svg, imageDrawn, imageError }`.
#[wasm_bindgen]
pub fn render_radial_svg(config_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let mut config =
        parse_config(config_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<RadialRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        RadialRenderOptions::default()
    };
    apply_options(&mut config, options);

    let result = render_config(&config).map_err(|error| JsValue::from_str(&error))?;
    serde_json::to_string(&result).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// SVG only, without the status envelope.
#[wasm_bindgen]
pub fn render_radial_svg_document(config_json: &str) -> Result<String, JsValue> {
    let config = parse_config(config_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    render_svg(&config, &FsImageLoader::new())
        .map(|outcome| outcome.context.to_svg())
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
