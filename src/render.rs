use crate::compositor::{Compositor, RenderOutcome};
use crate::config::{Config, RenderConfig};
use crate::hero::ImageLoader;
use crate::surface::SvgContext;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Renders `config` into a standalone SVG document.
pub fn render_svg<L: ImageLoader + ?Sized>(
    config: &Config,
    loader: &L,
) -> Result<RenderOutcome<SvgContext>> {
    let mut host = config.layout.host();
    if let Some(background) = &config.render.background {
        host = host.with_background(background.clone());
    }
    let outcome = Compositor::new().render(&mut host, loader, &config.layout)?;
    Ok(outcome)
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            info!(path = %path.display(), "wrote svg");
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options {
        font_family: render_cfg.png_font_family.clone(),
        ..usvg::Options::default()
    };
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    info!(path = %output.display(), width = size.width(), height = size.height(), "wrote png");
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::error::ImageLoadError;
    use crate::hero::DecodedImage;

    fn blank_loader(url: &str) -> std::result::Result<DecodedImage, ImageLoadError> {
        Err(ImageLoadError::UnsupportedScheme(url.to_string()))
    }

    #[test]
    fn render_svg_basic() {
        let config = Config {
            layout: LayoutConfig {
                description: vec!["Alpha".to_string(), "Beta & Gamma".to_string()],
                ..LayoutConfig::default()
            },
            ..Config::default()
        };
        let outcome = render_svg(&config, &blank_loader).expect("render");
        let svg = outcome.context.to_svg();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("fill=\"#FFFFFF\""));
        assert!(svg.contains("Beta"));
        assert!(svg.contains("&amp;"));
        assert_eq!(outcome.labels.len(), 2);
    }

    #[test]
    fn writes_svg_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.svg");
        write_output_svg("<svg></svg>", Some(&path)).expect("write");
        assert_eq!(std::fs::read_to_string(path).expect("read"), "<svg></svg>");
    }
}
