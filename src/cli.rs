use crate::config::{Config, load_config};
use crate::hero::FsImageLoader;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "rlr",
    version,
    about = "Render a circular hero image with radially placed labels"
)]
pub struct Args {
    /// Layout config (JSON or JSON5): mountedTagId, container, img.url, description
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Hero image path, file:// URL or data: URI (overrides the config)
    #[arg(short = 'u', long = "imageUrl")]
    pub image_url: Option<String>,

    /// Label text; repeat for several labels (replaces the config's list)
    #[arg(short = 'l', long = "label")]
    pub labels: Vec<String>,

    /// Container width in pixels
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Container height in pixels
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Write the computed label placements as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log per-label placement details
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    let loader = match args.config.as_deref().and_then(Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => FsImageLoader::new().with_base_dir(dir),
        _ => FsImageLoader::new(),
    };

    let outcome = render_svg(&config, &loader)?;
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &outcome)?;
    }

    let svg = outcome.context.to_svg();
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(url) = &args.image_url {
        config.layout.img.url = url.clone();
    }
    if !args.labels.is_empty() {
        config.layout.description = args.labels.clone();
    }
    if let Some(width) = args.width {
        config.layout.container.width = width;
    }
    if let Some(height) = args.height {
        config.layout.container.height = height;
    }
    config
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "rlr", "-l", "one", "-l", "two", "-u", "hero.png", "-w", "250", "-H", "300",
        ]);
        let config = apply_overrides(Config::default(), &args);
        assert_eq!(config.layout.description, vec!["one", "two"]);
        assert_eq!(config.layout.img.url, "hero.png");
        assert_eq!(config.layout.container.width, 250.0);
        assert_eq!(config.layout.container.height, 300.0);
    }

    #[test]
    fn missing_flags_keep_config_values() {
        let args = Args::parse_from(["rlr"]);
        let mut base = Config::default();
        base.layout.description = vec!["kept".to_string()];
        let config = apply_overrides(base, &args);
        assert_eq!(config.layout.description, vec!["kept"]);
        assert_eq!(config.layout.container.width, 500.0);
    }

    #[test]
    fn png_needs_an_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("out.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").expect("path"), path);
    }
}
