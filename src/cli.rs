use crate::config::load_config;
use crate::frame::compute_frame;
use crate::ir::{PathStyle, Scene};
use crate::parser::{inline_scene, parse_scene};
use crate::projection::Crs;
use crate::render::{render_svg, write_output_svg};
use crate::segment_dump::write_segment_dump;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "ocon",
    version,
    about = "Draw connectors between the outlines of map anchors"
)]
pub struct Args {
    /// Scene file (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Viewport height in pixels
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Map zoom level
    #[arg(short = 'z', long = "zoom")]
    pub zoom: Option<f64>,

    /// Coordinate reference system
    #[arg(long = "crs", value_enum)]
    pub crs: Option<CrsArg>,

    /// Inline geometry, e.g. "circle(51.5,-0.09,500)"; repeat for each anchor, origin first
    #[arg(short = 'g', long = "geometry")]
    pub geometries: Vec<String>,

    /// Stroke colour for the inline connector
    #[arg(long = "color")]
    pub color: Option<String>,

    /// Only draw the connector lines
    #[arg(long = "no-anchors")]
    pub no_anchors: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CrsArg {
    WebMercator,
    Planar,
}

impl From<CrsArg> for Crs {
    fn from(arg: CrsArg) -> Self {
        match arg {
            CrsArg::WebMercator => Crs::WebMercator,
            CrsArg::Planar => Crs::Planar,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.no_anchors {
        config.render.draw_anchors = false;
    }

    let mut scene = read_scene(&args)?;
    // Flags win over the scene's own view block.
    let view = scene.view.get_or_insert_with(Default::default);
    if let Some(zoom) = args.zoom {
        view.zoom = Some(zoom);
    }
    if let Some(crs) = args.crs {
        view.crs = Some(crs.into());
    }

    let frame = compute_frame(&scene, &config)?;
    info!(
        "{} connectors, {} segments",
        frame.connectors.len(),
        frame.connectors.iter().map(|c| c.segments.len()).sum::<usize>()
    );

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&frame, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Json => {
            write_segment_dump(&frame, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&frame, &config.theme, &config.render);
            write_png(&svg, &output, &config)?;
        }
    }

    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &crate::config::Config) -> Result<()> {
    crate::render::write_output_png(svg, output, config)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &crate::config::Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_scene(args: &Args) -> Result<Scene> {
    if !args.geometries.is_empty() {
        if args.input.is_some() {
            return Err(anyhow::anyhow!(
                "--geometry cannot be combined with --input"
            ));
        }
        let style = PathStyle {
            color: args.color.clone(),
            ..PathStyle::default()
        };
        return inline_scene(&args.geometries, style);
    }
    let input = read_input(args.input.as_deref())?;
    parse_scene(&input)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
