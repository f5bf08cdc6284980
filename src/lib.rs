#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod connector;
pub mod frame;
pub mod geometry;
pub mod ir;
pub mod parser;
pub mod projection;
pub mod render;
pub mod segment_dump;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, ViewConfig, load_config};
pub use connector::{Anchor, Connector, ConnectorError, Segment};
pub use frame::{Frame, compute_frame};
pub use geometry::{AnchorKind, Point, classify};
pub use ir::{Geometry, LatLng, PathStyle, Scene};
pub use parser::parse_scene;
pub use projection::{Crs, Planar, Projector, WebMercator};
pub use render::render_svg;
pub use theme::Theme;

/// Parses a scene document and computes its connector segments.
pub fn compute_segments(input: &str, config: &Config) -> anyhow::Result<Frame> {
    let scene = parse_scene(input)?;
    compute_frame(&scene, config)
}

/// Parses a scene document and renders it to SVG.
pub fn render_scene(input: &str, config: &Config) -> anyhow::Result<String> {
    let frame = compute_segments(input, config)?;
    Ok(render_svg(&frame, &config.theme, &config.render))
}
