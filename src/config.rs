use crate::ir::{LatLng, ViewOverride};
use crate::projection::{Crs, DEFAULT_TILE_SIZE, MapProjector, Planar, WebMercator};
use crate::theme::Theme;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_ZOOM: f64 = 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub crs: Crs,
    pub center: LatLng,
    pub zoom: f64,
    pub tile_size: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            crs: Crs::WebMercator,
            center: LatLng::new(0.0, 0.0),
            zoom: 13.0,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl ViewConfig {
    /// Projector for a viewport of `width` x `height` pixels.
    pub fn projector(&self, width: f64, height: f64) -> MapProjector {
        match self.crs {
            Crs::Planar => MapProjector::Planar(Planar),
            Crs::WebMercator => MapProjector::WebMercator(WebMercator::new(
                self.center,
                self.zoom,
                self.tile_size,
                (width, height),
            )),
        }
    }

    /// Clamps zoom and tile size into usable ranges.
    pub fn sanitized(mut self) -> Self {
        if !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            let zoom = if self.zoom.is_nan() {
                ViewConfig::default().zoom
            } else {
                self.zoom.clamp(0.0, MAX_ZOOM)
            };
            warn!("zoom {} out of range, using {}", self.zoom, zoom);
            self.zoom = zoom;
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            warn!(
                "tile size {} is not positive, using {}",
                self.tile_size, DEFAULT_TILE_SIZE
            );
            self.tile_size = DEFAULT_TILE_SIZE;
        }
        self
    }

    pub fn apply_override(&mut self, view: &ViewOverride) {
        if let Some(crs) = view.crs {
            self.crs = crs;
        }
        if let Some(center) = view.center {
            self.center = center;
        }
        if let Some(zoom) = view.zoom {
            self.zoom = zoom;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub background: String,
    /// Draw the anchor shapes underneath the connector lines.
    pub draw_anchors: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#FFFFFF".to_string(),
            draw_anchors: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub view: ViewConfig,
    pub render: RenderConfig,
    pub theme: Theme,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    view: Option<ViewFile>,
    render: Option<RenderFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    line_color: Option<String>,
    line_width: Option<f64>,
    line_opacity: Option<f64>,
    line_dash_array: Option<String>,
    anchor_fill: Option<String>,
    anchor_fill_opacity: Option<f64>,
    anchor_stroke: Option<String>,
    anchor_stroke_width: Option<f64>,
    point_radius: Option<f64>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewFile {
    crs: Option<Crs>,
    center: Option<LatLng>,
    zoom: Option<f64>,
    tile_size: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderFile {
    width: Option<f64>,
    height: Option<f64>,
    draw_anchors: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "leaflet" | "default" => config.theme = Theme::leaflet(),
            other => warn!("unknown theme {other:?}, keeping the default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.line_opacity {
            config.theme.line_opacity = v;
        }
        if vars.line_dash_array.is_some() {
            config.theme.line_dash_array = vars.line_dash_array;
        }
        if let Some(v) = vars.anchor_fill {
            config.theme.anchor_fill = v;
        }
        if let Some(v) = vars.anchor_fill_opacity {
            config.theme.anchor_fill_opacity = v;
        }
        if let Some(v) = vars.anchor_stroke {
            config.theme.anchor_stroke = v;
        }
        if let Some(v) = vars.anchor_stroke_width {
            config.theme.anchor_stroke_width = v;
        }
        if let Some(v) = vars.point_radius {
            config.theme.point_radius = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(view) = parsed.view {
        if let Some(v) = view.crs {
            config.view.crs = v;
        }
        if let Some(v) = view.center {
            config.view.center = v;
        }
        if let Some(v) = view.zoom {
            config.view.zoom = v;
        }
        if let Some(v) = view.tile_size {
            config.view.tile_size = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.draw_anchors {
            config.render.draw_anchors = v;
        }
    }

    config.view = config.view.sanitized();
    config.render.background = config.theme.background.clone();

    Ok(config)
}
