use outline_connector::segment_dump::SegmentDump;
use outline_connector::{Config, Theme, compute_segments, render_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectorRenderOptions {
    theme: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    line_color: Option<String>,
    draw_anchors: Option<bool>,
}

fn build_config(options: ConnectorRenderOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("modern") {
        config.theme = Theme::modern();
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(color) = options.line_color {
        config.theme.line_color = color;
    }
    if let Some(draw) = options.draw_anchors {
        config.render.draw_anchors = draw;
    }
    config.render.background = config.theme.background.clone();
    config
}

fn parse_options(options_json: Option<String>) -> Result<Config, JsValue> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<ConnectorRenderOptions>(&raw)
            .map_err(|error| JsValue::from_str(&error.to_string()))?,
        None => ConnectorRenderOptions::default(),
    };
    Ok(build_config(options))
}

fn segments_json(scene: &str, config: &Config) -> Result<String, String> {
    let frame = compute_segments(scene, config).map_err(|error| format!("{error:#}"))?;
    serde_json::to_string(&SegmentDump::from_frame(&frame)).map_err(|error| error.to_string())
}

/// Computes connector segments for a scene and returns them as JSON.
#[wasm_bindgen]
pub fn compute_segments_json(scene: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json)?;
    segments_json(scene, &config).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_scene_svg(scene: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json)?;
    let frame =
        compute_segments(scene, &config).map_err(|error| JsValue::from_str(&format!("{error:#}")))?;
    Ok(render_svg(&frame, &config.theme, &config.render))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "view": {"crs": "planar"},
        "layers": [
            {"id": "a", "type": "circleMarker", "center": [0, 0], "radius": 10},
            {"id": "b", "type": "circleMarker", "center": [0, 100], "radius": 10}
        ],
        "connectors": [{"anchors": ["a", "b"]}]
    }"#;

    #[test]
    fn segments_come_back_as_json() {
        let json = segments_json(SCENE, &build_config(ConnectorRenderOptions::default())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["connectors"][0]["segments"],
            serde_json::json!([[[10.0, 0.0], [90.0, 0.0]]])
        );
    }

    #[test]
    fn options_override_the_theme() {
        let config = build_config(ConnectorRenderOptions {
            theme: Some("modern".to_string()),
            line_color: Some("#123456".to_string()),
            ..Default::default()
        });
        assert_eq!(config.theme.line_color, "#123456");
        assert_eq!(config.theme.anchor_stroke, Theme::modern().anchor_stroke);
    }
}
