use crate::config::RenderConfig;
#[cfg(feature = "png")]
use crate::config::Config;
use crate::connector::Segment;
use crate::frame::{ConnectorFrame, Frame, ShapeFrame};
use crate::geometry::Shape;
use crate::ir::PathStyle;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(frame: &Frame, theme: &Theme, config: &RenderConfig) -> String {
    let mut svg = String::new();
    let width = frame.width.max(1.0);
    let height = frame.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&config.background)
    ));

    if config.draw_anchors {
        for shape in &frame.shapes {
            svg.push_str(&shape_svg(shape, theme));
        }
    }

    for connector in &frame.connectors {
        if let Some(path) = connector_svg(connector, theme) {
            svg.push_str(&path);
        }
    }

    svg.push_str("</svg>");
    svg
}

fn shape_svg(frame: &ShapeFrame, theme: &Theme) -> String {
    let id = escape_xml(&frame.id);
    match frame.shape {
        Shape::Point(p) => format!(
            "<circle data-id=\"{id}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
            p.x,
            p.y,
            theme.point_radius,
            escape_xml(&theme.anchor_stroke)
        ),
        Shape::Circle { center, radius } => format!(
            "<circle data-id=\"{id}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            center.x,
            center.y,
            radius,
            escape_xml(&theme.anchor_fill),
            theme.anchor_fill_opacity,
            escape_xml(&theme.anchor_stroke),
            theme.anchor_stroke_width
        ),
        Shape::Square { center, half_side } => format!(
            "<rect data-id=\"{id}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            center.x - half_side,
            center.y - half_side,
            half_side * 2.0,
            half_side * 2.0,
            escape_xml(&theme.anchor_fill),
            theme.anchor_fill_opacity,
            escape_xml(&theme.anchor_stroke),
            theme.anchor_stroke_width
        ),
    }
}

fn connector_svg(connector: &ConnectorFrame, theme: &Theme) -> Option<String> {
    if connector.segments.is_empty() {
        return None;
    }
    let d = segments_to_path(&connector.segments);
    let attrs = style_attributes(&connector.style, theme);
    Some(format!("<path d=\"{d}\" fill=\"none\"{attrs}/>"))
}

/// One `M .. L ..` subpath per segment.
fn segments_to_path(segments: &[Segment]) -> String {
    let mut d = String::new();
    for segment in segments {
        if !d.is_empty() {
            d.push(' ');
        }
        d.push_str(&format!(
            "M {:.2} {:.2} L {:.2} {:.2}",
            segment.start.x, segment.start.y, segment.end.x, segment.end.y
        ));
    }
    d
}

fn style_attributes(style: &PathStyle, theme: &Theme) -> String {
    let mut attrs = String::new();
    let color = style.color.as_deref().unwrap_or(&theme.line_color);
    let weight = style.weight.unwrap_or(theme.line_width);
    let opacity = style.opacity.unwrap_or(theme.line_opacity);
    attrs.push_str(&format!(
        " stroke=\"{}\" stroke-width=\"{weight}\" stroke-opacity=\"{opacity}\"",
        escape_xml(color)
    ));
    if let Some(dash) = style.dash_array.as_ref().or(theme.line_dash_array.as_ref()) {
        attrs.push_str(&format!(" stroke-dasharray=\"{}\"", escape_xml(dash)));
    }
    for (key, value) in &style.extra {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => continue,
            other => other.to_string(),
        };
        attrs.push_str(&format!(
            " {}=\"{}\"",
            svg_attribute_name(key),
            escape_xml(&value)
        ));
    }
    attrs
}

/// Maps a Leaflet path option name to its SVG attribute.
fn svg_attribute_name(key: &str) -> String {
    match key {
        "lineCap" => "stroke-linecap".to_string(),
        "lineJoin" => "stroke-linejoin".to_string(),
        "dashOffset" => "stroke-dashoffset".to_string(),
        "className" => "class".to_string(),
        other => {
            let mut name = String::with_capacity(other.len() + 4);
            for ch in other.chars() {
                if ch.is_ascii_uppercase() {
                    name.push('-');
                    name.push(ch.to_ascii_lowercase());
                } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                    name.push(ch);
                }
            }
            name
        }
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(size) = usvg::Size::from_wh(config.render.width as f32, config.render.height as f32)
    {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::frame::compute_frame;
    use crate::ir::{ConnectorSpec, Geometry, LatLng, Scene};
    use crate::projection::Crs;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        let a = scene.push_layer("a", Geometry::circle_marker(LatLng::new(50.0, 50.0), 10.0));
        let b = scene.push_layer("b", Geometry::square(LatLng::new(50.0, 150.0), 20.0));
        let mut style = PathStyle::default();
        style.color = Some("#ff0000".to_string());
        style
            .extra
            .insert("lineCap".to_string(), serde_json::json!("round"));
        scene.connectors.push(ConnectorSpec {
            anchors: vec![a, b],
            style,
        });
        scene
    }

    #[test]
    fn render_svg_basic() {
        let mut config = Config::default();
        config.view.crs = Crs::Planar;
        let frame = compute_frame(&scene(), &config).unwrap();
        let svg = render_svg(&frame, &config.theme, &config.render);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("M 60.00 50.00 L 130.00 50.00"));
        assert!(svg.contains("stroke=\"#ff0000\""));
        assert!(svg.contains("stroke-linecap=\"round\""));
        assert!(svg.contains("<rect data-id=\"b\" x=\"130.00\" y=\"30.00\""));
    }

    #[test]
    fn hidden_anchors_are_not_drawn() {
        let mut config = Config::default();
        config.view.crs = Crs::Planar;
        config.render.draw_anchors = false;
        let frame = compute_frame(&scene(), &config).unwrap();
        let svg = render_svg(&frame, &config.theme, &config.render);
        assert!(!svg.contains("data-id"));
        assert!(svg.contains("<path"));
    }

    #[test]
    fn attribute_names_follow_svg() {
        assert_eq!(svg_attribute_name("lineJoin"), "stroke-linejoin");
        assert_eq!(svg_attribute_name("fillRule"), "fill-rule");
        assert_eq!(svg_attribute_name("bad\"key"), "badkey");
    }

    #[test]
    fn multiple_segments_become_subpaths() {
        use crate::geometry::Point;
        let d = segments_to_path(&[
            Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
            Segment::new(Point::new(2.0, 2.0), Point::new(3.0, 3.0)),
        ]);
        assert_eq!(d, "M 0.00 0.00 L 1.00 1.00 M 2.00 2.00 L 3.00 3.00");
    }
}
