use crate::ir::{ConnectorSpec, Geometry, LatLng, PathStyle, Scene};
use anyhow::{Result, anyhow, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static INLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<kind>point|circle|marker|square|shape)\s*\(\s*(?P<args>[^()]*)\)\s*$")
        .unwrap()
});

/// Parses a scene document. Plain JSON is tried first, then JSON5.
pub fn parse_scene(input: &str) -> Result<Scene> {
    let scene = match serde_json::from_str::<Scene>(input) {
        Ok(scene) => scene,
        Err(json_err) => match json5::from_str::<serde_json::Value>(input) {
            Ok(value) => serde_json::from_value::<Scene>(value)?,
            Err(_) => return Err(anyhow!("invalid scene: {json_err}")),
        },
    };
    validate_scene(&scene)?;
    Ok(scene)
}

fn validate_scene(scene: &Scene) -> Result<()> {
    let mut ids = HashSet::new();
    for layer in &scene.layers {
        if !ids.insert(layer.id.as_str()) {
            bail!("duplicate layer id {:?}", layer.id);
        }
    }
    for (idx, connector) in scene.connectors.iter().enumerate() {
        for anchor in &connector.anchors {
            if !ids.contains(anchor.as_str()) {
                bail!("connector {idx} refers to unknown layer {anchor:?}");
            }
        }
    }
    Ok(())
}

/// Parses the compact command-line geometry syntax:
/// `point(lat,lng)`, `circle(lat,lng,metres)`, `marker(lat,lng,px)`,
/// `square(lat,lng,px)` and `shape(lat,lng,px,name)`.
pub fn parse_inline_geometry(text: &str) -> Result<Geometry> {
    let caps = INLINE_RE
        .captures(text)
        .ok_or_else(|| anyhow!("unrecognised geometry {text:?}"))?;
    let kind = &caps["kind"];
    let args: Vec<&str> = caps["args"].split(',').map(str::trim).collect();

    let number = |idx: usize| -> Result<f64> {
        let raw = args
            .get(idx)
            .ok_or_else(|| anyhow!("{kind}: missing argument {}", idx + 1))?;
        raw.parse::<f64>()
            .map_err(|_| anyhow!("{kind}: {raw:?} is not a number"))
    };
    let expect_args = |count: usize| -> Result<()> {
        if args.len() != count {
            bail!("{kind} takes {count} arguments, got {}", args.len());
        }
        Ok(())
    };

    let center = LatLng::new(number(0)?, number(1)?);
    let geometry = match kind {
        "point" => {
            expect_args(2)?;
            Geometry::point(center.lat, center.lng)
        }
        "circle" => {
            expect_args(3)?;
            Geometry::circle(center, number(2)?)
        }
        "marker" => {
            expect_args(3)?;
            Geometry::circle_marker(center, number(2)?)
        }
        "square" => {
            expect_args(3)?;
            Geometry::square(center, number(2)?)
        }
        _ => {
            expect_args(4)?;
            Geometry::ShapeMarker {
                center,
                radius: number(2)?,
                shape: args[3].to_string(),
            }
        }
    };
    Ok(geometry)
}

/// Scene with a single connector over `specs`, the first being the origin.
pub fn inline_scene(specs: &[String], style: PathStyle) -> Result<Scene> {
    let mut scene = Scene::new();
    let mut anchors = Vec::with_capacity(specs.len());
    for (idx, spec) in specs.iter().enumerate() {
        let geometry = parse_inline_geometry(spec)?;
        anchors.push(scene.push_layer(format!("g{idx}"), geometry));
    }
    scene.connectors.push(ConnectorSpec { anchors, style });
    Ok(scene)
}
