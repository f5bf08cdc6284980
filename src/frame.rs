use anyhow::{Context, Result};
use log::debug;

use crate::config::Config;
use crate::connector::{Anchor, Connector, Segment};
use crate::geometry::{AnchorKind, Shape};
use crate::ir::{PathStyle, Scene};

/// Everything needed to draw one scene at one view.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<ShapeFrame>,
    pub connectors: Vec<ConnectorFrame>,
}

#[derive(Debug, Clone)]
pub struct ShapeFrame {
    pub id: String,
    pub kind: AnchorKind,
    pub shape: Shape,
}

#[derive(Debug, Clone)]
pub struct ConnectorFrame {
    pub anchors: Vec<String>,
    pub segments: Vec<Segment>,
    /// Ids of target anchors that got no segment.
    pub omitted: Vec<String>,
    pub style: PathStyle,
}

/// Projects the scene and updates every connector in it.
pub fn compute_frame(scene: &Scene, config: &Config) -> Result<Frame> {
    let mut view = config.view.clone();
    if let Some(overrides) = &scene.view {
        view.apply_override(overrides);
    }
    let view = view.sanitized();
    let width = config.render.width;
    let height = config.render.height;
    let projector = view.projector(width, height);

    let mut shapes = Vec::with_capacity(scene.layers.len());
    for layer in &scene.layers {
        let Ok(mut anchor) = Anchor::new(layer.geometry(), false) else {
            debug!("layer {:?} has no drawable outline", layer.id);
            continue;
        };
        let shape = anchor
            .project(&projector)
            .with_context(|| format!("layer {:?}", layer.id))?;
        shapes.push(ShapeFrame {
            id: layer.id.clone(),
            kind: anchor.kind(),
            shape,
        });
    }

    let mut connectors = Vec::with_capacity(scene.connectors.len());
    for (idx, spec) in scene.connectors.iter().enumerate() {
        let geometries = spec
            .anchors
            .iter()
            .map(|id| {
                scene
                    .layer(id)
                    .map(|layer| layer.geometry())
                    .with_context(|| format!("connector {idx}: unknown layer {id:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        let mut connector = Connector::new(geometries, spec.style.clone())
            .with_context(|| format!("connector {idx}"))?;
        connector
            .update(&projector)
            .with_context(|| format!("connector {idx}"))?;

        connectors.push(ConnectorFrame {
            anchors: spec.anchors.clone(),
            segments: connector.segments().to_vec(),
            omitted: connector
                .omitted()
                .iter()
                .map(|&i| spec.anchors[i].clone())
                .collect(),
            style: connector.style().clone(),
        });
    }

    Ok(Frame {
        width,
        height,
        shapes,
        connectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::ir::{ConnectorSpec, Geometry, LatLng};
    use crate::projection::Crs;

    fn planar_config() -> Config {
        let mut config = Config::default();
        config.view.crs = Crs::Planar;
        config
    }

    #[test]
    fn computes_segments_for_each_connector() {
        let mut scene = Scene::new();
        let a = scene.push_layer("a", Geometry::circle(LatLng::new(0.0, 0.0), 10.0));
        let b = scene.push_layer("b", Geometry::circle(LatLng::new(0.0, 100.0), 5.0));
        scene.connectors.push(ConnectorSpec {
            anchors: vec![a, b],
            style: PathStyle::default(),
        });
        let frame = compute_frame(&scene, &planar_config()).unwrap();
        assert_eq!(frame.shapes.len(), 2);
        let segment = frame.connectors[0].segments[0];
        assert!(segment.start.distance_to(Point::new(10.0, 0.0)) < 1e-9);
        assert!(segment.end.distance_to(Point::new(95.0, 0.0)) < 1e-9);
    }

    #[test]
    fn unsupported_anchor_is_an_error() {
        let mut scene = Scene::new();
        let a = scene.push_layer("a", Geometry::point(0.0, 0.0));
        let b = scene.push_layer(
            "b",
            Geometry::Polygon(vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]),
        );
        scene.connectors.push(ConnectorSpec {
            anchors: vec![a, b],
            style: PathStyle::default(),
        });
        let err = compute_frame(&scene, &planar_config()).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported geometry"));
    }

    #[test]
    fn omitted_targets_are_reported_by_id() {
        let mut scene = Scene::new();
        let a = scene.push_layer("a", Geometry::square(LatLng::new(0.0, 0.0), 50.0));
        let b = scene.push_layer("b", Geometry::point(5.0, 5.0));
        scene.connectors.push(ConnectorSpec {
            anchors: vec![a, b],
            style: PathStyle::default(),
        });
        let frame = compute_frame(&scene, &planar_config()).unwrap();
        assert!(frame.connectors[0].segments.is_empty());
        assert_eq!(frame.connectors[0].omitted, vec!["b"]);
    }
}
