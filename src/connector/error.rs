use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectorError {
    #[error("not enough points: a connector needs at least 2 geometries, got {count}")]
    InsufficientPoints { count: usize },
    #[error("unsupported geometry type: {kind}")]
    UnsupportedGeometry { kind: String },
    /// Radius that is negative or not finite once resolved to pixels.
    #[error("invalid radius for {kind}: {radius}")]
    InvalidRadius { kind: String, radius: f64 },
}
