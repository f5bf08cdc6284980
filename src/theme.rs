use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub line_color: String,
    pub line_width: f64,
    pub line_opacity: f64,
    pub line_dash_array: Option<String>,
    pub anchor_fill: String,
    pub anchor_fill_opacity: f64,
    pub anchor_stroke: String,
    pub anchor_stroke_width: f64,
    /// Radius of the dot drawn for point anchors.
    pub point_radius: f64,
    pub background: String,
}

impl Theme {
    /// Leaflet's default path look.
    pub fn leaflet() -> Self {
        Self {
            line_color: "#3388ff".to_string(),
            line_width: 3.0,
            line_opacity: 1.0,
            line_dash_array: None,
            anchor_fill: "#3388ff".to_string(),
            anchor_fill_opacity: 0.2,
            anchor_stroke: "#3388ff".to_string(),
            anchor_stroke_width: 3.0,
            point_radius: 3.0,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            line_color: "#7A8AA6".to_string(),
            line_width: 1.6,
            line_opacity: 1.0,
            line_dash_array: None,
            anchor_fill: "#F8FAFF".to_string(),
            anchor_fill_opacity: 1.0,
            anchor_stroke: "#C7D2E5".to_string(),
            anchor_stroke_width: 1.4,
            point_radius: 2.5,
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::leaflet()
    }
}
