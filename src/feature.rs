//! Feature record: one converted entity with its source attributes.

use crate::entities::COLOR_BY_LAYER;
use crate::geometry::Geometry;

/// One surviving entity: a geometry plus the attributes carried into the
/// output feature collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// The converted geometry, in whatever CRS the pipeline last produced.
    pub geometry: Geometry,
    /// Source layer name.
    pub layer: String,
    /// Source entity type tag (e.g. `"LWPOLYLINE"`).
    pub entity_type: String,
    /// ACI color; 256 = by layer.
    pub color: i32,
}

impl Feature {
    /// Create a feature with the by-layer color.
    pub fn new(geometry: Geometry, layer: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Feature {
            geometry,
            layer: layer.into(),
            entity_type: entity_type.into(),
            color: COLOR_BY_LAYER,
        }
    }

    /// Set the ACI color.
    pub fn with_color(mut self, color: i32) -> Self {
        self.color = color;
        self
    }

    /// Replace the geometry, keeping the attributes.
    pub fn with_geometry(&self, geometry: Geometry) -> Self {
        Feature {
            geometry,
            layer: self.layer.clone(),
            entity_type: self.entity_type.clone(),
            color: self.color,
        }
    }
}
