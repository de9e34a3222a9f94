//! Raw CAD entity model: the input contract from the CAD parser.
//!
//! A [`RawEntity`] is the boundary representation of one drawing primitive:
//! a type tag, a layer name (`"0"` when the drawing did not assign one), an
//! ACI color (256 = "by layer") and the type-specific numeric fields. The
//! coordinates arrive exactly as the parser read them and may be non-finite;
//! validation happens in [`builder`](crate::builder), not here.

use geo_types::Coord;

/// ACI color value meaning "inherit the layer color".
pub const COLOR_BY_LAYER: i32 = 256;

/// Default layer name when an entity carries none.
pub const DEFAULT_LAYER: &str = "0";

/// Type-specific payload of a raw CAD entity.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntityKind {
    /// A single point.
    Point { x: f64, y: f64 },
    /// A straight segment between two endpoints.
    Line { start: Coord, end: Coord },
    /// A heavy (vertex-entity) polyline.
    Polyline { vertices: Vec<Coord>, closed: bool },
    /// A lightweight polyline.
    LightPolyline { vertices: Vec<Coord>, closed: bool },
    /// A full circle.
    Circle { center: Coord, radius: f64 },
    /// A circular arc; angles are in degrees, as stored in the drawing.
    Arc {
        center: Coord,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    /// Anything else the parser yielded; ignored by the pipeline.
    Unsupported(String),
}

impl RawEntityKind {
    /// The drawing-format type tag for this entity kind.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Point { .. } => "POINT",
            Self::Line { .. } => "LINE",
            Self::Polyline { .. } => "POLYLINE",
            Self::LightPolyline { .. } => "LWPOLYLINE",
            Self::Circle { .. } => "CIRCLE",
            Self::Arc { .. } => "ARC",
            Self::Unsupported(tag) => tag,
        }
    }

    /// Whether the pipeline knows how to build a geometry from this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

/// One CAD primitive as read from the source drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntity {
    /// Type-specific numeric fields.
    pub kind: RawEntityKind,
    /// Layer the entity lives on.
    pub layer: String,
    /// ACI color; 256 = by layer.
    pub color: i32,
}

impl RawEntity {
    /// Create an entity on the default layer with the by-layer color.
    pub fn new(kind: RawEntityKind) -> Self {
        RawEntity {
            kind,
            layer: DEFAULT_LAYER.to_string(),
            color: COLOR_BY_LAYER,
        }
    }

    /// Set the layer name.
    pub fn on_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    /// Set the ACI color.
    pub fn with_color(mut self, color: i32) -> Self {
        self.color = color;
        self
    }

    /// Convenience constructor for a point entity.
    pub fn point(x: f64, y: f64) -> Self {
        RawEntity::new(RawEntityKind::Point { x, y })
    }

    /// Convenience constructor for a line entity.
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        RawEntity::new(RawEntityKind::Line {
            start: Coord { x: x1, y: y1 },
            end: Coord { x: x2, y: y2 },
        })
    }

    /// Convenience constructor for a lightweight polyline from (x, y) pairs.
    pub fn light_polyline(points: impl IntoIterator<Item = (f64, f64)>, closed: bool) -> Self {
        RawEntity::new(RawEntityKind::LightPolyline {
            vertices: points.into_iter().map(|(x, y)| Coord { x, y }).collect(),
            closed,
        })
    }

    /// Convenience constructor for a heavy polyline from (x, y) pairs.
    pub fn polyline(points: impl IntoIterator<Item = (f64, f64)>, closed: bool) -> Self {
        RawEntity::new(RawEntityKind::Polyline {
            vertices: points.into_iter().map(|(x, y)| Coord { x, y }).collect(),
            closed,
        })
    }

    /// Convenience constructor for a circle entity.
    pub fn circle(cx: f64, cy: f64, radius: f64) -> Self {
        RawEntity::new(RawEntityKind::Circle {
            center: Coord { x: cx, y: cy },
            radius,
        })
    }

    /// Convenience constructor for an arc entity (angles in degrees).
    pub fn arc(cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        RawEntity::new(RawEntityKind::Arc {
            center: Coord { x: cx, y: cy },
            radius,
            start_angle,
            end_angle,
        })
    }

    /// The drawing-format type tag for this entity.
    pub fn type_tag(&self) -> &str {
        self.kind.type_tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let e = RawEntity::point(1.0, 2.0);
        assert_eq!(e.layer, "0");
        assert_eq!(e.color, COLOR_BY_LAYER);
        assert_eq!(e.type_tag(), "POINT");
    }

    #[test]
    fn test_builder_style_setters() {
        let e = RawEntity::circle(0.0, 0.0, 5.0).on_layer("SITE").with_color(1);
        assert_eq!(e.layer, "SITE");
        assert_eq!(e.color, 1);
        assert_eq!(e.type_tag(), "CIRCLE");
    }

    #[test]
    fn test_unsupported_tag_passthrough() {
        let e = RawEntity::new(RawEntityKind::Unsupported("HATCH".to_string()));
        assert_eq!(e.type_tag(), "HATCH");
        assert!(!e.kind.is_supported());
    }
}
