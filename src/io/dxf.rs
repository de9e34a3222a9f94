//! DXF drawing input.
//!
//! Reads a drawing with the `dxf` crate and maps its modelspace entities to
//! the [`RawEntity`] boundary model. No validation happens here; raw
//! numeric fields pass through untouched for the builder to judge.

use std::path::Path;

use dxf::entities::EntityType;
use dxf::Drawing;
use geo_types::Coord;
use tracing::debug;

use crate::entities::{RawEntity, RawEntityKind, COLOR_BY_LAYER, DEFAULT_LAYER};
use crate::error::{ConvertError, Result};

/// Read all modelspace entities from a DXF file, in file order.
pub fn read_entities(path: impl AsRef<Path>) -> Result<Vec<RawEntity>> {
    let path = path.as_ref();
    let drawing =
        Drawing::load_file(path).map_err(|e| ConvertError::CadParse(e.to_string()))?;
    let entities: Vec<RawEntity> = drawing.entities().map(convert_entity).collect();
    debug!(path = %path.display(), count = entities.len(), "read DXF entities");
    Ok(entities)
}

/// Map one parsed DXF entity to the boundary model.
pub fn convert_entity(entity: &dxf::entities::Entity) -> RawEntity {
    let kind = match &entity.specific {
        EntityType::ModelPoint(point) => RawEntityKind::Point {
            x: point.location.x,
            y: point.location.y,
        },

        EntityType::Line(line) => RawEntityKind::Line {
            start: Coord {
                x: line.p1.x,
                y: line.p1.y,
            },
            end: Coord {
                x: line.p2.x,
                y: line.p2.y,
            },
        },

        EntityType::LwPolyline(lwpoly) => RawEntityKind::LightPolyline {
            vertices: lwpoly
                .vertices
                .iter()
                .map(|v| Coord { x: v.x, y: v.y })
                .collect(),
            closed: lwpoly.is_closed(),
        },

        EntityType::Polyline(poly) => RawEntityKind::Polyline {
            vertices: poly
                .vertices()
                .map(|v| Coord {
                    x: v.location.x,
                    y: v.location.y,
                })
                .collect(),
            closed: poly.is_closed(),
        },

        EntityType::Circle(circle) => RawEntityKind::Circle {
            center: Coord {
                x: circle.center.x,
                y: circle.center.y,
            },
            radius: circle.radius,
        },

        EntityType::Arc(arc) => RawEntityKind::Arc {
            center: Coord {
                x: arc.center.x,
                y: arc.center.y,
            },
            radius: arc.radius,
            start_angle: arc.start_angle,
            end_angle: arc.end_angle,
        },

        other => RawEntityKind::Unsupported(type_tag_of(other)),
    };

    let layer = if entity.common.layer.is_empty() {
        DEFAULT_LAYER.to_string()
    } else {
        entity.common.layer.clone()
    };
    let color = entity
        .common
        .color
        .index()
        .map(i32::from)
        .unwrap_or(COLOR_BY_LAYER);

    RawEntity { kind, layer, color }
}

/// DXF-style tag for an entity the pipeline does not handle, derived from
/// the variant name.
fn type_tag_of(specific: &EntityType) -> String {
    let repr = format!("{specific:?}");
    let name: &str = repr
        .split(|c: char| c == '(' || c == ' ' || c == '{')
        .next()
        .unwrap_or("UNKNOWN");
    name.to_ascii_uppercase()
}
