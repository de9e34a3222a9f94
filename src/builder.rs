//! Entity-to-geometry construction.
//!
//! Maps one [`RawEntity`] to at most one [`Geometry`], validating numeric
//! fields and degrading malformed shapes instead of aborting the whole
//! conversion. The Polygon path is an explicit ordered chain of attempts
//! (construct, repair, fall back to LineString, drop), each step returning a
//! tagged outcome so the decision tree stays auditable.

use geo_types::{Coord, LineString, Point, Polygon};
use tracing::debug;

use crate::entities::{RawEntity, RawEntityKind};
use crate::geometry::{repair_polygon, Geometry};

/// Number of segments used to tessellate a full circle. The 32-gon is a
/// fixed fidelity/cost tradeoff, not a tunable.
pub const CIRCLE_SEGMENTS: usize = 32;

/// Number of uniform angular steps used to approximate an arc.
pub const ARC_SEGMENTS: usize = 16;

/// Result of building one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// Geometry built as the natural mapping for the entity type.
    Built(Geometry),
    /// Geometry built, but only after a repair or a fall back to a simpler
    /// shape. The message says which.
    Downgraded(Geometry, String),
    /// Entity dropped; the reason is surfaced for diagnostics.
    Skipped(String),
    /// Entity type outside the supported set; ignored, not counted as failed.
    Unsupported,
}

/// Builds geometries from raw CAD entities.
pub struct EntityGeometryBuilder;

impl EntityGeometryBuilder {
    /// Map one entity to a geometry, applying the per-type contract.
    pub fn build(entity: &RawEntity) -> BuildOutcome {
        match &entity.kind {
            RawEntityKind::Point { x, y } => Self::build_point(*x, *y),
            RawEntityKind::Line { start, end } => Self::build_line(*start, *end),
            RawEntityKind::Polyline { vertices, closed }
            | RawEntityKind::LightPolyline { vertices, closed } => {
                Self::build_polyline(entity.type_tag(), vertices, *closed)
            }
            RawEntityKind::Circle { center, radius } => Self::build_circle(*center, *radius),
            RawEntityKind::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => Self::build_arc(*center, *radius, *start_angle, *end_angle),
            RawEntityKind::Unsupported(_) => BuildOutcome::Unsupported,
        }
    }

    fn build_point(x: f64, y: f64) -> BuildOutcome {
        if !(x.is_finite() && y.is_finite()) {
            return BuildOutcome::Skipped(format!("non-finite point coordinates ({x}, {y})"));
        }
        BuildOutcome::Built(Geometry::Point(Point::new(x, y)))
    }

    fn build_line(start: Coord, end: Coord) -> BuildOutcome {
        if !(is_finite(start) && is_finite(end)) {
            return BuildOutcome::Skipped(format!(
                "non-finite line coordinates ({}, {}) -> ({}, {})",
                start.x, start.y, end.x, end.y
            ));
        }
        if start == end {
            return BuildOutcome::Skipped("zero-length line".to_string());
        }
        BuildOutcome::Built(Geometry::LineString(LineString::new(vec![start, end])))
    }

    fn build_polyline(type_tag: &str, vertices: &[Coord], closed: bool) -> BuildOutcome {
        // One bad vertex does not invalidate the whole entity.
        let mut valid: Vec<Coord> = Vec::with_capacity(vertices.len());
        for v in vertices {
            if is_finite(*v) {
                valid.push(*v);
            } else {
                debug!(entity = type_tag, x = v.x, y = v.y, "discarding non-finite vertex");
            }
        }

        if valid.len() < 2 {
            return BuildOutcome::Skipped(format!(
                "fewer than 2 valid vertices ({} of {})",
                valid.len(),
                vertices.len()
            ));
        }

        if closed && valid.len() >= 3 {
            return Self::build_ring(valid);
        }

        match line_string_from(valid) {
            Some(ls) => BuildOutcome::Built(Geometry::LineString(ls)),
            None => BuildOutcome::Skipped("all polyline vertices coincident".to_string()),
        }
    }

    /// Ordered construction chain for a closed polyline:
    /// Polygon -> repair -> LineString -> drop.
    fn build_ring(mut points: Vec<Coord>) -> BuildOutcome {
        // Close the ring, then drop consecutive duplicates.
        if points.first() != points.last() {
            points.push(points[0]);
        }
        points.dedup();
        if points.first() != points.last() {
            // dedup removed the closing coordinate's duplicate only if the
            // ring collapsed; re-close.
            points.push(points[0]);
        }

        // A degenerate "closed" shape is not a valid area.
        if !has_distinct_points(&points[..points.len() - 1], 3) {
            return Self::line_string_fallback(points, "fewer than 3 distinct ring points");
        }

        let polygon = Polygon::new(LineString::new(points.clone()), vec![]);
        let candidate = Geometry::Polygon(polygon.clone());
        if !candidate.is_empty() && candidate.is_valid() {
            return BuildOutcome::Built(candidate);
        }

        debug!("invalid polygon ring, attempting repair");
        if let Some(repaired) = repair_polygon(&polygon) {
            let repaired = Geometry::Polygon(repaired);
            if !repaired.is_empty() && repaired.is_valid() {
                return BuildOutcome::Downgraded(repaired, "polygon repaired after self-intersection".to_string());
            }
        }

        Self::line_string_fallback(points, "polygon invalid after repair")
    }

    fn line_string_fallback(points: Vec<Coord>, reason: &str) -> BuildOutcome {
        match line_string_from(points) {
            Some(ls) => BuildOutcome::Downgraded(
                Geometry::LineString(ls),
                format!("{reason}; fell back to LineString"),
            ),
            None => BuildOutcome::Skipped(format!("{reason}; LineString fallback degenerate")),
        }
    }

    fn build_circle(center: Coord, radius: f64) -> BuildOutcome {
        if !(is_finite(center) && radius.is_finite()) {
            return BuildOutcome::Skipped(format!(
                "non-finite circle parameters (center ({}, {}), radius {radius})",
                center.x, center.y
            ));
        }
        if radius <= 0.0 {
            return BuildOutcome::Skipped(format!("circle radius must be > 0, got {radius}"));
        }

        // Closed 32-gon: 33 points, the first repeated as the last. The
        // closing point is copied, not recomputed at 2*pi, so first == last
        // holds bitwise and the ring needs no auto-closing.
        let mut ring = Vec::with_capacity(CIRCLE_SEGMENTS + 1);
        for i in 0..CIRCLE_SEGMENTS {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / CIRCLE_SEGMENTS as f64;
            ring.push(Coord {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            });
        }
        ring.push(ring[0]);
        BuildOutcome::Built(Geometry::Polygon(Polygon::new(LineString::new(ring), vec![])))
    }

    fn build_arc(center: Coord, radius: f64, start_angle: f64, end_angle: f64) -> BuildOutcome {
        if !(is_finite(center) && radius.is_finite()) {
            return BuildOutcome::Skipped(format!(
                "non-finite arc parameters (center ({}, {}), radius {radius})",
                center.x, center.y
            ));
        }
        if radius <= 0.0 {
            return BuildOutcome::Skipped(format!("arc radius must be > 0, got {radius}"));
        }
        if !(start_angle.is_finite() && end_angle.is_finite()) {
            return BuildOutcome::Skipped(format!(
                "non-finite arc angles (start {start_angle}, end {end_angle})"
            ));
        }

        let start = start_angle.to_radians();
        let end = end_angle.to_radians();
        let step = (end - start) / ARC_SEGMENTS as f64;

        // Arcs are always linear approximations, never areas, even for a
        // full sweep.
        let points: Vec<Coord> = (0..=ARC_SEGMENTS)
            .map(|i| {
                let angle = start + step * i as f64;
                Coord {
                    x: center.x + radius * angle.cos(),
                    y: center.y + radius * angle.sin(),
                }
            })
            .collect();

        match line_string_from(points) {
            Some(ls) => BuildOutcome::Built(Geometry::LineString(ls)),
            None => BuildOutcome::Skipped("zero-sweep arc".to_string()),
        }
    }
}

fn is_finite(c: Coord) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

/// Construct a LineString only if the sequence has at least 2 distinct points.
fn line_string_from(points: Vec<Coord>) -> Option<LineString<f64>> {
    if points.len() < 2 || !has_distinct_points(&points, 2) {
        return None;
    }
    Some(LineString::new(points))
}

fn has_distinct_points(points: &[Coord], n: usize) -> bool {
    let mut distinct: Vec<Coord> = Vec::with_capacity(n);
    for p in points {
        if !distinct.contains(p) {
            distinct.push(*p);
            if distinct.len() >= n {
                return true;
            }
        }
    }
    false
}
