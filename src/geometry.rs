//! Output geometry model.
//!
//! [`Geometry`] is a closed tagged union over the three shapes the pipeline
//! produces: `Point`, `LineString` and `Polygon`, backed by `geo-types`.
//! Invariants (enforced by [`builder`](crate::builder), relied on everywhere
//! else): every `Polygon` is simple and non-empty, every `LineString` has at
//! least 2 distinct points.

use geo::{Area, BooleanOps, HasDimensions, Validation};
use geo_types::{Coord, LineString, MultiPolygon, Point, Polygon};

/// Discriminant of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl GeometryKind {
    /// GeoJSON-style name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
        }
    }
}

/// A converted vector geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    Polygon(Polygon<f64>),
}

impl Geometry {
    /// The discriminant of this geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Whether the geometry has no coordinates.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::LineString(ls) => ls.is_empty(),
            Self::Polygon(p) => p.is_empty(),
        }
    }

    /// Whether the geometry is topologically valid.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Point(p) => p.is_valid(),
            Self::LineString(ls) => ls.is_valid(),
            Self::Polygon(p) => p.is_valid(),
        }
    }

    /// Up to `limit` representative coordinates: the point itself, or the
    /// leading vertices of the line / exterior ring.
    pub fn sample_coords(&self, limit: usize) -> Vec<Coord> {
        match self {
            Self::Point(p) => vec![p.0].into_iter().take(limit).collect(),
            Self::LineString(ls) => ls.coords().take(limit).copied().collect(),
            Self::Polygon(p) => p.exterior().coords().take(limit).copied().collect(),
        }
    }

    /// Total number of coordinates (exterior ring only for polygons).
    pub fn coord_count(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::LineString(ls) => ls.0.len(),
            Self::Polygon(p) => p.exterior().0.len(),
        }
    }

    /// Apply an infallible coordinate mapping to every vertex.
    pub fn map_coords(&self, f: impl Fn(Coord) -> Coord + Copy) -> Geometry {
        use geo::MapCoords;
        match self {
            Self::Point(p) => Self::Point(p.map_coords(f)),
            Self::LineString(ls) => Self::LineString(ls.map_coords(f)),
            Self::Polygon(p) => Self::Polygon(p.map_coords(f)),
        }
    }

    /// Apply a fallible coordinate mapping to every vertex.
    pub fn try_map_coords<E>(
        &self,
        f: impl Fn(Coord) -> std::result::Result<Coord, E> + Copy,
    ) -> std::result::Result<Geometry, E> {
        use geo::MapCoords;
        Ok(match self {
            Self::Point(p) => Self::Point(p.try_map_coords(f)?),
            Self::LineString(ls) => Self::LineString(ls.try_map_coords(f)?),
            Self::Polygon(p) => Self::Polygon(p.try_map_coords(f)?),
        })
    }
}

impl From<Geometry> for geo_types::Geometry<f64> {
    fn from(g: Geometry) -> Self {
        match g {
            Geometry::Point(p) => geo_types::Geometry::Point(p),
            Geometry::LineString(ls) => geo_types::Geometry::LineString(ls),
            Geometry::Polygon(p) => geo_types::Geometry::Polygon(p),
        }
    }
}

/// Repair a self-intersecting or otherwise invalid polygon.
///
/// The standard auto-repair is a self-union (the `buffer(0)` analog): the
/// ring is re-noded and the interior recomputed with an even-odd fill. The
/// output may be multi-part; since the data model is a closed union, the
/// largest-area component is kept. Returns `None` when repair produced
/// nothing usable.
pub fn repair_polygon(polygon: &Polygon<f64>) -> Option<Polygon<f64>> {
    let repaired: MultiPolygon<f64> = polygon.union(polygon);
    repaired
        .0
        .into_iter()
        .filter(|p| !p.is_empty())
        .max_by(|a, b| {
            a.unsigned_area()
                .partial_cmp(&b.unsigned_area())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
