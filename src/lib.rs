//! # dxf2geo
//!
//! Converts CAD drawing entities (points, lines, polylines, circles, arcs)
//! into georeferenced vector feature collections, optionally reprojecting
//! between coordinate reference systems and applying small uniform scale
//! corrections for survey drift.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dxf2geo::{ConversionPipeline, ConvertOptions};
//!
//! // Convert a drawing, leaving coordinates untouched (source == target).
//! let result = ConversionPipeline::convert_file("site.dxf", &ConvertOptions::default())?;
//!
//! // Inspect the coordinate-system classification.
//! if let Some(c) = &result.classification {
//!     println!("{}: {}", c.likely_system, c.suggestion);
//! }
//!
//! // Serialize to GeoJSON with embedded CRS metadata.
//! let geojson = dxf2geo::io::geojson::to_string(&result)?;
//! # Ok::<(), dxf2geo::ConvertError>(())
//! ```
//!
//! ## Architecture
//!
//! The pipeline is a chain of small, separately testable stages:
//!
//! - `EntityGeometryBuilder`: one entity to at most one geometry, with an
//!   explicit Polygon → repair → LineString → drop fallback chain
//! - `LayerCollector`: encounter-ordered grouping plus skip accounting
//! - `CoordinateSystemClassifier`: advisory CRS heuristics from raw
//!   coordinate magnitudes
//! - `GeometryTransformEngine`: batch reprojection / uniform scaling with
//!   per-item fault isolation
//! - `ConversionPipeline`: orchestration and the result bundle
//!
//! Malformed entities degrade or drop individually; a conversion never
//! aborts for one bad entity unless strict mode asks it to.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod builder;
pub mod classifier;
pub mod collector;
pub mod crs;
pub mod entities;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod io;
pub mod notification;
pub mod pipeline;
pub mod transform;

// Re-export commonly used types
pub use error::{ConvertError, Result};
pub use entities::{RawEntity, RawEntityKind, COLOR_BY_LAYER, DEFAULT_LAYER};
pub use geometry::{Geometry, GeometryKind};
pub use feature::Feature;
pub use crs::CrsId;
pub use builder::{BuildOutcome, EntityGeometryBuilder};
pub use collector::{LayerCollector, LayeredCollection};
pub use classifier::{CoordinateClassification, CoordinateKind, CoordinateSystemClassifier};
pub use transform::{GeometryTransformEngine, TransformSummary, SCALE_FACTOR_RANGE};
pub use pipeline::{ConversionPipeline, ConversionSummary, ConvertOptions, FeatureCollectionResult};
pub use notification::{Notification, NotificationType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
