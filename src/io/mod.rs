//! Input/output adapters.
//!
//! The core pipeline only ever sees [`RawEntity`](crate::entities::RawEntity)
//! sequences and [`FeatureCollectionResult`](crate::pipeline::FeatureCollectionResult)
//! bundles; these modules adapt them to on-disk formats. `dxf` reads
//! drawings, `geojson` serializes results.

pub mod dxf;
pub mod geojson;
