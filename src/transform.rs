//! Batch geometry transforms: reprojection and uniform scaling.
//!
//! Both operations are batch-oriented with per-item fault isolation: one bad
//! geometry never aborts the batch. Each item folds to a
//! `(transformed_or_original, outcome)` pair and the outcomes aggregate into
//! a [`TransformSummary`], so no mutable counters thread through the error
//! handling. Whole-batch preconditions (empty input, bad parameters,
//! unresolvable CRS pair) abort immediately instead.

use tracing::{debug, warn};

use crate::crs::CrsId;
use crate::error::{ConvertError, Result};
use crate::feature::Feature;
use crate::geometry::{repair_polygon, Geometry};
use crate::notification::{Notification, NotificationType};

/// Accepted band for uniform scale corrections. Values outside it are
/// implausible for survey drift and are rejected outright, not clamped.
pub const SCALE_FACTOR_RANGE: (f64, f64) = (0.9, 1.1);

/// Aggregate outcome of a batch transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    /// Geometries successfully transformed (or passed through a no-op).
    pub transformed: usize,
    /// Geometries that failed; their originals were retained.
    pub failed: usize,
}

/// Applies coordinate transforms to batches of features.
pub struct GeometryTransformEngine;

impl GeometryTransformEngine {
    /// Reproject every feature from `source` to `target`.
    ///
    /// Equal identifiers are a no-op. An unresolvable CRS pair is fatal for
    /// the whole batch; a single geometry failing mid-transform keeps its
    /// original coordinates and is counted instead.
    pub fn reproject(
        features: Vec<Feature>,
        source: &CrsId,
        target: &CrsId,
    ) -> Result<(Vec<Feature>, TransformSummary, Vec<Notification>)> {
        if features.is_empty() {
            return Err(ConvertError::EmptyFeatureBatch);
        }
        if source == target {
            let summary = TransformSummary {
                transformed: features.len(),
                failed: 0,
            };
            return Ok((features, summary, Vec::new()));
        }

        let setup_err = |e: ConvertError| ConvertError::ProjectionSetup {
            source_crs: source.to_string(),
            target_crs: target.to_string(),
            reason: e.to_string(),
        };
        // Transformer construction is the expensive step; do it once per
        // CRS pair, not once per geometry.
        let from = source.to_proj().map_err(setup_err)?;
        let to = target.to_proj().map_err(setup_err)?;
        debug!(%source, %target, "reprojecting feature batch");

        Ok(Self::isolate(features, "reprojection", |geometry| {
            geometry.try_map_coords(|c| {
                let mut pt = (c.x, c.y, 0.0);
                if from.is_latlong() {
                    pt.0 = pt.0.to_radians();
                    pt.1 = pt.1.to_radians();
                }
                proj4rs::transform::transform(&from, &to, &mut pt)
                    .map_err(|e| e.to_string())?;
                if to.is_latlong() {
                    pt.0 = pt.0.to_degrees();
                    pt.1 = pt.1.to_degrees();
                }
                Ok(geo_types::Coord { x: pt.0, y: pt.1 })
            })
        }))
    }

    /// Multiply every coordinate of every geometry by `factor`.
    ///
    /// This is a plain coordinate multiply, not a scale about the centroid.
    /// Invalid polygons get one repair attempt before scaling; a geometry
    /// whose scaled form comes out empty keeps its original.
    pub fn scale(
        features: Vec<Feature>,
        factor: f64,
    ) -> Result<(Vec<Feature>, TransformSummary, Vec<Notification>)> {
        Self::validate_scale_factor(factor)?;
        if features.is_empty() {
            return Err(ConvertError::EmptyFeatureBatch);
        }
        debug!(factor, "scaling feature batch");

        Ok(Self::isolate(features, "scaling", |geometry| {
            if geometry.is_empty() {
                // Nothing to scale; pass through unchanged.
                return Ok(geometry.clone());
            }
            let repaired;
            let subject = match geometry {
                Geometry::Polygon(p) if !geometry.is_valid() => {
                    match repair_polygon(p) {
                        Some(fixed) => {
                            repaired = Geometry::Polygon(fixed);
                            &repaired
                        }
                        None => return Err("polygon unrepairable before scaling".to_string()),
                    }
                }
                other => other,
            };
            let scaled = subject.map_coords(|c| geo_types::Coord {
                x: c.x * factor,
                y: c.y * factor,
            });
            if scaled.is_empty() {
                return Err("scaling produced an empty geometry".to_string());
            }
            Ok(scaled)
        }))
    }

    /// Reject non-finite, non-positive, or out-of-band scale factors before
    /// any geometry is touched.
    pub fn validate_scale_factor(factor: f64) -> Result<()> {
        if !factor.is_finite() {
            return Err(ConvertError::InvalidTransformParameter(format!(
                "scale factor must be finite, got {factor}"
            )));
        }
        if factor <= 0.0 {
            return Err(ConvertError::InvalidTransformParameter(format!(
                "scale factor must be greater than 0, got {factor}"
            )));
        }
        let (lo, hi) = SCALE_FACTOR_RANGE;
        if factor < lo || factor > hi {
            return Err(ConvertError::InvalidTransformParameter(format!(
                "scale factor {factor} is outside the valid range ({lo}-{hi})"
            )));
        }
        Ok(())
    }

    /// Fold a fallible per-geometry transform over the batch, retaining the
    /// original geometry for any item that fails.
    fn isolate(
        features: Vec<Feature>,
        operation: &str,
        transform: impl Fn(&Geometry) -> std::result::Result<Geometry, String>,
    ) -> (Vec<Feature>, TransformSummary, Vec<Notification>) {
        let mut notifications = Vec::new();
        let (out, summary) = features.into_iter().fold(
            (Vec::new(), TransformSummary::default()),
            |(mut out, mut summary), feature| {
                match transform(&feature.geometry) {
                    Ok(geometry) => {
                        summary.transformed += 1;
                        out.push(feature.with_geometry(geometry));
                    }
                    Err(reason) => {
                        summary.failed += 1;
                        warn!(
                            entity = %feature.entity_type,
                            layer = %feature.layer,
                            %reason,
                            "{operation} failed; keeping original geometry"
                        );
                        notifications.push(Notification::new(
                            NotificationType::TransformFailed,
                            format!(
                                "{operation} failed for {} on layer '{}': {reason}; original geometry retained",
                                feature.entity_type, feature.layer
                            ),
                        ));
                        out.push(feature);
                    }
                }
                (out, summary)
            },
        );
        (out, summary, notifications)
    }
}
