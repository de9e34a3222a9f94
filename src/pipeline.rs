//! End-to-end conversion orchestration.
//!
//! `entities -> build -> group by layer -> classify (advisory) -> assign
//! source CRS -> reproject -> result bundle`. Two follow-up entry points take
//! a previously produced bundle and re-emit it reprojected into another CRS
//! or with scaled coordinates; neither pass reclassifies.

use tracing::{info, warn};

use crate::classifier::{CoordinateClassification, CoordinateSystemClassifier};
use crate::collector::LayerCollector;
use crate::crs::CrsId;
use crate::entities::RawEntity;
use crate::error::{ConvertError, Result};
use crate::feature::Feature;
use crate::notification::Notification;
use crate::transform::GeometryTransformEngine;

/// Options for one source-to-output conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// CRS the output features are expressed in.
    pub target_crs: CrsId,
    /// CRS the drawing coordinates are in, when known. When absent the
    /// target is used as the source (the historical fallback: coordinates
    /// pass through unprojected).
    pub source_crs: Option<CrsId>,
    /// Abort on the first invalid entity instead of skipping it.
    pub strict: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            target_crs: CrsId::wgs84(),
            source_crs: None,
            strict: false,
        }
    }
}

/// Entity-level accounting for one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Supported entities encountered in the source.
    pub entities_seen: usize,
    /// Entities that produced a feature.
    pub converted: usize,
    /// Entities dropped after validation or construction failure.
    pub skipped: usize,
    /// Geometries whose transform failed (originals retained).
    pub transform_failures: usize,
}

/// The output bundle of a conversion or scale pass.
#[derive(Debug, Clone)]
pub struct FeatureCollectionResult {
    /// Features in layer encounter order, expressed in [`Self::crs`].
    pub features: Vec<Feature>,
    /// CRS of the feature coordinates.
    pub crs: CrsId,
    /// Source-CRS classification; present on initial conversion only.
    pub classification: Option<CoordinateClassification>,
    /// Entity accounting.
    pub summary: ConversionSummary,
    /// Non-fatal diagnostics gathered along the way.
    pub notifications: Vec<Notification>,
}

/// Orchestrates build, grouping, classification and reprojection.
pub struct ConversionPipeline;

impl ConversionPipeline {
    /// Convert an ordered entity sequence into a feature collection.
    pub fn convert(entities: &[RawEntity], options: &ConvertOptions) -> Result<FeatureCollectionResult> {
        let mut collector = LayerCollector::new();
        for entity in entities {
            collector.collect(entity, options.strict)?;
        }

        if collector.converted() == 0 {
            return Err(ConvertError::NoValidFeatures {
                seen: collector.seen(),
                skipped: collector.skipped(),
            });
        }

        // Classify the source coordinates before any transform touches them.
        let classification = CoordinateSystemClassifier::classify(collector.layers());
        info!(
            kind = ?classification.kind,
            likely_system = %classification.likely_system,
            "coordinate classification"
        );

        let (entities_seen, converted, skipped) =
            (collector.seen(), collector.converted(), collector.skipped());
        let (layers, mut notifications) = collector.finish();

        let source_crs = match &options.source_crs {
            Some(crs) => crs.clone(),
            None => {
                warn!(
                    target = %options.target_crs,
                    "no source CRS specified, using target CRS as source"
                );
                options.target_crs.clone()
            }
        };

        let features: Vec<Feature> = layers.into_values().flatten().collect();
        let (features, transform_summary, transform_notes) =
            GeometryTransformEngine::reproject(features, &source_crs, &options.target_crs)?;
        notifications.extend(transform_notes);

        Ok(FeatureCollectionResult {
            features,
            crs: options.target_crs.clone(),
            classification: Some(classification),
            summary: ConversionSummary {
                entities_seen,
                converted,
                skipped,
                transform_failures: transform_summary.failed,
            },
            notifications,
        })
    }

    /// Read a DXF drawing from disk and convert it.
    pub fn convert_file(
        path: impl AsRef<std::path::Path>,
        options: &ConvertOptions,
    ) -> Result<FeatureCollectionResult> {
        let entities = crate::io::dxf::read_entities(path)?;
        Self::convert(&entities, options)
    }

    /// Reproject a previously produced bundle into another CRS.
    ///
    /// The bundle's own CRS is the source; classification is not recomputed.
    pub fn apply_reprojection(
        result: &FeatureCollectionResult,
        target_crs: &CrsId,
    ) -> Result<FeatureCollectionResult> {
        let (features, summary, notifications) =
            GeometryTransformEngine::reproject(result.features.clone(), &result.crs, target_crs)?;
        let count = features.len();

        Ok(FeatureCollectionResult {
            features,
            crs: target_crs.clone(),
            classification: None,
            summary: ConversionSummary {
                entities_seen: count,
                converted: count,
                skipped: 0,
                transform_failures: summary.failed,
            },
            notifications,
        })
    }

    /// Apply a uniform scale factor to a previously produced bundle.
    ///
    /// The output keeps the parent's CRS metadata; classification is not
    /// recomputed and no reprojection happens.
    pub fn apply_scale(result: &FeatureCollectionResult, factor: f64) -> Result<FeatureCollectionResult> {
        let (features, summary, notifications) =
            GeometryTransformEngine::scale(result.features.clone(), factor)?;
        let count = features.len();

        Ok(FeatureCollectionResult {
            features,
            crs: result.crs.clone(),
            classification: None,
            summary: ConversionSummary {
                entities_seen: count,
                converted: count,
                skipped: 0,
                transform_failures: summary.failed,
            },
            notifications,
        })
    }
}
