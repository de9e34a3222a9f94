//! Layer-wise feature collection.
//!
//! Groups built features by source layer in encounter order and tracks how
//! many supported entities were seen vs. successfully converted, so the
//! caller can report "M of N features converted". Grouping is deterministic:
//! identical input entity order always yields identical layer ordering.

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::builder::{BuildOutcome, EntityGeometryBuilder};
use crate::entities::RawEntity;
use crate::error::{ConvertError, Result};
use crate::feature::Feature;
use crate::notification::{Notification, NotificationType};

/// Layer name -> features, in entity encounter order.
pub type LayeredCollection = IndexMap<String, Vec<Feature>>;

/// Accumulates converted features per layer.
#[derive(Debug, Default)]
pub struct LayerCollector {
    layers: LayeredCollection,
    seen: usize,
    converted: usize,
    skipped: usize,
    notifications: Vec<Notification>,
}

impl LayerCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and file one entity.
    ///
    /// In lenient mode a failed entity is recorded and skipped; in strict
    /// mode the first failure aborts with an error naming the entity's type
    /// and layer.
    pub fn collect(&mut self, entity: &RawEntity, strict: bool) -> Result<()> {
        if !entity.kind.is_supported() {
            self.notifications.push(Notification::new(
                NotificationType::UnsupportedEntity,
                format!(
                    "ignoring unsupported {} on layer '{}'",
                    entity.type_tag(),
                    entity.layer
                ),
            ));
            return Ok(());
        }

        self.seen += 1;
        // The layer appears in the output map even if the entity fails.
        self.layers.entry(entity.layer.clone()).or_default();

        match EntityGeometryBuilder::build(entity) {
            BuildOutcome::Built(geometry) => {
                self.push_feature(entity, geometry);
                Ok(())
            }
            BuildOutcome::Downgraded(geometry, note) => {
                self.notifications.push(Notification::new(
                    NotificationType::GeometryDowngraded,
                    format!("{} on layer '{}': {}", entity.type_tag(), entity.layer, note),
                ));
                self.push_feature(entity, geometry);
                Ok(())
            }
            BuildOutcome::Skipped(reason) => {
                self.skipped += 1;
                warn!(
                    entity = entity.type_tag(),
                    layer = %entity.layer,
                    %reason,
                    "skipped invalid entity"
                );
                self.notifications.push(Notification::new(
                    NotificationType::EntitySkipped,
                    format!(
                        "skipped invalid {} on layer '{}': {}",
                        entity.type_tag(),
                        entity.layer,
                        reason
                    ),
                ));
                if strict {
                    return Err(ConvertError::InvalidEntity {
                        entity_type: entity.type_tag().to_string(),
                        layer: entity.layer.clone(),
                        reason,
                    });
                }
                Ok(())
            }
            BuildOutcome::Unsupported => unreachable!("supported kind checked above"),
        }
    }

    fn push_feature(&mut self, entity: &RawEntity, geometry: crate::geometry::Geometry) {
        self.converted += 1;
        let feature = Feature::new(geometry, entity.layer.clone(), entity.type_tag())
            .with_color(entity.color);
        self.layers
            .entry(entity.layer.clone())
            .or_default()
            .push(feature);
    }

    /// Supported entities encountered.
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Entities successfully converted.
    pub fn converted(&self) -> usize {
        self.converted
    }

    /// Entities dropped after validation or construction failure.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The grouped features, read-only.
    pub fn layers(&self) -> &LayeredCollection {
        &self.layers
    }

    /// Log the conversion summary and dissolve into parts.
    pub fn finish(self) -> (LayeredCollection, Vec<Notification>) {
        if self.skipped > 0 {
            info!(
                converted = self.converted,
                seen = self.seen,
                skipped = self.skipped,
                "conversion summary"
            );
        }
        (self.layers, self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RawEntityKind;

    #[test]
    fn test_grouping_preserves_encounter_order() {
        let mut collector = LayerCollector::new();
        let entities = vec![
            RawEntity::point(0.0, 0.0).on_layer("B"),
            RawEntity::point(1.0, 1.0).on_layer("A"),
            RawEntity::point(2.0, 2.0).on_layer("B"),
        ];
        for e in &entities {
            collector.collect(e, false).unwrap();
        }

        let order: Vec<&String> = collector.layers().keys().collect();
        assert_eq!(order, ["B", "A"]);
        assert_eq!(collector.layers()["B"].len(), 2);
        assert_eq!(collector.converted(), 3);
    }

    #[test]
    fn test_lenient_mode_counts_skips() {
        let mut collector = LayerCollector::new();
        collector.collect(&RawEntity::point(f64::NAN, 0.0), false).unwrap();
        collector.collect(&RawEntity::point(1.0, 1.0), false).unwrap();

        assert_eq!(collector.seen(), 2);
        assert_eq!(collector.converted(), 1);
        assert_eq!(collector.skipped(), 1);

        let (_, notifications) = collector.finish();
        assert!(notifications
            .iter()
            .any(|n| n.notification_type == NotificationType::EntitySkipped));
    }

    #[test]
    fn test_strict_mode_aborts_on_first_failure() {
        let mut collector = LayerCollector::new();
        let bad = RawEntity::circle(0.0, 0.0, -1.0).on_layer("SITE");
        let err = collector.collect(&bad, true).unwrap_err();
        match err {
            ConvertError::InvalidEntity { entity_type, layer, .. } => {
                assert_eq!(entity_type, "CIRCLE");
                assert_eq!(layer, "SITE");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_entities_are_not_counted() {
        let mut collector = LayerCollector::new();
        let e = RawEntity::new(RawEntityKind::Unsupported("HATCH".to_string()));
        collector.collect(&e, true).unwrap();
        assert_eq!(collector.seen(), 0);
        assert_eq!(collector.skipped(), 0);
    }

    #[test]
    fn test_failed_entity_still_registers_its_layer() {
        let mut collector = LayerCollector::new();
        collector
            .collect(&RawEntity::point(f64::NAN, 0.0).on_layer("EMPTY"), false)
            .unwrap();
        assert!(collector.layers().contains_key("EMPTY"));
        assert!(collector.layers()["EMPTY"].is_empty());
    }
}
