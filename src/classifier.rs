//! Heuristic coordinate-system classification.
//!
//! CAD data carries no CRS metadata, so the only available signal is the
//! numeric range of the coordinates themselves. The classifier samples a
//! bounded number of vertices across layers and reports whether they look
//! geographic (lat/long), projected, or unknown, with a textual
//! recommendation. Advisory only: it never alters data and never blocks a
//! conversion.
//!
//! Deliberately a pure function with no side effects or logging, so it can
//! be unit-tested against literal coordinate fixtures.

use serde::{Deserialize, Serialize};

use crate::collector::LayeredCollection;

/// Features sampled per layer.
pub const SAMPLE_FEATURES_PER_LAYER: usize = 10;

/// Representative coordinates taken from each sampled feature.
pub const SAMPLE_COORDS_PER_FEATURE: usize = 5;

/// Total sample cap across the whole collection.
pub const SAMPLE_COORD_CAP: usize = 50;

/// All-axes bound for latitude/longitude data: |x| <= 180, |y| <= 90.
pub const GEOGRAPHIC_X_BOUND: f64 = 180.0;
pub const GEOGRAPHIC_Y_BOUND: f64 = 90.0;

/// Magnitude band typical of US State Plane feet and meter-scale projected
/// systems. Empirically chosen; tuned for North-American drawings.
pub const PROJECTED_TIGHT_BAND: (f64, f64) = (200_000.0, 20_000_000.0);

/// Wider, lower-confidence projected magnitude band.
pub const PROJECTED_WIDE_BAND: (f64, f64) = (100_000.0, 30_000_000.0);

/// Northing/easting magnitude ratio above which State Plane (large false
/// northings) is assumed.
pub const FEET_NORTHING_RATIO: f64 = 2.0;

/// Both-axes magnitude floor that also suggests State Plane feet.
pub const FEET_MAGNITUDE_FLOOR: f64 = 1_000_000.0;

/// Broad classification of the sampled coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateKind {
    Geographic,
    Projected,
    Unknown,
}

/// Advisory classification of the source coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateClassification {
    /// Geographic, projected, or unknown.
    #[serde(rename = "type")]
    pub kind: CoordinateKind,
    /// Human-readable name of the most likely system family.
    pub likely_system: String,
    /// Up to 5 of the sampled (x, y) pairs, for the report.
    pub sample_coords: Vec<(f64, f64)>,
    /// (min, max) over sampled x values.
    pub x_range: (f64, f64),
    /// (min, max) over sampled y values.
    pub y_range: (f64, f64),
    /// Guidance for the caller, naming example EPSG codes where useful.
    pub suggestion: String,
}

/// Classifies coordinate samples drawn from a layered collection.
pub struct CoordinateSystemClassifier;

impl CoordinateSystemClassifier {
    /// Sample the collection and classify the coordinate ranges.
    pub fn classify(layers: &LayeredCollection) -> CoordinateClassification {
        let samples = Self::sample(layers);
        if samples.is_empty() {
            return CoordinateClassification {
                kind: CoordinateKind::Unknown,
                likely_system: "unknown".to_string(),
                sample_coords: Vec::new(),
                x_range: (0.0, 0.0),
                y_range: (0.0, 0.0),
                suggestion: "No coordinates found to analyze".to_string(),
            };
        }

        let mut x_range = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y_range = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in &samples {
            x_range = (x_range.0.min(x), x_range.1.max(x));
            y_range = (y_range.0.min(y), y_range.1.max(y));
        }

        let (kind, likely_system, suggestion) = Self::classify_ranges(x_range, y_range);

        CoordinateClassification {
            kind,
            likely_system,
            sample_coords: samples.into_iter().take(5).collect(),
            x_range,
            y_range,
            suggestion,
        }
    }

    /// Gather up to [`SAMPLE_COORD_CAP`] (x, y) pairs: the first
    /// [`SAMPLE_FEATURES_PER_LAYER`] features of each layer, up to
    /// [`SAMPLE_COORDS_PER_FEATURE`] vertices each.
    fn sample(layers: &LayeredCollection) -> Vec<(f64, f64)> {
        let mut samples = Vec::new();
        'layers: for features in layers.values() {
            for feature in features.iter().take(SAMPLE_FEATURES_PER_LAYER) {
                for c in feature.geometry.sample_coords(SAMPLE_COORDS_PER_FEATURE) {
                    samples.push((c.x, c.y));
                }
                if samples.len() >= SAMPLE_COORD_CAP {
                    break 'layers;
                }
            }
        }
        samples
    }

    fn classify_ranges(
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> (CoordinateKind, String, String) {
        let geographic = x_range.0 >= -GEOGRAPHIC_X_BOUND
            && x_range.1 <= GEOGRAPHIC_X_BOUND
            && y_range.0 >= -GEOGRAPHIC_Y_BOUND
            && y_range.1 <= GEOGRAPHIC_Y_BOUND;
        if geographic {
            return (
                CoordinateKind::Geographic,
                "WGS84 or similar geographic CRS".to_string(),
                "Coordinates appear to be in Latitude/Longitude format".to_string(),
            );
        }

        let x_magnitude = x_range.0.abs().max(x_range.1.abs());
        let y_magnitude = y_range.0.abs().max(y_range.1.abs());
        let in_band = |band: (f64, f64)| {
            x_magnitude >= band.0
                && x_magnitude <= band.1
                && y_magnitude >= band.0
                && y_magnitude <= band.1
        };

        if in_band(PROJECTED_TIGHT_BAND) {
            let ratio = if x_magnitude > 0.0 {
                y_magnitude / x_magnitude
            } else {
                0.0
            };
            // Large false northings (or both axes in the millions) point at
            // State Plane feet rather than meter-scale systems.
            if ratio > FEET_NORTHING_RATIO
                || (x_magnitude > FEET_MAGNITUDE_FLOOR && y_magnitude > FEET_MAGNITUDE_FLOOR)
            {
                (
                    CoordinateKind::Projected,
                    "US State Plane (US Survey Feet)".to_string(),
                    "These coordinates appear to be in US State Plane (feet). \
                     Specify the correct State Plane zone (e.g. EPSG:2227 for CA Zone 3, \
                     EPSG:2277 for TX Central) as the source coordinate system."
                        .to_string(),
                )
            } else {
                (
                    CoordinateKind::Projected,
                    "Web Mercator (EPSG:3857) or UTM".to_string(),
                    "These coordinates appear to be in a projected system (meters). \
                     Common systems: Web Mercator (EPSG:3857) or UTM zones. \
                     Specify the correct source coordinate system."
                        .to_string(),
                )
            }
        } else if in_band(PROJECTED_WIDE_BAND) {
            (
                CoordinateKind::Projected,
                "Projected system (likely State Plane feet or Web Mercator)".to_string(),
                "These coordinates are in a projected system. For US projects this is \
                 likely State Plane (US Survey Feet). Specify the correct State Plane \
                 zone (e.g. EPSG:2277 for TX Central) as the source coordinate system."
                    .to_string(),
            )
        } else {
            (
                CoordinateKind::Projected,
                "Unknown projected system".to_string(),
                "These coordinates are projected but the system is unclear. \
                 Specify the correct source coordinate system."
                    .to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::LayerCollector;
    use crate::entities::RawEntity;

    fn layers_from(entities: &[RawEntity]) -> LayeredCollection {
        let mut collector = LayerCollector::new();
        for e in entities {
            collector.collect(e, false).unwrap();
        }
        collector.finish().0
    }

    #[test]
    fn test_empty_collection_is_unknown() {
        let c = CoordinateSystemClassifier::classify(&LayeredCollection::new());
        assert_eq!(c.kind, CoordinateKind::Unknown);
        assert_eq!(c.x_range, (0.0, 0.0));
        assert!(c.suggestion.contains("No coordinates"));
    }

    #[test]
    fn test_lat_long_range_is_geographic() {
        let layers = layers_from(&[
            RawEntity::point(-122.4, 37.8),
            RawEntity::line(-122.5, 37.7, -122.3, 37.9),
        ]);
        let c = CoordinateSystemClassifier::classify(&layers);
        assert_eq!(c.kind, CoordinateKind::Geographic);
        assert!(c.suggestion.contains("Latitude/Longitude"));
    }

    #[test]
    fn test_state_plane_detected_by_northing_ratio() {
        // y magnitude ~ 5M with x well under half of it.
        let layers = layers_from(&[RawEntity::line(2_000_000.0, 5_000_000.0, 2_000_100.0, 5_000_100.0)]);
        let c = CoordinateSystemClassifier::classify(&layers);
        assert_eq!(c.kind, CoordinateKind::Projected);
        assert_eq!(c.likely_system, "US State Plane (US Survey Feet)");
    }

    #[test]
    fn test_state_plane_detected_by_joint_magnitude() {
        let layers = layers_from(&[RawEntity::point(5_000_000.0, 5_000_000.0)]);
        let c = CoordinateSystemClassifier::classify(&layers);
        assert_eq!(c.likely_system, "US State Plane (US Survey Feet)");
    }

    #[test]
    fn test_meter_scale_band_is_web_mercator_or_utm() {
        let layers = layers_from(&[RawEntity::point(500_000.0, 900_000.0)]);
        let c = CoordinateSystemClassifier::classify(&layers);
        assert_eq!(c.likely_system, "Web Mercator (EPSG:3857) or UTM");
    }

    #[test]
    fn test_wide_band_is_low_confidence_projected() {
        let layers = layers_from(&[RawEntity::point(150_000.0, 150_000.0)]);
        let c = CoordinateSystemClassifier::classify(&layers);
        assert_eq!(
            c.likely_system,
            "Projected system (likely State Plane feet or Web Mercator)"
        );
    }

    #[test]
    fn test_out_of_band_is_unknown_projected() {
        let layers = layers_from(&[RawEntity::point(500.0, 200.0)]);
        let c = CoordinateSystemClassifier::classify(&layers);
        assert_eq!(c.kind, CoordinateKind::Projected);
        assert_eq!(c.likely_system, "Unknown projected system");
    }

    #[test]
    fn test_sample_cap_is_respected() {
        let mut entities = Vec::new();
        for i in 0..30 {
            entities.push(RawEntity::light_polyline(
                (0..10).map(|j| (i as f64 * 10.0 + j as f64, 1_000_000.0)),
                false,
            ));
        }
        let layers = layers_from(&entities);
        let samples = CoordinateSystemClassifier::sample(&layers);
        assert!(samples.len() <= SAMPLE_COORD_CAP);
        assert!(!samples.is_empty());
    }

    #[test]
    fn test_report_keeps_at_most_five_sample_points() {
        let layers = layers_from(&[RawEntity::light_polyline(
            (0..10).map(|i| (i as f64, 500.0)),
            false,
        )]);
        let c = CoordinateSystemClassifier::classify(&layers);
        assert!(c.sample_coords.len() <= 5);
    }
}
