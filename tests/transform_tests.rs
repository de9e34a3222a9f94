//! Transform engine tests: scale band validation, scale inversion, and
//! reprojection behavior across the public pipeline surface.

mod common;

use common::{reference_drawing, same_crs_options};
use dxf2geo::{
    ConversionPipeline, ConvertError, ConvertOptions, CrsId, Feature, Geometry,
    GeometryTransformEngine, RawEntity, SCALE_FACTOR_RANGE,
};
use proptest::prelude::*;

fn all_coords(features: &[Feature]) -> Vec<(f64, f64)> {
    features
        .iter()
        .flat_map(|f| f.geometry.sample_coords(usize::MAX))
        .map(|c| (c.x, c.y))
        .collect()
}

#[test]
fn out_of_band_scale_factor_is_rejected_before_transforming() {
    let result = ConversionPipeline::convert(&reference_drawing(), &same_crs_options()).unwrap();
    for bad in [1.5, 0.89, 1.11, 0.0, -0.5, f64::NAN] {
        let err = ConversionPipeline::apply_scale(&result, bad).unwrap_err();
        assert!(
            matches!(err, ConvertError::InvalidTransformParameter(_)),
            "factor {bad} should be rejected"
        );
    }
}

#[test]
fn scale_band_endpoints_are_accepted() {
    let result = ConversionPipeline::convert(&reference_drawing(), &same_crs_options()).unwrap();
    let (lo, hi) = SCALE_FACTOR_RANGE;
    assert!(ConversionPipeline::apply_scale(&result, lo).is_ok());
    assert!(ConversionPipeline::apply_scale(&result, hi).is_ok());
}

#[test]
fn scaling_multiplies_every_coordinate() {
    let result = ConversionPipeline::convert(&reference_drawing(), &same_crs_options()).unwrap();
    let scaled = ConversionPipeline::apply_scale(&result, 1.1).unwrap();

    for ((x, y), (sx, sy)) in all_coords(&result.features)
        .into_iter()
        .zip(all_coords(&scaled.features))
    {
        assert!((sx - x * 1.1).abs() < 1e-9);
        assert!((sy - y * 1.1).abs() < 1e-9);
    }
}

#[test]
fn reprojection_wgs84_to_web_mercator_and_back() {
    let entities = vec![RawEntity::point(-122.4194, 37.7749)];
    let options = ConvertOptions {
        target_crs: CrsId::epsg(3857),
        source_crs: Some(CrsId::wgs84()),
        strict: false,
    };
    let result = ConversionPipeline::convert(&entities, &options).unwrap();

    let Geometry::Point(p) = &result.features[0].geometry else {
        panic!("expected point");
    };
    // Known Web Mercator coordinates for San Francisco.
    assert!((p.x() - -13_627_665.0).abs() < 100.0, "x = {}", p.x());
    assert!((p.y() - 4_547_679.0).abs() < 100.0, "y = {}", p.y());

    // Round-trip back to lat/long.
    let (back, summary, _) = GeometryTransformEngine::reproject(
        result.features.clone(),
        &CrsId::epsg(3857),
        &CrsId::wgs84(),
    )
    .unwrap();
    assert_eq!(summary.failed, 0);
    let Geometry::Point(p) = &back[0].geometry else {
        panic!("expected point");
    };
    assert!((p.x() - -122.4194).abs() < 1e-6);
    assert!((p.y() - 37.7749).abs() < 1e-6);
}

#[test]
fn reprojection_failure_is_fatal_for_the_batch() {
    let entities = vec![RawEntity::point(0.0, 0.0)];
    let options = ConvertOptions {
        target_crs: CrsId::wgs84(),
        source_crs: Some(CrsId::epsg(999_999)),
        strict: false,
    };
    let err = ConversionPipeline::convert(&entities, &options).unwrap_err();
    assert!(matches!(err, ConvertError::ProjectionSetup { .. }));
}

proptest! {
    /// Scaling by f then 1/f restores coordinates, for factors where both
    /// directions stay inside the accepted band.
    #[test]
    fn scale_inversion_restores_coordinates(factor in 0.91f64..=1.09) {
        let inverse = 1.0 / factor;
        prop_assume!((0.9..=1.1).contains(&inverse));

        let result =
            ConversionPipeline::convert(&reference_drawing(), &same_crs_options()).unwrap();
        let there = ConversionPipeline::apply_scale(&result, factor).unwrap();
        let back = ConversionPipeline::apply_scale(&there, inverse).unwrap();

        for ((x, y), (bx, by)) in all_coords(&result.features)
            .into_iter()
            .zip(all_coords(&back.features))
        {
            prop_assert!((bx - x).abs() < 1e-9);
            prop_assert!((by - y).abs() < 1e-9);
        }
    }

    /// The accepted band is exactly [0.9, 1.1]: anything outside fails fast.
    #[test]
    fn factors_outside_band_always_rejected(factor in prop::num::f64::ANY) {
        prop_assume!(!(0.9..=1.1).contains(&factor) || !factor.is_finite());
        let outcome = GeometryTransformEngine::validate_scale_factor(factor);
        prop_assert!(outcome.is_err());
    }
}
