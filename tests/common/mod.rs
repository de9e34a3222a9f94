//! Shared test utilities for dxf2geo integration tests.

#![allow(dead_code)]

use dxf2geo::{ConvertOptions, CrsId, RawEntity};

/// The reference drawing: one of each supported entity type.
///
/// Line (0,0)-(100,100), closed rectangle ring, circle at (50,25) r=15,
/// point at (75,75), arc at (25,75) r=20 from 0° to 90°.
pub fn reference_drawing() -> Vec<RawEntity> {
    vec![
        RawEntity::line(0.0, 0.0, 100.0, 100.0),
        RawEntity::light_polyline(
            [(0.0, 0.0), (100.0, 0.0), (100.0, 50.0), (0.0, 50.0), (0.0, 0.0)],
            true,
        ),
        RawEntity::circle(50.0, 25.0, 15.0),
        RawEntity::point(75.0, 75.0),
        RawEntity::arc(25.0, 75.0, 20.0, 0.0, 90.0),
    ]
}

/// Options with source == target, so no reprojection touches coordinates.
pub fn same_crs_options() -> ConvertOptions {
    ConvertOptions {
        target_crs: CrsId::wgs84(),
        source_crs: Some(CrsId::wgs84()),
        strict: false,
    }
}
