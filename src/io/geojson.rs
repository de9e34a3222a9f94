//! GeoJSON output and re-input.
//!
//! The serialized form carries two foreign members alongside the standard
//! `features` array: a `crs` name member in URN form (QGIS-compatible) and,
//! on initial conversions, the classifier's `coordinate_info` block. A
//! previously written collection can be read back so a scale pass can run
//! against stored output.

use geojson::{FeatureCollection, GeoJson, JsonObject, JsonValue};

use crate::crs::CrsId;
use crate::entities::COLOR_BY_LAYER;
use crate::error::{ConvertError, Result};
use crate::feature::Feature;
use crate::geometry::Geometry;
use crate::pipeline::{ConversionSummary, FeatureCollectionResult};

/// Serialize a result bundle to a GeoJSON feature collection.
pub fn to_geojson(result: &FeatureCollectionResult) -> Result<FeatureCollection> {
    let features = result
        .features
        .iter()
        .map(feature_to_geojson)
        .collect::<Vec<_>>();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("crs".to_string(), crs_member(&result.crs));
    if let Some(classification) = &result.classification {
        foreign_members.insert(
            "coordinate_info".to_string(),
            serde_json::to_value(classification)?,
        );
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    })
}

/// Serialize a result bundle to a GeoJSON string.
pub fn to_string(result: &FeatureCollectionResult) -> Result<String> {
    Ok(serde_json::to_string(&to_geojson(result)?)?)
}

/// Write a result bundle to a `.geojson` file.
pub fn write_file(result: &FeatureCollectionResult, path: impl AsRef<std::path::Path>) -> Result<()> {
    std::fs::write(path, to_string(result)?)?;
    Ok(())
}

/// Read a previously written feature collection back into a result bundle.
///
/// A missing `crs` member means the GeoJSON default (WGS84). The
/// `coordinate_info` block is restored when present.
pub fn from_geojson(collection: &FeatureCollection) -> Result<FeatureCollectionResult> {
    let crs = match collection
        .foreign_members
        .as_ref()
        .and_then(|m| m.get("crs"))
        .and_then(|crs| crs.get("properties"))
        .and_then(|props| props.get("name"))
        .and_then(JsonValue::as_str)
    {
        Some(urn) => CrsId::from_urn(urn)?,
        None => CrsId::wgs84(),
    };

    let classification = collection
        .foreign_members
        .as_ref()
        .and_then(|m| m.get("coordinate_info"))
        .map(|v| serde_json::from_value(v.clone()))
        .transpose()?;

    let features = collection
        .features
        .iter()
        .map(feature_from_geojson)
        .collect::<Result<Vec<Feature>>>()?;
    let count = features.len();

    Ok(FeatureCollectionResult {
        features,
        crs,
        classification,
        summary: ConversionSummary {
            entities_seen: count,
            converted: count,
            skipped: 0,
            transform_failures: 0,
        },
        notifications: Vec::new(),
    })
}

/// Parse a GeoJSON string into a result bundle.
pub fn from_str(s: &str) -> Result<FeatureCollectionResult> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| ConvertError::Serialization(e.to_string()))?;
    match geojson {
        GeoJson::FeatureCollection(fc) => from_geojson(&fc),
        other => Err(ConvertError::Serialization(format!(
            "expected a FeatureCollection, got {other:?}"
        ))),
    }
}

/// Read a result bundle from a `.geojson` file.
pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<FeatureCollectionResult> {
    from_str(&std::fs::read_to_string(path)?)
}

fn crs_member(crs: &CrsId) -> JsonValue {
    serde_json::json!({
        "type": "name",
        "properties": { "name": crs.urn() }
    })
}

fn feature_to_geojson(feature: &Feature) -> geojson::Feature {
    let geometry = geo_types::Geometry::from(feature.geometry.clone());

    let mut properties = JsonObject::new();
    properties.insert("layer".to_string(), feature.layer.clone().into());
    properties.insert("entity_type".to_string(), feature.entity_type.clone().into());
    properties.insert("color".to_string(), feature.color.into());

    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn feature_from_geojson(feature: &geojson::Feature) -> Result<Feature> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| ConvertError::Serialization("feature without geometry".to_string()))?;
    let geometry: geo_types::Geometry<f64> = geometry
        .clone()
        .try_into()
        .map_err(|e: geojson::Error| ConvertError::Serialization(e.to_string()))?;
    let geometry = match geometry {
        geo_types::Geometry::Point(p) => Geometry::Point(p),
        geo_types::Geometry::LineString(ls) => Geometry::LineString(ls),
        geo_types::Geometry::Polygon(p) => Geometry::Polygon(p),
        other => {
            return Err(ConvertError::Serialization(format!(
                "unsupported geometry type in feature collection: {other:?}"
            )))
        }
    };

    let get_str = |key: &str| {
        feature
            .properties
            .as_ref()
            .and_then(|p| p.get(key))
            .and_then(JsonValue::as_str)
            .map(str::to_string)
    };
    let layer = get_str("layer").unwrap_or_else(|| "0".to_string());
    let entity_type = get_str("entity_type").unwrap_or_else(|| "UNKNOWN".to_string());
    let color = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("color"))
        .and_then(JsonValue::as_i64)
        .map(|c| c as i32)
        .unwrap_or(COLOR_BY_LAYER);

    Ok(Feature::new(geometry, layer, entity_type).with_color(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::CrsId;
    use crate::entities::RawEntity;
    use crate::pipeline::{ConvertOptions, ConversionPipeline};

    fn sample_result() -> FeatureCollectionResult {
        let entities = vec![
            RawEntity::line(0.0, 0.0, 10.0, 10.0).on_layer("A"),
            RawEntity::circle(5.0, 5.0, 2.0).on_layer("B").with_color(1),
            RawEntity::point(7.0, 7.0).on_layer("A"),
        ];
        let options = ConvertOptions {
            target_crs: CrsId::wgs84(),
            source_crs: Some(CrsId::wgs84()),
            strict: false,
        };
        ConversionPipeline::convert(&entities, &options).unwrap()
    }

    #[test]
    fn test_output_carries_urn_crs_member() {
        let fc = to_geojson(&sample_result()).unwrap();
        let members = fc.foreign_members.unwrap();
        assert_eq!(
            members["crs"]["properties"]["name"],
            "urn:ogc:def:crs:EPSG::4326"
        );
        assert!(members.contains_key("coordinate_info"));
    }

    #[test]
    fn test_feature_properties_round_trip() {
        let result = sample_result();
        let restored = from_str(&to_string(&result).unwrap()).unwrap();

        assert_eq!(restored.features.len(), result.features.len());
        assert_eq!(restored.crs, result.crs);
        for (a, b) in restored.features.iter().zip(result.features.iter()) {
            assert_eq!(a.layer, b.layer);
            assert_eq!(a.entity_type, b.entity_type);
            assert_eq!(a.color, b.color);
            assert_eq!(a.geometry.kind(), b.geometry.kind());
        }
    }

    #[test]
    fn test_classification_round_trips() {
        let result = sample_result();
        let restored = from_str(&to_string(&result).unwrap()).unwrap();
        assert_eq!(restored.classification, result.classification);
    }

    #[test]
    fn test_missing_crs_defaults_to_wgs84() {
        let s = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,2.0]},"properties":{}}
        ]}"#;
        let restored = from_str(s).unwrap();
        assert_eq!(restored.crs, CrsId::wgs84());
        assert_eq!(restored.features[0].layer, "0");
    }

    #[test]
    fn test_non_collection_input_is_rejected() {
        let s = r#"{"type":"Point","coordinates":[1.0,2.0]}"#;
        assert!(from_str(s).is_err());
    }
}
