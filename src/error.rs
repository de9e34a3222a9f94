//! Error types for dxf2geo conversions

use std::io;
use thiserror::Error;

/// Main error type for dxf2geo operations
#[derive(Debug, Error)]
pub enum ConvertError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error reported by the CAD parser while reading a drawing
    #[error("CAD parse error: {0}")]
    CadParse(String),

    /// An entity failed validation or geometry construction (strict mode only;
    /// in lenient mode the entity is skipped and a notification is recorded)
    #[error("invalid {entity_type} entity on layer '{layer}': {reason}")]
    InvalidEntity {
        entity_type: String,
        layer: String,
        reason: String,
    },

    /// Nothing to convert: either the drawing contained no supported entities
    /// at all, or every supported entity failed validation
    #[error("{}", no_valid_features_message(*seen, *skipped))]
    NoValidFeatures { seen: usize, skipped: usize },

    /// A transform parameter failed validation (e.g. scale factor out of range)
    #[error("invalid transform parameter: {0}")]
    InvalidTransformParameter(String),

    /// A CRS identifier could not be parsed or is not in the EPSG registry
    #[error("unknown CRS identifier: {0}")]
    UnknownCrs(String),

    /// The projection engine could not build a transform for the CRS pair
    #[error("projection setup failed for {source_crs} -> {target_crs}: {reason}")]
    ProjectionSetup {
        source_crs: String,
        target_crs: String,
        reason: String,
    },

    /// A batch transform was handed an empty feature sequence
    #[error("transform input contains no features")]
    EmptyFeatureBatch,

    /// Error serializing or deserializing a feature collection
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

fn no_valid_features_message(seen: usize, skipped: usize) -> String {
    if seen == 0 {
        "no supported entities present in the drawing".to_string()
    } else {
        format!("all {seen} supported entities failed validation ({skipped} skipped)")
    }
}

/// Result type alias for dxf2geo operations
pub type Result<T> = std::result::Result<T, ConvertError>;

impl From<String> for ConvertError {
    fn from(s: String) -> Self {
        ConvertError::Custom(s)
    }
}

impl From<&str> for ConvertError {
    fn from(s: &str) -> Self {
        ConvertError::Custom(s.to_string())
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(e: serde_json::Error) -> Self {
        ConvertError::Serialization(e.to_string())
    }
}
