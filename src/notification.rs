//! Conversion notification / diagnostic system.
//!
//! Non-fatal issues encountered while building geometries or transforming a
//! batch are collected as `Notification` items rather than being silently
//! dropped or causing hard errors.
//!
//! After a conversion the caller can inspect
//! [`FeatureCollectionResult::notifications`](crate::pipeline::FeatureCollectionResult)
//! to see what was encountered.

use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// An entity type is outside the supported set and was ignored.
    UnsupportedEntity,
    /// An entity was dropped after validation or construction failed.
    EntitySkipped,
    /// A geometry fell back to a simpler shape (e.g. Polygon -> LineString).
    GeometryDowngraded,
    /// A geometry could not be transformed; the original was retained.
    TransformFailed,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedEntity => write!(f, "UnsupportedEntity"),
            Self::EntitySkipped => write!(f, "EntitySkipped"),
            Self::GeometryDowngraded => write!(f, "GeometryDowngraded"),
            Self::TransformFailed => write!(f, "TransformFailed"),
        }
    }
}

/// A single notification produced during conversion or transformation.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The severity / category.
    pub notification_type: NotificationType,
    /// A human-readable description of the issue.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_display() {
        let n = Notification::new(
            NotificationType::EntitySkipped,
            "skipped invalid CIRCLE on layer '0': radius must be > 0",
        );
        assert_eq!(
            n.to_string(),
            "[EntitySkipped] skipped invalid CIRCLE on layer '0': radius must be > 0"
        );
    }
}
