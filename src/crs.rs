//! Coordinate reference system identifiers.
//!
//! CAD drawings carry no CRS metadata, so the pipeline only ever *selects
//! and propagates* an identifier; it never interprets one beyond handing it
//! to the projection engine. Identifiers come in as `"AUTHORITY:CODE"`
//! strings (`"EPSG:4326"`, bare `"4326"` defaults to EPSG) and go out in the
//! URN form feature-collection metadata uses
//! (`urn:ogc:def:crs:EPSG::4326`).

use std::fmt;
use std::str::FromStr;

use crate::error::{ConvertError, Result};

/// A parsed CRS identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrsId {
    authority: String,
    code: u32,
}

impl CrsId {
    /// WGS84 geographic, the conventional conversion target.
    pub fn wgs84() -> Self {
        CrsId {
            authority: "EPSG".to_string(),
            code: 4326,
        }
    }

    /// Build from an EPSG code.
    pub fn epsg(code: u32) -> Self {
        CrsId {
            authority: "EPSG".to_string(),
            code,
        }
    }

    /// The authority part (`"EPSG"`).
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The numeric code part.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// URN form used in feature-collection metadata,
    /// e.g. `urn:ogc:def:crs:EPSG::4326`.
    pub fn urn(&self) -> String {
        format!("urn:ogc:def:crs:{}::{}", self.authority, self.code)
    }

    /// Parse the URN form back into an identifier.
    pub fn from_urn(urn: &str) -> Result<Self> {
        let rest = urn
            .strip_prefix("urn:ogc:def:crs:")
            .ok_or_else(|| ConvertError::UnknownCrs(urn.to_string()))?;
        let (authority, code) = rest
            .split_once("::")
            .ok_or_else(|| ConvertError::UnknownCrs(urn.to_string()))?;
        let code = code
            .parse::<u32>()
            .map_err(|_| ConvertError::UnknownCrs(urn.to_string()))?;
        if authority.is_empty() {
            return Err(ConvertError::UnknownCrs(urn.to_string()));
        }
        Ok(CrsId {
            authority: authority.to_ascii_uppercase(),
            code,
        })
    }

    /// Resolve this identifier to a projection via the EPSG registry.
    ///
    /// Only the EPSG authority is resolvable; the registry keys codes as
    /// `u16`, so larger codes are reported unknown rather than truncated.
    pub fn to_proj(&self) -> Result<proj4rs::Proj> {
        if self.authority != "EPSG" {
            return Err(ConvertError::UnknownCrs(self.to_string()));
        }
        let code = u16::try_from(self.code)
            .map_err(|_| ConvertError::UnknownCrs(self.to_string()))?;
        let def = crs_definitions::from_code(code)
            .ok_or_else(|| ConvertError::UnknownCrs(self.to_string()))?;
        proj4rs::Proj::from_proj_string(def.proj4)
            .map_err(|e| ConvertError::UnknownCrs(format!("{self}: {e}")))
    }
}

impl fmt::Display for CrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

impl FromStr for CrsId {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConvertError::UnknownCrs("<empty>".to_string()));
        }
        let (authority, code) = match s.split_once(':') {
            Some((a, c)) => (a, c),
            // Bare numeric code defaults to EPSG.
            None => ("EPSG", s),
        };
        if authority.is_empty() {
            return Err(ConvertError::UnknownCrs(s.to_string()));
        }
        let code = code
            .parse::<u32>()
            .map_err(|_| ConvertError::UnknownCrs(s.to_string()))?;
        Ok(CrsId {
            authority: authority.to_ascii_uppercase(),
            code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authority_code() {
        let crs: CrsId = "EPSG:4326".parse().unwrap();
        assert_eq!(crs.authority(), "EPSG");
        assert_eq!(crs.code(), 4326);
    }

    #[test]
    fn test_parse_bare_code_defaults_to_epsg() {
        let crs: CrsId = "3857".parse().unwrap();
        assert_eq!(crs, CrsId::epsg(3857));
    }

    #[test]
    fn test_parse_lowercase_authority() {
        let crs: CrsId = "epsg:2277".parse().unwrap();
        assert_eq!(crs.to_string(), "EPSG:2277");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<CrsId>().is_err());
        assert!("EPSG:".parse::<CrsId>().is_err());
        assert!("EPSG:abc".parse::<CrsId>().is_err());
        assert!(":4326".parse::<CrsId>().is_err());
    }

    #[test]
    fn test_urn_round_trip() {
        let crs = CrsId::epsg(8782);
        assert_eq!(crs.urn(), "urn:ogc:def:crs:EPSG::8782");
        assert_eq!(CrsId::from_urn(&crs.urn()).unwrap(), crs);
    }

    #[test]
    fn test_to_proj_resolves_wgs84() {
        let proj = CrsId::wgs84().to_proj().unwrap();
        assert!(proj.is_latlong());
    }

    #[test]
    fn test_to_proj_rejects_unknown_code() {
        assert!(CrsId::epsg(999_999).to_proj().is_err());
    }
}
