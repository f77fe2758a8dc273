//! Projection metadata, carried through the transform unmodified

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate reference system of a raster.
///
/// The shearing core never interprets the projection; it is read from the
/// source raster and written back to the output as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    /// WKT representation, if the source carried one
    wkt: Option<String>,
    /// EPSG code, if known
    epsg: Option<u32>,
}

impl Crs {
    /// Create a Crs from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
        }
    }

    /// Create a Crs from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
        }
    }

    /// Get the EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get the WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Get a short string identifier for this Crs
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            return format!("WKT:{}", &wkt[..wkt.len().min(50)]);
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsg_identifier() {
        let crs = Crs::from_epsg(32719);
        assert_eq!(crs.epsg(), Some(32719));
        assert_eq!(crs.identifier(), "EPSG:32719");
    }

    #[test]
    fn wkt_identifier_is_truncated() {
        let wkt = "PROJCS[".to_string() + &"x".repeat(100) + "]";
        let crs = Crs::from_wkt(wkt);
        assert!(crs.identifier().len() <= 54);
    }
}
