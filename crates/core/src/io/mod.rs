//! Reading and writing single-band elevation rasters
//!
//! Two backends share the same public signatures: GDAL (feature `gdal`,
//! full GeoTIFF metadata fidelity) and a native reader/writer built on the
//! `tiff` crate (default, no system dependency).

#[cfg(feature = "gdal")]
mod gdal_io;
mod native;

#[cfg(feature = "gdal")]
pub use gdal_io::{read_geotiff, write_geotiff};

#[cfg(not(feature = "gdal"))]
pub use native::{read_geotiff, write_geotiff};

// Buffer-based I/O (always available, no filesystem dependency)
pub use native::{read_geotiff_from_buffer, write_geotiff_to_buffer};

/// Where a GeoTIFF's spatial reference is taken from.
///
/// Explicit per-call configuration; there is no ambient process state
/// involved. Only the GDAL backend interprets it (the native backend does
/// not decode projections).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SrsSource {
    /// Let the driver decide (its built-in precedence)
    #[default]
    Auto,
    /// Prefer the EPSG register over the file's geokeys
    Epsg,
    /// Prefer the geokeys embedded in the file
    GeoKeys,
}

#[cfg(feature = "gdal")]
impl SrsSource {
    /// The GTiff dataset open option for this choice, if any
    pub(crate) fn as_gdal_option(self) -> Option<&'static str> {
        match self {
            SrsSource::Auto => None,
            SrsSource::Epsg => Some("GTIFF_SRS_SOURCE=EPSG"),
            SrsSource::GeoKeys => Some("GTIFF_SRS_SOURCE=GEOKEYS"),
        }
    }
}

/// Options for reading GeoTIFF files
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Band number (1-indexed)
    pub band: usize,
    /// Spatial reference source
    pub srs_source: SrsSource,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            band: 1,
            srs_source: SrsSource::Auto,
        }
    }
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone)]
pub struct GeoTiffOptions {
    /// Compression type: "DEFLATE", "LZW", "ZSTD", "NONE"
    pub compression: String,
    /// Tile size for tiled TIFFs (0 for strips)
    pub tile_size: usize,
    /// BigTIFF for files > 4GB
    pub bigtiff: bool,
}

impl Default for GeoTiffOptions {
    fn default() -> Self {
        Self {
            compression: "DEFLATE".to_string(),
            tile_size: 256,
            bigtiff: false,
        }
    }
}
