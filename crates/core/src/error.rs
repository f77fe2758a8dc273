//! Error types for planoblique

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for planoblique operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid shear angle {angle}\u{b0}: inclination must lie in (0, 90]")]
    InvalidAngle { angle: f64 },

    #[error("raster contains no valid elevation samples")]
    EmptyGrid,

    #[error("sheared raster contains no fully populated row band")]
    NoValidBand,

    #[error("cannot open raster {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("cannot create raster {path}: {reason}")]
    Create { path: PathBuf, reason: String },

    #[error("failed writing raster data: {0}")]
    Write(String),

    #[error("unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("GDAL error: {0}")]
    #[cfg(feature = "gdal")]
    Gdal(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for Error {
    fn from(e: gdal::errors::GdalError) -> Self {
        Error::Gdal(e.to_string())
    }
}

/// Result type alias for planoblique operations
pub type Result<T> = std::result::Result<T, Error>;
