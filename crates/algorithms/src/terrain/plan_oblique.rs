//! Plan-oblique relief shearing
//!
//! Produces the classic raised-relief map effect: the DEM is sheared along
//! the vertical map axis, each sample displaced upward in proportion to its
//! height above the grid minimum, and the result is resampled onto the
//! original row spacing and cropped to the rows the sheared surface fully
//! covers.

use crate::maybe_rayon::*;
use crate::terrain::shear::{resample_column, ShearGeometry};
use crate::terrain::trim::trim_to_valid_band;
use ndarray::Array2;
use planoblique_core::raster::Raster;
use planoblique_core::{Algorithm, Error, Result};

/// Parameters for plan-oblique shearing
#[derive(Debug, Clone)]
pub struct PlanObliqueParams {
    /// Inclination angle in degrees, in `(0, 90]`. Smaller angles shear
    /// more; 90° leaves the terrain flat.
    pub angle: f64,
}

impl Default for PlanObliqueParams {
    fn default() -> Self {
        Self { angle: 45.0 }
    }
}

/// Plan-oblique relief algorithm
#[derive(Debug, Clone, Default)]
pub struct PlanOblique;

impl Algorithm for PlanOblique {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = PlanObliqueParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "PlanOblique"
    }

    fn description(&self) -> &'static str {
        "Shear a DEM along the vertical axis for a plan-oblique relief view"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        plan_oblique(&input, params)
    }
}

/// Shear a DEM into a plan-oblique relief grid.
///
/// The grid is enlarged by the padding the maximum displacement requires,
/// every column is resampled independently, and the result is trimmed to
/// the fully populated row band with the vertical origin adjusted by the
/// rows removed from the top.
///
/// # Arguments
/// * `dem` - Input DEM raster (band values in the vertical unit of the CRS)
/// * `params` - Inclination angle
///
/// # Errors
/// `EmptyGrid` when the input has no valid sample, `InvalidAngle` for
/// angles outside `(0, 90]`, `NoValidBand` when no output row ends up fully
/// populated.
pub fn plan_oblique(dem: &Raster<f64>, params: PlanObliqueParams) -> Result<Raster<f64>> {
    let (rows, cols) = dem.shape();
    if rows == 0 || cols == 0 {
        return Err(Error::EmptyGrid);
    }

    let stats = dem.statistics();
    let (min, max) = match (stats.min, stats.max) {
        (Some(min), Some(max)) => (min, max),
        _ => return Err(Error::EmptyGrid),
    };

    let geometry = ShearGeometry::new(params.angle, min, max, dem.transform().pixel_height)?;
    let padded = padded_elevations(dem, geometry.pad_rows);

    let origin_y = dem.transform().origin_y;
    let row_step = dem.transform().pixel_height.abs();

    // Columns are mutually independent: disjoint writes, shared read-only
    // geometry.
    let columns: Vec<Vec<f64>> = (0..cols)
        .into_par_iter()
        .map(|col| resample_column(padded.column(col), origin_y, row_step, &geometry))
        .collect();

    let mut sheared = Array2::from_elem((rows + geometry.pad_rows, cols), f64::NAN);
    for (col, values) in columns.into_iter().enumerate() {
        for (row, value) in values.into_iter().enumerate() {
            sheared[(row, col)] = value;
        }
    }

    let mut resampled = Raster::from_array(sheared);
    resampled.set_transform(*dem.transform());
    resampled.set_crs(dem.crs().cloned());
    resampled.set_nodata(Some(f64::NAN));

    trim_to_valid_band(&resampled)
}

/// Enlarged working copy: `pad_rows` empty rows on top, the source samples
/// below, NaN as the working sentinel whatever the source convention.
fn padded_elevations(dem: &Raster<f64>, pad_rows: usize) -> Array2<f64> {
    let (rows, cols) = dem.shape();
    let mut padded = Array2::from_elem((rows + pad_rows, cols), f64::NAN);

    for row in 0..rows {
        for col in 0..cols {
            if let Some(z) = dem.valid(row, col) {
                padded[(row + pad_rows, col)] = z;
            }
        }
    }

    padded
}
