//! Shear geometry and the per-column resampler
//!
//! Shearing displaces each sample upward by `(z - ref) * elevation_scale`.
//! The displaced profile is irregular and can fold where slopes are steep,
//! so each column is resampled back onto the uniform row spacing by walking
//! a monotone anchor up the column: only ever-higher displaced positions
//! become interpolation brackets, which is equivalent to taking the upper
//! envelope of the sheared profile.

use ndarray::ArrayView1;
use planoblique_core::{Error, Result};

/// Scale factor and padding derived from the grid's elevation range and the
/// inclination angle.
#[derive(Debug, Clone, Copy)]
pub struct ShearGeometry {
    /// Vertical displacement per unit of elevation above the reference
    pub elevation_scale: f64,
    /// Reference elevation (the grid minimum); samples at this height do
    /// not move
    pub ref_elevation: f64,
    /// Rows prepended to accommodate the largest upward displacement
    pub pad_rows: usize,
}

impl ShearGeometry {
    /// Derive the shear geometry for an inclination angle in degrees.
    ///
    /// The angle must lie in `(0, 90]`: smaller angles shear more, 90°
    /// degenerates to the identity. Angles beyond 90° would displace the
    /// terrain downward and are rejected.
    pub fn new(
        angle: f64,
        min_elevation: f64,
        max_elevation: f64,
        pixel_height: f64,
    ) -> Result<Self> {
        if !angle.is_finite() || angle <= 0.0 || angle > 90.0 {
            return Err(Error::InvalidAngle { angle });
        }

        let elevation_scale = 1.0 / angle.to_radians().tan();
        if !elevation_scale.is_finite() {
            return Err(Error::InvalidAngle { angle });
        }

        let max_dy = (max_elevation - min_elevation) * elevation_scale;
        let pad_rows = (max_dy / pixel_height.abs()).floor() as usize + 1;

        Ok(Self {
            elevation_scale,
            ref_elevation: min_elevation,
            pad_rows,
        })
    }

    /// The y position a sample at `y` with elevation `z` is displaced to
    #[inline]
    fn sheared_y(&self, y: f64, z: f64) -> f64 {
        y + (z - self.ref_elevation) * self.elevation_scale
    }
}

/// Resample one sheared column back onto the uniform row spacing.
///
/// `column` is a padded-grid column with NaN marking absent samples, row 0
/// on top. `origin_y` and `row_step` define the unsheared y coordinate of
/// each row (`y = origin_y - row * row_step`). The returned vector has the
/// same length; NaN marks output rows where the sheared surface is
/// undefined.
///
/// Rows below the displaced surface (nothing shears into view there) and
/// rows whose bracket would span a data gap resolve to NaN. The source
/// cursor only ever moves upward, so the whole column is a single pass.
pub(crate) fn resample_column(
    column: ArrayView1<'_, f64>,
    origin_y: f64,
    row_step: f64,
    geometry: &ShearGeometry,
) -> Vec<f64> {
    let rows = column.len();
    let mut out = vec![f64::NAN; rows];

    // Bottom margin: trailing empty rows stay empty; the lowest valid
    // sample anchors the walk.
    let mut cursor = rows as isize - 1;
    while cursor >= 0 && column[cursor as usize].is_nan() {
        cursor -= 1;
    }
    if cursor < 0 {
        return out;
    }
    let anchor_row = cursor as usize;

    // The anchor starts at the unsheared position of the lowest valid
    // sample with no elevation attached yet: output rows underneath the
    // displaced surface resolve to NaN until a sample is consumed.
    let mut anchor_y = origin_y - anchor_row as f64 * row_step;
    let mut anchor_z: Option<f64> = None;

    for target in (0..=anchor_row).rev() {
        let target_y = origin_y - target as f64 * row_step;

        loop {
            if cursor < 0 {
                // No source sample left above: top margin
                break;
            }
            let z = column[cursor as usize];

            if z.is_nan() {
                // Data gap: this target resolves empty, and the anchor
                // disarms until the profile above the gap climbs past its
                // last position.
                while cursor >= 0 && column[cursor as usize].is_nan() {
                    cursor -= 1;
                }
                anchor_z = None;
                break;
            }

            let sheared_y = geometry.sheared_y(origin_y - cursor as f64 * row_step, z);

            if sheared_y > target_y {
                // Bracket found; the bracket sample is re-examined for the
                // next target.
                if let Some(az) = anchor_z {
                    let w = (target_y - anchor_y) / (sheared_y - anchor_y);
                    out[target] = w * z + (1.0 - w) * az;
                }
                break;
            }

            // Consume the sample; only ever-higher displaced positions
            // become anchors, so folds never step the interpolation
            // backward.
            if sheared_y >= anchor_y {
                anchor_y = sheared_y;
                anchor_z = Some(z);
            }
            cursor -= 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn geometry_45(min: f64, max: f64) -> ShearGeometry {
        ShearGeometry::new(45.0, min, max, -1.0).unwrap()
    }

    #[test]
    fn rejects_out_of_range_angles() {
        for angle in [0.0, -15.0, 90.5, 180.0, f64::NAN] {
            let err = ShearGeometry::new(angle, 0.0, 100.0, -1.0).unwrap_err();
            assert!(matches!(err, Error::InvalidAngle { .. }), "angle {angle}");
        }
    }

    #[test]
    fn forty_five_degrees_is_unit_scale() {
        let geom = geometry_45(0.0, 10.0);
        assert_relative_eq!(geom.elevation_scale, 1.0, epsilon = 1e-12);
        assert_relative_eq!(geom.ref_elevation, 0.0);
        assert_eq!(geom.pad_rows, 11);
    }

    #[test]
    fn ninety_degrees_degenerates_to_identity() {
        let geom = ShearGeometry::new(90.0, 0.0, 1000.0, -1.0).unwrap();
        assert!(geom.elevation_scale.abs() < 1e-12);
        assert_eq!(geom.pad_rows, 1);
    }

    #[test]
    fn pad_rows_grow_as_the_angle_flattens() {
        let mut last = 0;
        for angle in [90.0, 60.0, 45.0, 30.0, 10.0, 2.0] {
            let geom = ShearGeometry::new(angle, 0.0, 50.0, -1.0).unwrap();
            assert!(
                geom.pad_rows >= last,
                "pad_rows shrank at angle {angle}: {} < {last}",
                geom.pad_rows
            );
            last = geom.pad_rows;
        }
    }

    #[test]
    fn pad_rows_scale_with_pixel_height() {
        let coarse = ShearGeometry::new(45.0, 100.0, 350.0, -25.0).unwrap();
        assert_eq!(coarse.pad_rows, 11);
        let fine = ShearGeometry::new(45.0, 100.0, 350.0, -5.0).unwrap();
        assert_eq!(fine.pad_rows, 51);
    }

    fn resample(samples: &[f64], origin_y: f64, geometry: &ShearGeometry) -> Vec<f64> {
        let column = Array1::from(samples.to_vec());
        resample_column(column.view(), origin_y, 1.0, geometry)
    }

    #[test]
    fn empty_column_stays_empty() {
        let geom = geometry_45(0.0, 10.0);
        let out = resample(&[f64::NAN, f64::NAN, f64::NAN], 3.0, &geom);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn flat_column_at_reference_is_unchanged() {
        let geom = geometry_45(0.0, 10.0);
        // Rows at the reference elevation do not move; only the top sample
        // has no bracket above and drops out.
        let out = resample(&[f64::NAN, 0.0, 0.0, 0.0], 3.0, &geom);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_relative_eq!(out[2], 0.0);
        assert_relative_eq!(out[3], 0.0);
    }

    #[test]
    fn ramp_interpolates_the_displaced_profile() {
        // Padded 3-sample ramp, elevations 0/5/10, unit scale. The sheared
        // surface spans 12 rows; values interpolate linearly in between.
        let mut samples = vec![f64::NAN; 11];
        samples.extend([10.0, 5.0, 0.0]);
        let out = resample(&samples, 3.0, &geometry_45(0.0, 10.0));

        assert_relative_eq!(out[13], 0.0);
        assert_relative_eq!(out[12], 5.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(out[7], 5.0, epsilon = 1e-12);
        assert_relative_eq!(out[6], 5.0 + 5.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(out[2], 5.0 + 25.0 / 6.0, epsilon = 1e-12);
        // The top sample lands exactly on a row line and is consumed as an
        // anchor; above it only padding remains.
        assert!(out[1].is_nan());
        assert!(out[0].is_nan());
    }

    #[test]
    fn rising_profile_stays_monotone() {
        let geom = geometry_45(0.0, 6.0);
        let out = resample(&[6.0, 5.0, 4.0, 3.0, 1.0, 0.5, 0.0], 7.0, &geom);

        let valid: Vec<f64> = out.iter().rev().copied().filter(|v| !v.is_nan()).collect();
        assert!(!valid.is_empty());
        for pair in valid.windows(2) {
            assert!(
                pair[1] >= pair[0] - 1e-12,
                "profile folded: {} then {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn gap_widens_through_the_shear() {
        let geom = geometry_45(0.0, 6.0);
        let samples = [6.0, 5.0, 4.0, f64::NAN, 1.0, 0.5, 0.0];
        let out = resample(&samples, 7.0, &geom);

        assert_relative_eq!(out[6], 0.0);
        assert_relative_eq!(out[5], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(out[4], 2.0 / 3.0, epsilon = 1e-12);
        // The single-row gap shadows every target whose bracket would span
        // it: at least as wide as the source gap.
        let nan_run = out.iter().filter(|v| v.is_nan()).count();
        assert!(nan_run >= 1);
        assert!(out[3].is_nan());
        assert!(out[2].is_nan());
    }

    #[test]
    fn single_valid_sample_has_no_bracket() {
        // One sample cannot form an interpolation bracket; the column
        // resolves empty.
        let geom = geometry_45(5.0, 5.0);
        let out = resample(&[f64::NAN, f64::NAN, 5.0, f64::NAN], 4.0, &geom);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn column_above_the_reference_leaves_a_void_below() {
        // Column minimum sits above the grid reference: the whole column is
        // displaced upward and the vacated bottom rows stay empty.
        let geom = geometry_45(0.0, 10.0);
        let mut samples = vec![f64::NAN; 4];
        samples.extend([4.0, 3.0, 2.0]);
        let out = resample(&samples, 7.0, &geom);

        // Bottom sample displaced 2 rows up: rows below its new position
        // resolve empty.
        assert!(out[6].is_nan());
        assert!(out[5].is_nan());
        assert_relative_eq!(out[4], 2.0);
        assert_relative_eq!(out[3], 2.5, epsilon = 1e-12);
        assert_relative_eq!(out[2], 3.0, epsilon = 1e-12);
    }
}
