//! Trimming the resampled grid to its fully populated row band

use planoblique_core::raster::Raster;
use planoblique_core::{Error, Result};

/// Crop a resampled grid to the longest contiguous band of rows in which
/// every column holds a valid value, shifting the vertical origin by the
/// number of rows removed from the top.
///
/// Rows outside the band are the shear margins (and any rows a data gap
/// punched through); a row counts as valid when none of its cells is
/// no-data, regardless of how its values were produced. Fails with
/// `NoValidBand` when no row is fully populated.
pub(crate) fn trim_to_valid_band(raster: &Raster<f64>) -> Result<Raster<f64>> {
    let (start, end) = valid_row_band(raster).ok_or(Error::NoValidBand)?;
    raster.crop_rows(start, end)
}

/// The longest contiguous run of fully populated rows, `[start, end)`.
/// Ties go to the earliest run.
fn valid_row_band(raster: &Raster<f64>) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut run_start: Option<usize> = None;

    for (row, values) in raster.data().outer_iter().enumerate() {
        let full = values.iter().all(|&v| !raster.is_nodata(v));

        if full {
            run_start.get_or_insert(row);
        } else if let Some(start) = run_start.take() {
            best = longer_run(best, (start, row));
        }
    }

    if let Some(start) = run_start {
        best = longer_run(best, (start, raster.rows()));
    }

    best
}

fn longer_run(best: Option<(usize, usize)>, candidate: (usize, usize)) -> Option<(usize, usize)> {
    match best {
        Some((s, e)) if e - s >= candidate.1 - candidate.0 => Some((s, e)),
        _ => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planoblique_core::GeoTransform;

    fn raster_with_rows(rows: &[&[f64]]) -> Raster<f64> {
        let cols = rows[0].len();
        let data: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let mut raster = Raster::from_vec(data, rows.len(), cols).unwrap();
        raster.set_transform(GeoTransform::new(0.0, rows.len() as f64, 1.0, -1.0));
        raster.set_nodata(Some(f64::NAN));
        raster
    }

    const ND: f64 = f64::NAN;

    #[test]
    fn trims_the_empty_margins() {
        let raster = raster_with_rows(&[
            &[ND, ND, ND],
            &[1.0, 2.0, ND],
            &[1.0, 2.0, 3.0],
            &[4.0, 5.0, 6.0],
            &[ND, 8.0, 9.0],
        ]);

        let trimmed = trim_to_valid_band(&raster).unwrap();
        assert_eq!(trimmed.shape(), (2, 3));
        assert_eq!(trimmed.get(0, 0).unwrap(), 1.0);
        assert_eq!(trimmed.get(1, 2).unwrap(), 6.0);
        // two rows removed from the top of a grid whose origin was 5
        assert_eq!(trimmed.transform().origin_y, 3.0);
    }

    #[test]
    fn band_boundaries_touch_invalid_rows() {
        let raster = raster_with_rows(&[
            &[ND, 1.0],
            &[1.0, 2.0],
            &[3.0, 4.0],
            &[5.0, ND],
        ]);

        let (start, end) = valid_row_band(&raster).unwrap();
        assert_eq!((start, end), (1, 3));
        // the rows adjacent to the band each contain a gap
        assert!(raster.get(start - 1, 0).unwrap().is_nan());
        assert!(raster.get(end, 1).unwrap().is_nan());
    }

    #[test]
    fn longest_band_wins() {
        let raster = raster_with_rows(&[
            &[1.0],
            &[ND],
            &[2.0],
            &[3.0],
            &[4.0],
            &[ND],
            &[5.0],
        ]);

        assert_eq!(valid_row_band(&raster), Some((2, 5)));
    }

    #[test]
    fn earliest_band_wins_ties() {
        let raster = raster_with_rows(&[&[1.0], &[ND], &[2.0]]);
        assert_eq!(valid_row_band(&raster), Some((0, 1)));
    }

    #[test]
    fn band_may_reach_the_bottom_edge() {
        let raster = raster_with_rows(&[&[ND], &[1.0], &[2.0]]);
        assert_eq!(valid_row_band(&raster), Some((1, 3)));
    }

    #[test]
    fn no_fully_populated_row_is_an_error() {
        let raster = raster_with_rows(&[&[ND, 1.0], &[2.0, ND]]);
        let err = trim_to_valid_band(&raster).unwrap_err();
        assert!(matches!(err, Error::NoValidBand));
    }

    #[test]
    fn explicit_sentinel_counts_as_a_gap() {
        let mut raster = raster_with_rows(&[&[1.0, 2.0], &[3.0, -9999.0]]);
        raster.set_nodata(Some(-9999.0));
        assert_eq!(valid_row_band(&raster), Some((0, 1)));
    }
}
