//! End-to-end scenarios for plan-oblique shearing on synthetic DEMs.
//!
//! The fixtures are generated in-process: a conical hill for realistic
//! slope/occlusion behavior and small hand-built grids for the geometric
//! invariants. No binary fixtures are required.

use approx::assert_relative_eq;
use planoblique_algorithms::terrain::{plan_oblique, PlanObliqueParams};
use planoblique_core::io::{read_geotiff_from_buffer, write_geotiff_to_buffer};
use planoblique_core::raster::Raster;
use planoblique_core::{Error, GeoTransform};

/// A 64x64 conical hill rising 20 units above a zero plain.
fn conical_hill() -> Raster<f64> {
    let size = 64usize;
    let mut dem: Raster<f64> = Raster::new(size, size);
    dem.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
    dem.set_nodata(Some(f64::NAN));

    let center = (size / 2) as f64;
    for row in 0..size {
        for col in 0..size {
            let dr = row as f64 - center;
            let dc = col as f64 - center;
            let z = (20.0 - (dr * dr + dc * dc).sqrt() * 0.8).max(0.0);
            dem.set(row, col, z).unwrap();
        }
    }
    dem
}

#[test]
fn hill_shears_into_a_fully_populated_band() {
    let dem = conical_hill();
    let result = plan_oblique(&dem, PlanObliqueParams { angle: 30.0 }).unwrap();

    // width untouched, height bounded by the padded frame
    assert_eq!(result.cols(), 64);
    assert!(result.rows() >= 32, "band too small: {}", result.rows());
    assert!(result.rows() < 64 + 36, "band never trimmed");

    // the trimmed band holds no gaps at all
    let stats = result.statistics();
    assert_eq!(stats.nodata_count, 0);

    // shearing redistributes rows, not elevations
    assert_relative_eq!(stats.min.unwrap(), 0.0, epsilon = 1e-9);
    assert!(stats.max.unwrap() <= 20.0 + 1e-9);
    assert!(stats.max.unwrap() > 15.0, "summit lost: {:?}", stats.max);
}

#[test]
fn flatter_angles_stretch_the_band() {
    // A uniform south-facing ramp: every column rises from 0 at the bottom
    // edge, so the band height tracks the summit displacement directly.
    let mut dem: Raster<f64> = Raster::new(64, 16);
    dem.set_transform(GeoTransform::new(0.0, 64.0, 1.0, -1.0));
    dem.set_nodata(Some(f64::NAN));
    for row in 0..64 {
        for col in 0..16 {
            dem.set(row, col, (63 - row) as f64 * 0.5).unwrap();
        }
    }

    let steep = plan_oblique(&dem, PlanObliqueParams { angle: 60.0 }).unwrap();
    let flat = plan_oblique(&dem, PlanObliqueParams { angle: 30.0 }).unwrap();

    // more shear displaces the summit further upward
    assert!(
        flat.rows() > steep.rows(),
        "30\u{b0} band {} not taller than 60\u{b0} band {}",
        flat.rows(),
        steep.rows()
    );
    assert!(steep.rows() > 64, "shear should extend the ramp band");
}

#[test]
fn north_slopes_hide_behind_the_summit() {
    // A south-facing ramp up to a cliff: the fold in the sheared profile
    // must not produce backward-stepping values.
    let mut dem: Raster<f64> = Raster::new(32, 8);
    dem.set_transform(GeoTransform::new(0.0, 32.0, 1.0, -1.0));
    dem.set_nodata(Some(f64::NAN));
    for row in 0..32 {
        for col in 0..8 {
            // rises from the south, drops sharply north of row 8
            let z = if row >= 8 {
                (31 - row) as f64
            } else {
                row as f64 * 2.0
            };
            dem.set(row, col, z).unwrap();
        }
    }

    let result = plan_oblique(&dem, PlanObliqueParams { angle: 45.0 }).unwrap();

    for col in 0..result.cols() {
        for row in 1..result.rows() {
            let upper = result.get(row - 1, col).unwrap();
            let lower = result.get(row, col).unwrap();
            assert!(
                upper >= lower - 1e-9,
                "column {col} folds at row {row}: {upper} < {lower}"
            );
        }
    }
}

#[test]
fn shear_after_io_roundtrip() {
    let dem = conical_hill();

    // through the serialized representation and back
    let bytes = write_geotiff_to_buffer(&dem, None).unwrap();
    let reloaded: Raster<f64> = read_geotiff_from_buffer(&bytes, None).unwrap();
    let result = plan_oblique(&reloaded, PlanObliqueParams { angle: 45.0 }).unwrap();

    // georeferencing carried through shear and serialization
    assert_relative_eq!(result.transform().origin_x, 0.0);
    assert_relative_eq!(result.transform().pixel_width, 1.0);
    assert!(result.transform().origin_y <= 64.0);

    let written = write_geotiff_to_buffer(&result, None).unwrap();
    let reread: Raster<f64> = read_geotiff_from_buffer(&written, None).unwrap();
    assert_eq!(reread.shape(), result.shape());
    assert_relative_eq!(
        reread.transform().origin_y,
        result.transform().origin_y,
        epsilon = 1e-6
    );
}

#[test]
fn interior_gaps_shadow_the_output() {
    let mut dem = conical_hill();
    // punch a hole into the south slope
    for row in 40..43 {
        for col in 30..34 {
            dem.set(row, col, f64::NAN).unwrap();
        }
    }

    let with_gap = plan_oblique(&dem, PlanObliqueParams { angle: 45.0 }).unwrap();
    let intact = plan_oblique(&conical_hill(), PlanObliqueParams { angle: 45.0 }).unwrap();

    // the shadow of the gap can only shrink the fully populated band
    assert!(with_gap.rows() <= intact.rows());
}

#[test]
fn degenerate_grids_fail_eagerly() {
    let empty: Raster<f64> = Raster::filled(4, 4, f64::NAN);
    assert!(matches!(
        plan_oblique(&empty, PlanObliqueParams::default()),
        Err(Error::EmptyGrid)
    ));

    let dem = conical_hill();
    assert!(matches!(
        plan_oblique(&dem, PlanObliqueParams { angle: 135.0 }),
        Err(Error::InvalidAngle { .. })
    ));
}
