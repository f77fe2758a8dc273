//! GeoTIFF reading and writing using GDAL

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::io::{GeoTiffOptions, ReadOptions};
use crate::raster::{GeoTransform, Raster, RasterElement};
use gdal::raster::{Buffer, GdalType, RasterCreationOption};
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DatasetOptions, DriverManager};
use std::path::Path;

/// Read a GeoTIFF file into a Raster
///
/// Reads the requested band (default 1) together with the geotransform,
/// the projection (kept opaque, passed through on write) and the no-data
/// sentinel. `ReadOptions::srs_source` is forwarded to the GTiff driver as
/// a dataset open option, so the choice is scoped to this call.
pub fn read_geotiff<T, P>(path: P, options: Option<ReadOptions>) -> Result<Raster<T>>
where
    T: RasterElement + GdalType,
    P: AsRef<Path>,
{
    let opts = options.unwrap_or_default();

    let mut open_options: Vec<&str> = Vec::new();
    if let Some(source) = opts.srs_source.as_gdal_option() {
        open_options.push(source);
    }

    let dataset = if open_options.is_empty() {
        Dataset::open(path.as_ref())
    } else {
        Dataset::open_ex(
            path.as_ref(),
            DatasetOptions {
                open_options: Some(&open_options),
                ..Default::default()
            },
        )
    }
    .map_err(|e| Error::Open {
        path: path.as_ref().to_path_buf(),
        reason: e.to_string(),
    })?;

    let rasterband = dataset.rasterband(opts.band as isize)?;
    let (cols, rows) = dataset.raster_size();

    let buffer = rasterband.read_as::<T>((0, 0), (cols, rows), (cols, rows), None)?;
    let mut raster = Raster::from_vec(buffer.data, rows, cols)?;

    if let Ok(gt) = dataset.geo_transform() {
        raster.set_transform(GeoTransform::from_gdal(gt));
    }

    if let Ok(srs) = dataset.spatial_ref() {
        if let Ok(code) = srs.auth_code() {
            raster.set_crs(Some(Crs::from_epsg(code as u32)));
        } else if let Ok(wkt) = srs.to_wkt() {
            raster.set_crs(Some(Crs::from_wkt(wkt)));
        }
    }

    if let Some(nodata) = rasterband.no_data_value() {
        if let Some(nd) = num_traits::cast(nodata) {
            raster.set_nodata(Some(nd));
        }
    }

    Ok(raster)
}

/// Write a Raster to a GeoTIFF file
///
/// Creates a single-band raster, sets the geotransform, projection and
/// no-data sentinel, and writes the samples. A failed creation returns
/// `Error::Create` immediately; no further calls touch the dataset.
pub fn write_geotiff<T, P>(
    raster: &Raster<T>,
    path: P,
    options: Option<GeoTiffOptions>,
) -> Result<()>
where
    T: RasterElement + GdalType,
    P: AsRef<Path>,
{
    let opts = options.unwrap_or_default();
    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let (rows, cols) = raster.shape();

    let mut create_options = vec![RasterCreationOption {
        key: "COMPRESS",
        value: &opts.compression,
    }];

    let tile_size = opts.tile_size.to_string();
    if opts.tile_size > 0 {
        create_options.push(RasterCreationOption {
            key: "TILED",
            value: "YES",
        });
        create_options.push(RasterCreationOption {
            key: "BLOCKXSIZE",
            value: &tile_size,
        });
        create_options.push(RasterCreationOption {
            key: "BLOCKYSIZE",
            value: &tile_size,
        });
    }

    if opts.bigtiff {
        create_options.push(RasterCreationOption {
            key: "BIGTIFF",
            value: "YES",
        });
    }

    let mut dataset = driver
        .create_with_band_type_with_options::<T, _>(
            path.as_ref(),
            cols as isize,
            rows as isize,
            1,
            &create_options,
        )
        .map_err(|e| Error::Create {
            path: path.as_ref().to_path_buf(),
            reason: e.to_string(),
        })?;

    dataset.set_geo_transform(&raster.transform().to_gdal())?;

    if let Some(crs) = raster.crs() {
        if let Some(epsg) = crs.epsg() {
            let srs = SpatialRef::from_epsg(epsg)?;
            dataset.set_spatial_ref(&srs)?;
        } else if let Some(wkt) = crs.wkt() {
            let srs = SpatialRef::from_wkt(wkt)?;
            dataset.set_spatial_ref(&srs)?;
        }
    }

    let mut band = dataset.rasterband(1)?;

    if let Some(nodata) = raster.nodata() {
        if let Some(nd) = nodata.to_f64() {
            band.set_no_data_value(Some(nd))?;
        }
    }

    let data: Vec<T> = raster.data().iter().copied().collect();
    let buffer = Buffer::new((cols, rows), data);
    band.write((0, 0), (cols, rows), &buffer)
        .map_err(|e| Error::Write(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_roundtrip() {
        let mut raster: Raster<f32> = Raster::new(100, 100);
        raster.set_transform(GeoTransform::new(0.0, 100.0, 1.0, -1.0));
        raster.set_crs(Some(Crs::from_epsg(4326)));
        raster.set_nodata(Some(-9999.0));

        for i in 0..100 {
            for j in 0..100 {
                raster.set(i, j, (i * 100 + j) as f32).unwrap();
            }
        }

        let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&raster, tmp.path(), None).unwrap();

        let loaded: Raster<f32> = read_geotiff(tmp.path(), None).unwrap();

        assert_eq!(loaded.shape(), raster.shape());
        assert_eq!(loaded.get(50, 50).unwrap(), raster.get(50, 50).unwrap());
        assert_eq!(loaded.nodata(), Some(-9999.0));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = read_geotiff::<f64, _>("/nonexistent/dem.tif", None).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
