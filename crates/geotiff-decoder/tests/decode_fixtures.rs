//! Decode tests against in-memory encoded GeoTIFF fixtures.

use geotiff_decoder::{decode, SampleFormat};
use test_utils::{
    constant_grid, encode_geotiff_f64, encode_geotiff_f64_tiled, encode_geotiff_u16,
    sequential_grid,
};

#[test]
fn test_decode_f64_strip_with_geo_metadata() {
    let grid = sequential_grid(4, 3);
    let bytes = encode_geotiff_f64(&grid, 4, 3, (102.0, 15.0), (0.25, 0.25), Some(-1.5));
    let (image, pixels) = decode(&bytes).unwrap();

    assert_eq!(image.width, 4);
    assert_eq!(image.height, 3);
    assert_eq!(image.bits_per_sample, 64);
    assert_eq!(image.sample_format, SampleFormat::Float);
    assert_eq!(image.pixel_scale, Some([0.25, 0.25, 0.0]));
    assert_eq!(image.no_data, Some(-1.5));

    let tie = image.tie_point.unwrap();
    assert_eq!((tie.x, tie.y), (102.0, 15.0));

    assert_eq!(pixels.data, grid);

    let extent = image.geo_extent().unwrap();
    assert_eq!(extent.min_x, 102.0);
    assert_eq!(extent.max_y, 15.0);
    assert_eq!(extent.max_x, 103.0);
    assert_eq!(extent.min_y, 14.25);
}

#[test]
fn test_decode_u16_strip() {
    let values: Vec<u16> = (0..6).map(|v| v * 1000).collect();
    let bytes = encode_geotiff_u16(&values, 3, 2, (0.0, 2.0), (1.0, 1.0));
    let (image, pixels) = decode(&bytes).unwrap();

    assert_eq!(image.sample_format, SampleFormat::UnsignedInt);
    assert_eq!(image.bits_per_sample, 16);
    assert_eq!(pixels.data, vec![0.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0]);
}

#[test]
fn test_decode_tiled_clips_edge_tiles() {
    // 5x5 image with 4x4 tiles: the right and bottom tiles carry padding
    // that must not leak into the output buffer.
    let grid = sequential_grid(5, 5);
    let bytes = encode_geotiff_f64_tiled(&grid, 5, 5, 4, 4, (0.0, 5.0), (1.0, 1.0));
    let (image, pixels) = decode(&bytes).unwrap();

    assert_eq!(image.width, 5);
    assert_eq!(image.height, 5);
    assert_eq!(pixels.data, grid);
}

#[test]
fn test_decode_constant_grid() {
    let grid = constant_grid(8, 8, 2.5);
    let bytes = encode_geotiff_f64(&grid, 8, 8, (0.0, 8.0), (1.0, 1.0), None);
    let (image, pixels) = decode(&bytes).unwrap();

    assert_eq!(image.no_data, None);
    assert!(pixels.data.iter().all(|&v| v == 2.5));
}
