//! In-memory GeoTIFF fixtures.
//!
//! Encodes minimal little-endian single-band GeoTIFFs so decoder and
//! loader tests can run without files or network access. Only the
//! layouts the decoder supports are produced: uncompressed samples in a
//! single strip or in a tile grid, with ModelPixelScale / ModelTiepoint
//! geometry tags and an optional GDAL no-data tag.

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_DOUBLE: u16 = 12;

struct Entry {
    tag: u16,
    field_type: u16,
    count: u32,
    value: [u8; 4],
}

fn short(tag: u16, value: u16) -> Entry {
    let mut cell = [0u8; 4];
    cell[..2].copy_from_slice(&value.to_le_bytes());
    Entry {
        tag,
        field_type: TYPE_SHORT,
        count: 1,
        value: cell,
    }
}

fn long(tag: u16, value: u32) -> Entry {
    Entry {
        tag,
        field_type: TYPE_LONG,
        count: 1,
        value: value.to_le_bytes(),
    }
}

fn long_array(tag: u16, count: u32, offset_or_value: u32) -> Entry {
    Entry {
        tag,
        field_type: TYPE_LONG,
        count,
        value: offset_or_value.to_le_bytes(),
    }
}

fn double_array(tag: u16, count: u32, offset: u32) -> Entry {
    Entry {
        tag,
        field_type: TYPE_DOUBLE,
        count,
        value: offset.to_le_bytes(),
    }
}

fn ascii(tag: u16, len: u32, offset: u32) -> Entry {
    Entry {
        tag,
        field_type: TYPE_ASCII,
        count: len,
        value: offset.to_le_bytes(),
    }
}

/// Encode a single-strip f64 GeoTIFF.
///
/// `origin` is the geocoordinate of the upper-left image corner and
/// `pixel_size` the per-axis scale in coordinate units; both feed the
/// ModelTiepoint / ModelPixelScale tags.
pub fn encode_geotiff_f64(
    values: &[f64],
    width: usize,
    height: usize,
    origin: (f64, f64),
    pixel_size: (f64, f64),
    no_data: Option<f64>,
) -> Vec<u8> {
    assert_eq!(values.len(), width * height, "sample count mismatch");

    let sample_bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let data_off = 8u32;
    let ps_off = data_off + sample_bytes.len() as u32;
    let tp_off = ps_off + 24;
    let nd_string = no_data.map(|v| format!("{}", v));
    let (nd_off, nd_block) = match &nd_string {
        Some(s) => {
            let mut block = s.as_bytes().to_vec();
            block.push(0);
            if block.len() % 2 != 0 {
                block.push(0);
            }
            (tp_off + 48, block)
        }
        None => (tp_off + 48, Vec::new()),
    };
    let ifd_off = nd_off + nd_block.len() as u32;

    let mut entries = vec![
        short(256, width as u16),
        short(257, height as u16),
        short(258, 64),
        short(259, 1),
        long(273, data_off),
        short(277, 1),
        long(278, height as u32),
        long(279, sample_bytes.len() as u32),
        short(339, 3),
        double_array(33550, 3, ps_off),
        double_array(33922, 6, tp_off),
    ];
    if let Some(s) = &nd_string {
        entries.push(ascii(42113, s.len() as u32 + 1, nd_off));
    }

    let mut out = header(ifd_off);
    out.extend_from_slice(&sample_bytes);
    out.extend(geo_blocks(origin, pixel_size));
    out.extend_from_slice(&nd_block);
    out.extend(ifd(&entries));
    out
}

/// Encode a single-strip unsigned 16-bit GeoTIFF.
pub fn encode_geotiff_u16(
    values: &[u16],
    width: usize,
    height: usize,
    origin: (f64, f64),
    pixel_size: (f64, f64),
) -> Vec<u8> {
    assert_eq!(values.len(), width * height, "sample count mismatch");

    let sample_bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let data_off = 8u32;
    let ps_off = data_off + sample_bytes.len() as u32;
    let tp_off = ps_off + 24;
    let ifd_off = tp_off + 48;

    let entries = vec![
        short(256, width as u16),
        short(257, height as u16),
        short(258, 16),
        short(259, 1),
        long(273, data_off),
        short(277, 1),
        long(278, height as u32),
        long(279, sample_bytes.len() as u32),
        short(339, 1),
        double_array(33550, 3, ps_off),
        double_array(33922, 6, tp_off),
    ];

    let mut out = header(ifd_off);
    out.extend_from_slice(&sample_bytes);
    out.extend(geo_blocks(origin, pixel_size));
    out.extend(ifd(&entries));
    out
}

/// Encode a tiled f64 GeoTIFF. Edge tiles are zero-padded as the TIFF
/// tile layout requires.
pub fn encode_geotiff_f64_tiled(
    values: &[f64],
    width: usize,
    height: usize,
    tile_width: usize,
    tile_length: usize,
    origin: (f64, f64),
    pixel_size: (f64, f64),
) -> Vec<u8> {
    assert_eq!(values.len(), width * height, "sample count mismatch");

    let tiles_across = (width + tile_width - 1) / tile_width;
    let tiles_down = (height + tile_length - 1) / tile_length;
    let n_tiles = tiles_across * tiles_down;
    let tile_bytes = tile_width * tile_length * 8;

    let mut sample_bytes = Vec::with_capacity(n_tiles * tile_bytes);
    let mut tile_offsets = Vec::with_capacity(n_tiles);
    for tile_row in 0..tiles_down {
        for tile_col in 0..tiles_across {
            tile_offsets.push(8 + sample_bytes.len() as u32);
            for r in 0..tile_length {
                for c in 0..tile_width {
                    let row = tile_row * tile_length + r;
                    let col = tile_col * tile_width + c;
                    let value = if row < height && col < width {
                        values[row * width + col]
                    } else {
                        0.0
                    };
                    sample_bytes.extend_from_slice(&value.to_le_bytes());
                }
            }
        }
    }

    let data_end = 8 + sample_bytes.len() as u32;
    // Offset/byte-count arrays go inline when a single tile fits the
    // 4-byte value cell, external otherwise.
    let arrays_external = n_tiles > 1;
    let (offsets_off, counts_off, ps_off) = if arrays_external {
        let offsets_off = data_end;
        let counts_off = offsets_off + n_tiles as u32 * 4;
        (offsets_off, counts_off, counts_off + n_tiles as u32 * 4)
    } else {
        (tile_offsets[0], tile_bytes as u32, data_end)
    };
    let tp_off = ps_off + 24;
    let ifd_off = tp_off + 48;

    let entries = vec![
        short(256, width as u16),
        short(257, height as u16),
        short(258, 64),
        short(259, 1),
        short(277, 1),
        long(322, tile_width as u32),
        long(323, tile_length as u32),
        long_array(324, n_tiles as u32, offsets_off),
        long_array(325, n_tiles as u32, counts_off),
        short(339, 3),
        double_array(33550, 3, ps_off),
        double_array(33922, 6, tp_off),
    ];

    let mut out = header(ifd_off);
    out.extend_from_slice(&sample_bytes);
    if arrays_external {
        for offset in &tile_offsets {
            out.extend_from_slice(&offset.to_le_bytes());
        }
        for _ in 0..n_tiles {
            out.extend_from_slice(&(tile_bytes as u32).to_le_bytes());
        }
    }
    out.extend(geo_blocks(origin, pixel_size));
    out.extend(ifd(&entries));
    out
}

fn header(ifd_off: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&ifd_off.to_le_bytes());
    out
}

fn geo_blocks(origin: (f64, f64), pixel_size: (f64, f64)) -> Vec<u8> {
    let mut out = Vec::new();
    // ModelPixelScale: [sx, sy, sz]
    for v in [pixel_size.0, pixel_size.1, 0.0] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    // ModelTiepoint: pixel (0, 0, 0) -> (origin_x, origin_y, 0)
    for v in [0.0, 0.0, 0.0, origin.0, origin.1, 0.0] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn ifd(entries: &[Entry]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.field_type.to_le_bytes());
        out.extend_from_slice(&entry.count.to_le_bytes());
        out.extend_from_slice(&entry.value);
    }
    // No further IFDs.
    out.extend_from_slice(&0u32.to_le_bytes());
    out
}
