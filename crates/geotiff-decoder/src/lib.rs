//! Single-band GeoTIFF decoder.
//!
//! This crate provides a pure Rust decoder for the subset of GeoTIFF
//! produced by WCS GetCoverage responses: one sample per pixel,
//! uncompressed payloads, strip or tile layout, little- or big-endian,
//! with ModelPixelScale / ModelTiepoint geometry metadata and the GDAL
//! no-data tag.
//!
//! The decoder makes exactly one pass over the payload and returns an
//! immutable [`RasterImage`] handle plus its [`PixelBuffer`]. Anything
//! outside the supported subset is a hard [`TiffError`]; there is no
//! partial decode.

mod ifd;
mod image;

pub use image::{PixelBuffer, RasterImage, SampleFormat, TiePoint};

use ifd::{Ifd, TiffReader};
use thiserror::Error;
use tracing::debug;

// Baseline TIFF tags
const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_IMAGE_LENGTH: u16 = 257;
const TAG_BITS_PER_SAMPLE: u16 = 258;
const TAG_COMPRESSION: u16 = 259;
const TAG_STRIP_OFFSETS: u16 = 273;
const TAG_SAMPLES_PER_PIXEL: u16 = 277;
const TAG_ROWS_PER_STRIP: u16 = 278;
const TAG_STRIP_BYTE_COUNTS: u16 = 279;
const TAG_TILE_WIDTH: u16 = 322;
const TAG_TILE_LENGTH: u16 = 323;
const TAG_TILE_OFFSETS: u16 = 324;
const TAG_TILE_BYTE_COUNTS: u16 = 325;
const TAG_SAMPLE_FORMAT: u16 = 339;

// GeoTIFF / GDAL tags
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIE_POINT: u16 = 33922;
const TAG_MODEL_TRANSFORMATION: u16 = 34264;
const TAG_GDAL_NODATA: u16 = 42113;

const COMPRESSION_NONE: u32 = 1;

/// Errors produced while decoding a GeoTIFF payload.
#[derive(Debug, Error)]
pub enum TiffError {
    /// The payload violates the TIFF structure.
    #[error("invalid TIFF: {0}")]
    InvalidFormat(String),

    /// The payload is valid TIFF but uses a feature outside the decoded
    /// subset (compression, extra bands, exotic sample types).
    #[error("unsupported TIFF feature: {0}")]
    Unsupported(String),

    /// The payload ends before the structure it declares.
    #[error("truncated TIFF: {0}")]
    Truncated(String),
}

/// Decode a single-band GeoTIFF from raw bytes.
pub fn decode(data: &[u8]) -> Result<(RasterImage, PixelBuffer), TiffError> {
    let (reader, ifd_offset) = TiffReader::new(data)?;
    let ifd = Ifd::parse(&reader, ifd_offset)?;

    let width = ifd.require(TAG_IMAGE_WIDTH)?.as_u32(&reader)? as usize;
    let height = ifd.require(TAG_IMAGE_LENGTH)?.as_u32(&reader)? as usize;
    if width == 0 || height == 0 {
        return Err(TiffError::InvalidFormat(format!(
            "degenerate image dimensions {}x{}",
            width, height
        )));
    }

    let samples_per_pixel = match ifd.get(TAG_SAMPLES_PER_PIXEL) {
        Some(entry) => entry.as_u32(&reader)?,
        None => 1,
    };
    if samples_per_pixel != 1 {
        return Err(TiffError::Unsupported(format!(
            "{} samples per pixel (single band required)",
            samples_per_pixel
        )));
    }

    let compression = match ifd.get(TAG_COMPRESSION) {
        Some(entry) => entry.as_u32(&reader)?,
        None => COMPRESSION_NONE,
    };
    if compression != COMPRESSION_NONE {
        return Err(TiffError::Unsupported(format!(
            "compression scheme {}",
            compression
        )));
    }

    let bits_per_sample = match ifd.get(TAG_BITS_PER_SAMPLE) {
        Some(entry) => entry.as_u32(&reader)? as u16,
        None => 8,
    };
    let sample_format = match ifd.get(TAG_SAMPLE_FORMAT) {
        Some(entry) => match entry.as_u32(&reader)? {
            1 => SampleFormat::UnsignedInt,
            2 => SampleFormat::SignedInt,
            3 => SampleFormat::Float,
            other => {
                return Err(TiffError::Unsupported(format!("sample format {}", other)));
            }
        },
        None => SampleFormat::UnsignedInt,
    };
    validate_sample_type(sample_format, bits_per_sample)?;

    let data = if ifd.get(TAG_TILE_OFFSETS).is_some() {
        read_tiles(&reader, &ifd, width, height, bits_per_sample, sample_format)?
    } else {
        read_strips(&reader, &ifd, width, height, bits_per_sample, sample_format)?
    };

    let pixel_scale = match ifd.get(TAG_MODEL_PIXEL_SCALE) {
        Some(entry) => {
            let values = entry.as_f64s(&reader)?;
            if values.len() < 2 {
                return Err(TiffError::InvalidFormat(
                    "ModelPixelScale has fewer than 2 values".into(),
                ));
            }
            Some([values[0], values[1], values.get(2).copied().unwrap_or(0.0)])
        }
        None => None,
    };

    let tie_point = match ifd.get(TAG_MODEL_TIE_POINT) {
        Some(entry) => {
            let values = entry.as_f64s(&reader)?;
            if values.len() < 6 {
                return Err(TiffError::InvalidFormat(
                    "ModelTiepoint has fewer than 6 values".into(),
                ));
            }
            Some(TiePoint {
                i: values[0],
                j: values[1],
                k: values[2],
                x: values[3],
                y: values[4],
                z: values[5],
            })
        }
        None => None,
    };

    let model_transformation = match ifd.get(TAG_MODEL_TRANSFORMATION) {
        Some(entry) => Some(entry.as_f64s(&reader)?),
        None => None,
    };

    let no_data = match ifd.get(TAG_GDAL_NODATA) {
        Some(entry) => entry.as_ascii(&reader)?.trim().parse::<f64>().ok(),
        None => None,
    };

    debug!(
        width,
        height,
        bits_per_sample,
        has_geo = tie_point.is_some() && pixel_scale.is_some(),
        "decoded GeoTIFF"
    );

    let image = RasterImage {
        width,
        height,
        bits_per_sample,
        sample_format,
        pixel_scale,
        tie_point,
        model_transformation,
        no_data,
    };
    let pixels = PixelBuffer {
        data,
        width,
        height,
    };
    Ok((image, pixels))
}

fn validate_sample_type(format: SampleFormat, bits: u16) -> Result<(), TiffError> {
    let supported = match format {
        SampleFormat::UnsignedInt | SampleFormat::SignedInt => matches!(bits, 8 | 16 | 32),
        SampleFormat::Float => matches!(bits, 32 | 64),
    };
    if supported {
        Ok(())
    } else {
        Err(TiffError::Unsupported(format!(
            "{:?} samples at {} bits",
            format, bits
        )))
    }
}

/// Convert `count` raw samples to f64, appending to `out`.
fn convert_samples(
    raw: &[u8],
    count: usize,
    bits: u16,
    format: SampleFormat,
    big_endian: bool,
    out: &mut Vec<f64>,
) -> Result<(), TiffError> {
    let bpp = bits as usize / 8;
    if raw.len() < count * bpp {
        return Err(TiffError::Truncated(format!(
            "segment holds {} bytes, {} samples need {}",
            raw.len(),
            count,
            count * bpp
        )));
    }

    for i in 0..count {
        let chunk = &raw[i * bpp..(i + 1) * bpp];
        let value = match (format, bits) {
            (SampleFormat::UnsignedInt, 8) => chunk[0] as f64,
            (SampleFormat::SignedInt, 8) => chunk[0] as i8 as f64,
            (SampleFormat::UnsignedInt, 16) => read_u16(chunk, big_endian) as f64,
            (SampleFormat::SignedInt, 16) => read_u16(chunk, big_endian) as i16 as f64,
            (SampleFormat::UnsignedInt, 32) => read_u32(chunk, big_endian) as f64,
            (SampleFormat::SignedInt, 32) => read_u32(chunk, big_endian) as i32 as f64,
            (SampleFormat::Float, 32) => f32::from_bits(read_u32(chunk, big_endian)) as f64,
            (SampleFormat::Float, 64) => f64::from_bits(read_u64(chunk, big_endian)),
            _ => unreachable!("validated in validate_sample_type"),
        };
        out.push(value);
    }
    Ok(())
}

fn read_u16(chunk: &[u8], big_endian: bool) -> u16 {
    let bytes = [chunk[0], chunk[1]];
    if big_endian {
        u16::from_be_bytes(bytes)
    } else {
        u16::from_le_bytes(bytes)
    }
}

fn read_u32(chunk: &[u8], big_endian: bool) -> u32 {
    let bytes = [chunk[0], chunk[1], chunk[2], chunk[3]];
    if big_endian {
        u32::from_be_bytes(bytes)
    } else {
        u32::from_le_bytes(bytes)
    }
}

fn read_u64(chunk: &[u8], big_endian: bool) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&chunk[..8]);
    if big_endian {
        u64::from_be_bytes(bytes)
    } else {
        u64::from_le_bytes(bytes)
    }
}

/// Assemble samples from a stripped layout.
fn read_strips(
    reader: &TiffReader<'_>,
    ifd: &Ifd,
    width: usize,
    height: usize,
    bits: u16,
    format: SampleFormat,
) -> Result<Vec<f64>, TiffError> {
    let offsets = ifd.require(TAG_STRIP_OFFSETS)?.as_u32s(reader)?;
    let byte_counts = ifd.require(TAG_STRIP_BYTE_COUNTS)?.as_u32s(reader)?;
    if offsets.len() != byte_counts.len() {
        return Err(TiffError::InvalidFormat(format!(
            "{} strip offsets but {} byte counts",
            offsets.len(),
            byte_counts.len()
        )));
    }

    let rows_per_strip = match ifd.get(TAG_ROWS_PER_STRIP) {
        Some(entry) => entry.as_u32(reader)? as usize,
        None => height,
    };
    if rows_per_strip == 0 {
        return Err(TiffError::InvalidFormat("RowsPerStrip is zero".into()));
    }

    let mut out = Vec::with_capacity(width * height);
    let mut remaining_rows = height;
    for (offset, count) in offsets.iter().zip(byte_counts.iter()) {
        if remaining_rows == 0 {
            break;
        }
        let rows = rows_per_strip.min(remaining_rows);
        let raw = reader.bytes_at(*offset as usize, *count as usize)?;
        convert_samples(raw, rows * width, bits, format, reader.big_endian(), &mut out)?;
        remaining_rows -= rows;
    }

    if out.len() != width * height {
        return Err(TiffError::Truncated(format!(
            "strips yielded {} samples, expected {}",
            out.len(),
            width * height
        )));
    }
    Ok(out)
}

/// Assemble samples from a tiled layout. Edge tiles are padded in the
/// file; only the in-bounds portion is copied.
fn read_tiles(
    reader: &TiffReader<'_>,
    ifd: &Ifd,
    width: usize,
    height: usize,
    bits: u16,
    format: SampleFormat,
) -> Result<Vec<f64>, TiffError> {
    let tile_width = ifd.require(TAG_TILE_WIDTH)?.as_u32(reader)? as usize;
    let tile_length = ifd.require(TAG_TILE_LENGTH)?.as_u32(reader)? as usize;
    if tile_width == 0 || tile_length == 0 {
        return Err(TiffError::InvalidFormat("degenerate tile dimensions".into()));
    }
    let offsets = ifd.require(TAG_TILE_OFFSETS)?.as_u32s(reader)?;
    let byte_counts = ifd.require(TAG_TILE_BYTE_COUNTS)?.as_u32s(reader)?;

    let tiles_across = (width + tile_width - 1) / tile_width;
    let tiles_down = (height + tile_length - 1) / tile_length;
    if offsets.len() < tiles_across * tiles_down {
        return Err(TiffError::InvalidFormat(format!(
            "{} tile offsets for a {}x{} tile grid",
            offsets.len(),
            tiles_across,
            tiles_down
        )));
    }

    let mut out = vec![0.0f64; width * height];
    for tile_row in 0..tiles_down {
        for tile_col in 0..tiles_across {
            let index = tile_row * tiles_across + tile_col;
            let raw = reader.bytes_at(offsets[index] as usize, byte_counts[index] as usize)?;

            let mut tile_samples = Vec::with_capacity(tile_width * tile_length);
            convert_samples(
                raw,
                tile_width * tile_length,
                bits,
                format,
                reader.big_endian(),
                &mut tile_samples,
            )?;

            let base_col = tile_col * tile_width;
            let base_row = tile_row * tile_length;
            let cols = tile_width.min(width - base_col);
            let rows = tile_length.min(height - base_row);
            for r in 0..rows {
                let src = r * tile_width;
                let dst = (base_row + r) * width + base_col;
                out[dst..dst + cols].copy_from_slice(&tile_samples[src..src + cols]);
            }
        }
    }
    Ok(out)
}
