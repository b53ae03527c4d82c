//! TIFF image file directory (IFD) parsing.
//!
//! Handles the container-level structure: the byte-order header, the IFD
//! entry table, and typed field value extraction. Both little-endian
//! ("II") and big-endian ("MM") files are supported.

use crate::TiffError;

// TIFF field types (subset used by single-band GeoTIFF)
const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_SSHORT: u16 = 8;
const TYPE_SLONG: u16 = 9;
const TYPE_FLOAT: u16 = 11;
const TYPE_DOUBLE: u16 = 12;

fn type_size(field_type: u16) -> Option<usize> {
    match field_type {
        TYPE_BYTE | TYPE_ASCII => Some(1),
        TYPE_SHORT | TYPE_SSHORT => Some(2),
        TYPE_LONG | TYPE_SLONG | TYPE_FLOAT => Some(4),
        TYPE_DOUBLE => Some(8),
        _ => None,
    }
}

/// Bounds-checked, endian-aware reader over the raw file bytes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TiffReader<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl<'a> TiffReader<'a> {
    /// Validate the TIFF header and return the reader plus the offset of
    /// the first IFD.
    pub(crate) fn new(data: &'a [u8]) -> Result<(Self, usize), TiffError> {
        if data.len() < 8 {
            return Err(TiffError::Truncated("file shorter than TIFF header".into()));
        }

        let big_endian = match &data[0..2] {
            b"II" => false,
            b"MM" => true,
            other => {
                return Err(TiffError::InvalidFormat(format!(
                    "invalid byte-order mark {:?}",
                    other
                )))
            }
        };

        let reader = Self { data, big_endian };
        let magic = reader.u16_at(2)?;
        if magic != 42 {
            return Err(TiffError::InvalidFormat(format!(
                "expected TIFF magic 42, got {}",
                magic
            )));
        }

        let ifd_offset = reader.u32_at(4)? as usize;
        Ok((reader, ifd_offset))
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], TiffError> {
        self.data
            .get(offset..offset + len)
            .ok_or_else(|| TiffError::Truncated(format!("read of {} bytes at {}", len, offset)))
    }

    pub(crate) fn u16_at(&self, offset: usize) -> Result<u16, TiffError> {
        let b = self.slice(offset, 2)?;
        Ok(if self.big_endian {
            u16::from_be_bytes([b[0], b[1]])
        } else {
            u16::from_le_bytes([b[0], b[1]])
        })
    }

    pub(crate) fn u32_at(&self, offset: usize) -> Result<u32, TiffError> {
        let b = self.slice(offset, 4)?;
        Ok(if self.big_endian {
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        } else {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        })
    }

    pub(crate) fn f32_at(&self, offset: usize) -> Result<f32, TiffError> {
        Ok(f32::from_bits(self.u32_at(offset)?))
    }

    pub(crate) fn f64_at(&self, offset: usize) -> Result<f64, TiffError> {
        let b = self.slice(offset, 8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(b);
        Ok(if self.big_endian {
            f64::from_be_bytes(bytes)
        } else {
            f64::from_le_bytes(bytes)
        })
    }

    pub(crate) fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8], TiffError> {
        self.slice(offset, len)
    }

    pub(crate) fn big_endian(&self) -> bool {
        self.big_endian
    }
}

/// One 12-byte IFD entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IfdEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    // Offset of the 4-byte value/offset cell within the file.
    value_cell: usize,
}

impl IfdEntry {
    /// Offset of the field data: inline in the value cell when it fits in
    /// 4 bytes, otherwise at the pointed-to location.
    fn data_offset(&self, reader: &TiffReader<'_>) -> Result<usize, TiffError> {
        let size = type_size(self.field_type).ok_or_else(|| {
            TiffError::Unsupported(format!(
                "field type {} for tag {}",
                self.field_type, self.tag
            ))
        })?;
        let total = size * self.count as usize;
        if total <= 4 {
            Ok(self.value_cell)
        } else {
            Ok(reader.u32_at(self.value_cell)? as usize)
        }
    }

    /// Read the field values as unsigned integers (BYTE/SHORT/LONG).
    pub(crate) fn as_u32s(&self, reader: &TiffReader<'_>) -> Result<Vec<u32>, TiffError> {
        let offset = self.data_offset(reader)?;
        let mut values = Vec::with_capacity(self.count as usize);
        for i in 0..self.count as usize {
            let value = match self.field_type {
                TYPE_BYTE => reader.bytes_at(offset + i, 1)?[0] as u32,
                TYPE_SHORT => reader.u16_at(offset + i * 2)? as u32,
                TYPE_LONG => reader.u32_at(offset + i * 4)?,
                other => {
                    return Err(TiffError::Unsupported(format!(
                        "integer read of field type {} for tag {}",
                        other, self.tag
                    )))
                }
            };
            values.push(value);
        }
        Ok(values)
    }

    /// Read a single unsigned integer value.
    pub(crate) fn as_u32(&self, reader: &TiffReader<'_>) -> Result<u32, TiffError> {
        self.as_u32s(reader)?
            .first()
            .copied()
            .ok_or_else(|| TiffError::InvalidFormat(format!("tag {} has no values", self.tag)))
    }

    /// Read the field values as doubles (DOUBLE/FLOAT/SHORT/LONG).
    pub(crate) fn as_f64s(&self, reader: &TiffReader<'_>) -> Result<Vec<f64>, TiffError> {
        let offset = self.data_offset(reader)?;
        let mut values = Vec::with_capacity(self.count as usize);
        for i in 0..self.count as usize {
            let value = match self.field_type {
                TYPE_DOUBLE => reader.f64_at(offset + i * 8)?,
                TYPE_FLOAT => reader.f32_at(offset + i * 4)? as f64,
                TYPE_SHORT => reader.u16_at(offset + i * 2)? as f64,
                TYPE_LONG => reader.u32_at(offset + i * 4)? as f64,
                other => {
                    return Err(TiffError::Unsupported(format!(
                        "floating-point read of field type {} for tag {}",
                        other, self.tag
                    )))
                }
            };
            values.push(value);
        }
        Ok(values)
    }

    /// Read an ASCII field, trimming the trailing NUL.
    pub(crate) fn as_ascii(&self, reader: &TiffReader<'_>) -> Result<String, TiffError> {
        if self.field_type != TYPE_ASCII {
            return Err(TiffError::Unsupported(format!(
                "ASCII read of field type {} for tag {}",
                self.field_type, self.tag
            )));
        }
        let offset = self.data_offset(reader)?;
        let raw = reader.bytes_at(offset, self.count as usize)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }
}

/// The first IFD of the file, keyed by tag.
#[derive(Debug)]
pub(crate) struct Ifd {
    entries: Vec<IfdEntry>,
}

impl Ifd {
    /// Parse the IFD entry table at the given offset.
    pub(crate) fn parse(reader: &TiffReader<'_>, offset: usize) -> Result<Self, TiffError> {
        let count = reader.u16_at(offset)? as usize;
        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            let entry_offset = offset + 2 + i * 12;
            entries.push(IfdEntry {
                tag: reader.u16_at(entry_offset)?,
                field_type: reader.u16_at(entry_offset + 2)?,
                count: reader.u32_at(entry_offset + 4)?,
                value_cell: entry_offset + 8,
            });
        }
        Ok(Self { entries })
    }

    /// Look up an entry by tag.
    pub(crate) fn get(&self, tag: u16) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    /// Look up a required entry by tag.
    pub(crate) fn require(&self, tag: u16) -> Result<&IfdEntry, TiffError> {
        self.get(tag)
            .ok_or_else(|| TiffError::InvalidFormat(format!("missing required tag {}", tag)))
    }
}
