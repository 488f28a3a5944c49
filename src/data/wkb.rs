//! Decoding of the binary point/linestring blobs kept by the spatial store.
//!
//! Layout: one byte order flag (`0` big endian, `1` little endian), a `u32`
//! geometry type (`1` point, `2` linestring), for linestrings an `i32` point
//! count, then two `f64` per point in latitude, longitude order.

use crate::core::geo::{WorldPoint, WorldRect};

pub const GEOMETRY_POINT: u32 = 1;
pub const GEOMETRY_LINESTRING: u32 = 2;

const BIG_ENDIAN: u8 = 0;
const LITTLE_ENDIAN: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("blob truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("unsupported byte order flag {0}")]
    UnsupportedByteOrder(u8),

    #[error("expected geometry type {expected}, found {found}")]
    UnexpectedGeometryType { expected: u32, found: u32 },

    #[error("negative point count {0}")]
    NegativePointCount(i32),
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
    little_endian: bool,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let flag = *bytes.first().ok_or(DecodeError::Truncated {
            needed: 1,
            available: 0,
        })?;
        let little_endian = match flag {
            LITTLE_ENDIAN => true,
            BIG_ENDIAN => false,
            other => return Err(DecodeError::UnsupportedByteOrder(other)),
        };
        Ok(Self {
            bytes,
            offset: 1,
            little_endian,
        })
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let end = self.offset + N;
        let slice = self.bytes.get(self.offset..end).ok_or(DecodeError::Truncated {
            needed: end,
            available: self.bytes.len(),
        })?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        self.offset = end;
        Ok(buf)
    }

    fn require(&self, more: usize) -> Result<(), DecodeError> {
        let needed = self.offset.saturating_add(more);
        if needed > self.bytes.len() {
            return Err(DecodeError::Truncated {
                needed,
                available: self.bytes.len(),
            });
        }
        Ok(())
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        let buf = self.take::<4>()?;
        Ok(if self.little_endian {
            u32::from_le_bytes(buf)
        } else {
            u32::from_be_bytes(buf)
        })
    }

    fn i32(&mut self) -> Result<i32, DecodeError> {
        let buf = self.take::<4>()?;
        Ok(if self.little_endian {
            i32::from_le_bytes(buf)
        } else {
            i32::from_be_bytes(buf)
        })
    }

    fn f64(&mut self) -> Result<f64, DecodeError> {
        let buf = self.take::<8>()?;
        Ok(if self.little_endian {
            f64::from_le_bytes(buf)
        } else {
            f64::from_be_bytes(buf)
        })
    }

    fn point(&mut self) -> Result<WorldPoint, DecodeError> {
        let latitude = self.f64()?;
        let longitude = self.f64()?;
        Ok(WorldPoint::new(latitude, longitude))
    }

    fn expect_type(&mut self, expected: u32) -> Result<(), DecodeError> {
        let found = self.u32()?;
        if found != expected {
            return Err(DecodeError::UnexpectedGeometryType { expected, found });
        }
        Ok(())
    }
}

/// Decodes a point blob
pub fn decode_point(bytes: &[u8]) -> Result<WorldPoint, DecodeError> {
    let mut reader = Reader::new(bytes)?;
    reader.expect_type(GEOMETRY_POINT)?;
    reader.point()
}

/// Decodes a linestring blob into its points and their bounding box.
///
/// An empty linestring yields no points and `None` bounds.
pub fn decode_linestring(
    bytes: &[u8],
) -> Result<(Vec<WorldPoint>, Option<WorldRect>), DecodeError> {
    let mut reader = Reader::new(bytes)?;
    reader.expect_type(GEOMETRY_LINESTRING)?;

    let count = reader.i32()?;
    if count < 0 {
        return Err(DecodeError::NegativePointCount(count));
    }
    let count = count as usize;
    // Fail before allocating for a count the blob cannot hold
    reader.require(count.saturating_mul(16))?;

    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push(reader.point()?);
    }
    let bounds = WorldRect::from_points(&points);
    Ok((points, bounds))
}
