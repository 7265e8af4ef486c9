//! Bounds-checked little-endian reads over raw map bytes.

use crate::error::{MapError, Result};

/// Return `len` bytes starting at `start`.
pub fn slice_at(data: &[u8], start: usize, len: usize) -> Result<&[u8]> {
    let end = start
        .checked_add(len)
        .ok_or_else(|| MapError::truncated(start, len, data.len().saturating_sub(start)))?;
    data.get(start..end)
        .ok_or_else(|| MapError::truncated(start, len, data.len().saturating_sub(start)))
}

pub fn u8_at(data: &[u8], offset: usize) -> Result<u8> {
    data.get(offset)
        .copied()
        .ok_or_else(|| MapError::truncated(offset, 1, 0))
}

pub fn u16_at(data: &[u8], offset: usize) -> Result<u16> {
    let bytes = slice_at(data, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub fn u32_at(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = slice_at(data, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
