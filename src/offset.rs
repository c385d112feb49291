//! Zero-offset translation for native unsigned integer image payloads.
//!
//! The FITS standard only stores *signed* integers on disk. A caller that
//! wants to round-trip an unsigned buffer (`u16`, `u32`, `u64`) stores the
//! signed value `native - 2^(BITPIX-1)` instead, and records the midpoint in
//! `BZERO` (with `BSCALE = 1`) so a conforming reader can recover the
//! original unsigned values. This is the same affine transform
//! [`crate::image::apply_bscale_bzero`] applies generically, specialized to
//! the one offset/scale pair that is exact and idempotent under wrapping
//! two's-complement arithmetic rather than floating-point rounding.

use alloc::vec::Vec;

use crate::image::ImageData;

/// An image payload whose native host representation is unsigned.
#[derive(Debug, Clone, PartialEq)]
pub enum UnsignedImageData {
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

/// The `BZERO` midpoint for a given on-disk BITPIX, as an `f64` (the value a
/// header card stores). `2^63` does not fit in an `i64`, so this is computed
/// in `f64` throughout rather than via `1i64 << (bitpix - 1)`.
fn midpoint(bitpix: i64) -> f64 {
    libm::pow(2.0, (bitpix - 1) as f64)
}

/// Apply the zero-offset transform: convert a native unsigned buffer into
/// the signed [`ImageData`] that is actually written to disk, and the
/// `(bzero, bscale)` pair the header must carry alongside it.
///
/// `BSCALE` is always `1.0`; it is returned for symmetry with
/// [`remove_offset`] and so callers can emit both cards uniformly.
pub fn apply_offset(data: &UnsignedImageData) -> (ImageData, f64, f64) {
    match data {
        UnsignedImageData::U16(v) => {
            let bzero = midpoint(16);
            let stored: Vec<i16> = v.iter().map(|&x| x.wrapping_sub(1 << 15) as i16).collect();
            (ImageData::I16(stored), bzero, 1.0)
        }
        UnsignedImageData::U32(v) => {
            let bzero = midpoint(32);
            let stored: Vec<i32> = v
                .iter()
                .map(|&x| x.wrapping_sub(1 << 31) as i32)
                .collect();
            (ImageData::I32(stored), bzero, 1.0)
        }
        UnsignedImageData::U64(v) => {
            let bzero = midpoint(64);
            let stored: Vec<i64> = v
                .iter()
                .map(|&x| x.wrapping_sub(1u64 << 63) as i64)
                .collect();
            (ImageData::I64(stored), bzero, 1.0)
        }
    }
}

/// Reverse the zero-offset transform: given the signed data actually stored
/// on disk and the header's `BZERO`/`BSCALE`, recover the native unsigned
/// buffer if `bzero`/`bscale` are exactly the midpoint pair `apply_offset`
/// would have produced for this BITPIX. Returns `None` if the header uses a
/// different (or absent/default) calibration, in which case the caller
/// should use the plain signed `ImageData` instead.
pub fn remove_offset(data: &ImageData, bzero: f64, bscale: f64) -> Option<UnsignedImageData> {
    if bscale != 1.0 {
        return None;
    }
    match data {
        ImageData::I16(v) if bzero == midpoint(16) => {
            let native: Vec<u16> = v.iter().map(|&x| (x as i32 + (1 << 15)) as u16).collect();
            Some(UnsignedImageData::U16(native))
        }
        ImageData::I32(v) if bzero == midpoint(32) => {
            let native: Vec<u32> = v.iter().map(|&x| (x as i64 + (1 << 31)) as u32).collect();
            Some(UnsignedImageData::U32(native))
        }
        ImageData::I64(v) if bzero == midpoint(64) => {
            let native: Vec<u64> = v
                .iter()
                .map(|&x| (x as i128 + (1i128 << 63)) as u64)
                .collect();
            Some(UnsignedImageData::U64(native))
        }
        _ => None,
    }
}
