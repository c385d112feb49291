#![cfg_attr(not(feature = "std"), no_std)]

//! A pure Rust codec for the FITS (Flexible Image Transport System) binary
//! container format: header cards, primary and extension HDUs, image pixel
//! data, and ASCII and binary table data.
//!
//! This crate has no external parsing dependencies beyond [`bytemuck`] (for
//! zero-copy pixel buffer reinterpretation) and [`libm`] (for rounding in
//! `no_std` builds). It works without the standard library; enable the
//! `std` feature (on by default) for file I/O helpers.

extern crate alloc;

pub mod bintable;
pub mod block;
pub mod endian;
pub mod error;
pub mod extension;
#[cfg(feature = "std")]
pub mod fitsfile;
pub mod filename;
pub mod hdu;
pub mod header;
pub mod image;
pub mod io;
pub mod offset;
pub mod primary;
pub mod table;
pub mod terminology;
pub mod value;

pub use error::{Error, Result};
pub use hdu::{parse_fits, FitsData, Hdu, HduInfo};

/// FITS block size in bytes.
pub const BLOCK_SIZE: usize = block::BLOCK_SIZE;

/// FITS card (keyword record) size in bytes.
pub const CARD_SIZE: usize = block::CARD_SIZE;

/// Number of cards per block.
pub const CARDS_PER_BLOCK: usize = block::CARDS_PER_BLOCK;
