//! Filename validation and sequence-naming helpers (the "filename guard").
//!
//! Every on-disk entry point (`create`, `save_as`, `copy`, `collect`) routes
//! its target name through [`validate_filename`] before touching the
//! filesystem. [`next_in_sequence`] supports collection-mode workflows that
//! number files as `stemNNN.fits`.

use alloc::format;
use alloc::string::{String, ToString};

use crate::error::{Error, Result};

/// The only extension a FITS filename may carry, compared case-insensitively.
const REQUIRED_EXTENSION: &str = ".fits";

/// Validate a filename against the FITS naming rule: it must end in `.fits`
/// (case-insensitive) and have a non-blank stem before that extension.
///
/// Rejects `" .fits"` (blank stem), `"x"` (missing extension), and `"x.fit"`
/// (wrong extension), per the boundary behaviors this guard exists to
/// enforce.
pub fn validate_filename(name: &str) -> Result<()> {
    if name.len() < REQUIRED_EXTENSION.len() {
        return Err(Error::Filename(name.to_string()));
    }
    let split = name.len() - REQUIRED_EXTENSION.len();
    let (stem, ext) = name.split_at(split);
    if !ext.eq_ignore_ascii_case(REQUIRED_EXTENSION) {
        return Err(Error::Filename(name.to_string()));
    }
    if stem.trim().is_empty() {
        return Err(Error::Filename(name.to_string()));
    }
    Ok(())
}

/// Split a validated filename into `(stem, extension)`, where `extension`
/// includes the leading dot and preserves the caller's original casing.
fn split_stem(name: &str) -> (&str, &str) {
    let split = name.len() - REQUIRED_EXTENSION.len();
    name.split_at(split)
}

/// Suggest the next filename in a numbered sequence, for collection-mode
/// workflows (`frame001.fits`, `frame002.fits`, ...).
///
/// If `name`'s stem ends in ASCII digits, the numeric suffix is incremented
/// by one and re-padded to its original width (growing the width if the
/// increment overflows it, e.g. `frame999.fits` -> `frame1000.fits`). If the
/// stem carries no trailing digits, `001` is appended.
pub fn next_in_sequence(name: &str) -> Result<String> {
    validate_filename(name)?;
    let (stem, ext) = split_stem(name);

    let digit_start = stem
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    let (prefix, digits) = stem.split_at(digit_start);

    if digits.is_empty() {
        return Ok(format!("{stem}001{ext}"));
    }

    let width = digits.len();
    let n: u64 = digits
        .parse()
        .map_err(|_| Error::Filename(name.to_string()))?;
    let next = n + 1;
    Ok(format!("{prefix}{next:0width$}{ext}"))
}
