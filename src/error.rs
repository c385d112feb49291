use alloc::string::String;

/// All errors that can occur while parsing, assembling, or writing FITS
/// files. The set is closed: every fallible operation in this crate returns
/// one of these variants, never an ad-hoc string error.
#[derive(Debug)]
pub enum Error {
    /// `validate_filename` rejected a name: missing/wrong extension, or a
    /// blank stem.
    Filename(String),
    /// A protected `create`/`save_as`/`copy`/`collect` refused to overwrite
    /// an existing file.
    FileExists(String),
    /// Non-ASCII byte in a card record. Carries the card's 0-based index.
    CardEncoding(usize),
    /// String value missing its closing quote. Carries the card index.
    CardString(usize),
    /// Numeric value failed to parse. Carries the card index.
    CardValue(usize),
    /// Unknown TFORM/TDISP type character.
    FormatKind(String),
    /// TFORM/TDISP width was zero or absent where required.
    FormatWidth(String),
    /// Attempt to delete or rename a mandatory card.
    MandatoryKeyword(&'static str),
    /// Mandatory keywords disagree with the payload or each other.
    HeaderConsistency(String),
    /// No END card was found within the scanned header blocks.
    HeaderUnterminated,
    /// Unsupported BITPIX value.
    Bitpix(i64),
    /// A data block was shorter than its header-declared length.
    TruncatedFile,
    /// An HDU index was out of range.
    HduIndex(usize),
    /// An I/O error from the standard library, for failures (permissions,
    /// missing directories, ...) that are not one of the kinds above.
    #[cfg(feature = "std")]
    Io(std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Filename(s) => write!(f, "invalid filename: {s}"),
            Error::FileExists(s) => write!(f, "file already exists: {s}"),
            Error::CardEncoding(i) => write!(f, "non-ASCII byte in card {i}"),
            Error::CardString(i) => write!(f, "unterminated string value in card {i}"),
            Error::CardValue(i) => write!(f, "invalid value in card {i}"),
            Error::FormatKind(s) => write!(f, "unknown format type character: {s}"),
            Error::FormatWidth(s) => write!(f, "invalid or missing format width: {s}"),
            Error::MandatoryKeyword(kw) => {
                write!(f, "cannot delete or rename mandatory keyword: {kw}")
            }
            Error::HeaderConsistency(s) => write!(f, "inconsistent header: {s}"),
            Error::HeaderUnterminated => write!(f, "header has no END card"),
            Error::Bitpix(v) => write!(f, "unsupported BITPIX value: {v}"),
            Error::TruncatedFile => write!(f, "data block truncated before declared length"),
            Error::HduIndex(i) => write!(f, "HDU index {i} out of range"),
            #[cfg(feature = "std")]
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
