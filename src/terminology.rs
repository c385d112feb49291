//! The static FITS terminology table used by the terminal inspector (and
//! anything else) for diagnostics: `terminology("BITPIX")` reads back the
//! glossary entry instead of callers hard-coding their own prose.

/// One glossary entry, matched case-insensitively against the term.
const ENTRIES: &[(&str, &str)] = &[
    (
        "HDU",
        "Header-Data Unit: one header section plus its associated data section.",
    ),
    (
        "CARD",
        "An 80-byte ASCII record carrying at most one keyword-value-comment triple.",
    ),
    (
        "PRIMARY HDU",
        "The first HDU in a file; always an IMAGE HDU.",
    ),
    (
        "EXTENSION HDU",
        "Any non-primary HDU; begins with an XTENSION card.",
    ),
    (
        "BITPIX",
        "Signed integer indicating element width and kind (8, 16, 32, 64 for \
         integer; -32, -64 for IEEE float).",
    ),
    ("NAXIS", "The number of axes in an IMAGE HDU's data array."),
    ("NAXISN", "Size along the n-th image axis."),
    (
        "TFORM",
        "FORTRAN-style column format string for TABLE/BINTABLE columns.",
    ),
    (
        "TDISP",
        "FORTRAN-style display format string for TABLE/BINTABLE columns, \
         sharing TFORM's grammar.",
    ),
    (
        "BZERO",
        "The offset half of the BZERO/BSCALE affine transform applied to \
         stored integer values on read.",
    ),
    (
        "BSCALE",
        "The scale half of the BZERO/BSCALE affine transform applied to \
         stored integer values on read.",
    ),
    ("BLOCK", "A 2880-byte unit of file alignment."),
];

/// Look up a glossary entry by term, case- and whitespace-insensitively.
///
/// Returns `None` for unrecognized terms; callers that need a displayable
/// string for an unknown term should render that themselves (e.g. the
/// terminal inspector prints `"no entry for '<term>'"`).
pub fn terminology(term: &str) -> Option<&'static str> {
    let needle = term.trim();
    ENTRIES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(needle))
        .map(|(_, def)| *def)
}
