//! ASCII table HDU reading and writing for FITS files.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::block::padded_byte_len;
use crate::error::{Error, Result};
use crate::hdu::{Hdu, HduInfo};
use crate::header::Card;
use crate::value::Value;

// ── Column Format ──

/// The format code for an ASCII table column, parsed from a TFORMn keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsciiColumnFormat {
    /// `Aw` -- character string, `w` characters wide.
    Character(usize),
    /// `Iw` -- integer, `w` characters wide.
    Integer(usize),
    /// `Fw.d` -- fixed-point decimal, `w` wide with `d` decimal places.
    FloatF(usize, usize),
    /// `Ew.d` -- single-precision exponential, `w` wide with `d` decimal places.
    FloatE(usize, usize),
    /// `Dw.d` -- double-precision exponential, `w` wide with `d` decimal places.
    DoubleE(usize, usize),
}

impl AsciiColumnFormat {
    /// Return the total width in bytes of a field with this format.
    pub fn width(&self) -> usize {
        match self {
            AsciiColumnFormat::Character(w)
            | AsciiColumnFormat::Integer(w)
            | AsciiColumnFormat::FloatF(w, _)
            | AsciiColumnFormat::FloatE(w, _)
            | AsciiColumnFormat::DoubleE(w, _) => *w,
        }
    }
}

// ── Column Descriptor ──

/// Describes one column in an ASCII table extension.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiColumnDescriptor {
    /// Column name from TTYPEn (may be absent).
    pub name: Option<String>,
    /// The format code from TFORMn.
    pub format: AsciiColumnFormat,
    /// 0-indexed byte position within the row (converted from 1-indexed TBCOLn).
    pub tbcol: usize,
}

// ── Column Data ──

/// Holds the data for one column across all rows (or a single row).
#[derive(Debug, Clone, PartialEq)]
pub enum AsciiColumnData {
    /// Character/string column.
    Character(Vec<String>),
    /// Integer column.
    Integer(Vec<i64>),
    /// Float column (covers Fw.d, Ew.d, and Dw.d).
    Float(Vec<f64>),
}

// ── TFORM Parsing ──

/// Parse a FITS ASCII-table TFORM string such as `"A20"`, `"I10"`, `"F12.4"`,
/// `"E15.7"`, or `"D25.17"`.
pub fn parse_tform_ascii(s: &str) -> Result<AsciiColumnFormat> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::FormatKind(String::from("empty TFORM string")));
    }

    let code = s.as_bytes()[0];
    let rest = &s[1..];

    match code {
        b'A' => {
            let w = parse_usize(rest)?;
            Ok(AsciiColumnFormat::Character(w))
        }
        b'I' => {
            let w = parse_usize(rest)?;
            Ok(AsciiColumnFormat::Integer(w))
        }
        b'F' => {
            let (w, d) = parse_width_decimal(rest)?;
            Ok(AsciiColumnFormat::FloatF(w, d))
        }
        b'E' => {
            let (w, d) = parse_width_decimal(rest)?;
            Ok(AsciiColumnFormat::FloatE(w, d))
        }
        b'D' => {
            let (w, d) = parse_width_decimal(rest)?;
            Ok(AsciiColumnFormat::DoubleE(w, d))
        }
        other => Err(Error::FormatKind(format!("unknown TFORM type character: {}", other as char))),
    }
}

/// Parse a `TDISPn` display-format string. Shares `TFORM`'s FORTRAN grammar
/// (`Iw`, `Fw.d`, `Ew.d`, `Dw.d`, `Aw`), but the result only ever feeds
/// human-readable rendering (e.g. the terminal inspector) -- it never
/// changes how the column is actually packed on disk.
pub fn parse_tdisp(s: &str) -> Result<AsciiColumnFormat> {
    parse_tform_ascii(s)
}

/// Look up and parse column `n`'s `TDISPn` card (1-based), if present.
pub fn find_tdisp(cards: &[Card], n: usize) -> Option<Result<AsciiColumnFormat>> {
    let tdisp_kw = format!("TDISP{}", n);
    find_card_string(cards, &tdisp_kw).map(|s| parse_tdisp(&s))
}

fn parse_usize(s: &str) -> Result<usize> {
    s.parse::<usize>()
        .map_err(|_| Error::FormatWidth(format!("invalid format width: {s}")))
}

fn parse_width_decimal(s: &str) -> Result<(usize, usize)> {
    let dot = s
        .find('.')
        .ok_or_else(|| Error::FormatWidth(format!("missing decimal point in format: {s}")))?;
    let w = parse_usize(&s[..dot])?;
    let d = parse_usize(&s[dot + 1..])?;
    Ok((w, d))
}

// ── Column Descriptor Parsing ──

/// Extract column descriptors from the header cards of an ASCII table extension.
///
/// Reads `TFORMn`, `TBCOLn`, and optionally `TTYPEn` for each column
/// `n` in `1..=tfields`.
pub fn parse_ascii_table_columns(
    cards: &[Card],
    tfields: usize,
) -> Result<Vec<AsciiColumnDescriptor>> {
    let mut columns = Vec::with_capacity(tfields);

    for i in 1..=tfields {
        let tform_kw = format!("TFORM{}", i);
        let tform_str = find_card_string(cards, &tform_kw).ok_or_else(|| {
            Error::HeaderConsistency(format!("missing mandatory keyword {tform_kw}"))
        })?;
        let fmt = parse_tform_ascii(&tform_str)?;

        let tbcol_kw = format!("TBCOL{}", i);
        let tbcol_val = find_card_integer(cards, &tbcol_kw).ok_or_else(|| {
            Error::HeaderConsistency(format!("missing mandatory keyword {tbcol_kw}"))
        })?;
        if tbcol_val < 1 {
            return Err(Error::HeaderConsistency(format!("{tbcol_kw} must be >= 1")));
        }
        let tbcol = (tbcol_val - 1) as usize; // convert to 0-indexed

        let ttype_kw = format!("TTYPE{}", i);
        let name = find_card_string(cards, &ttype_kw);

        columns.push(AsciiColumnDescriptor {
            name,
            format: fmt,
            tbcol,
        });
    }

    Ok(columns)
}

// ── Reading ──

/// Read a single column from all rows of an ASCII table HDU.
///
/// `fits_data` is the entire FITS byte stream. The HDU must describe an
/// `AsciiTable`.  `col_index` is 0-based.
pub fn read_ascii_column(fits_data: &[u8], hdu: &Hdu, col_index: usize) -> Result<AsciiColumnData> {
    let (naxis1, naxis2, tfields) = ascii_table_dims(hdu)?;
    if col_index >= tfields {
        return Err(Error::HduIndex(col_index));
    }

    let columns = parse_ascii_table_columns(&hdu.cards, tfields)?;
    let col = &columns[col_index];

    let data_start = hdu.data_start;
    if data_start + naxis1 * naxis2 > fits_data.len() {
        return Err(Error::TruncatedFile);
    }

    parse_column_values(fits_data, data_start, naxis1, naxis2, col)
}

/// Read all columns for a single row of an ASCII table HDU.
///
/// `fits_data` is the entire FITS byte stream. `row_index` is 0-based.
pub fn read_ascii_row(
    fits_data: &[u8],
    hdu: &Hdu,
    row_index: usize,
) -> Result<Vec<AsciiColumnData>> {
    let (naxis1, naxis2, tfields) = ascii_table_dims(hdu)?;
    if row_index >= naxis2 {
        return Err(Error::HduIndex(row_index));
    }

    let columns = parse_ascii_table_columns(&hdu.cards, tfields)?;
    let data_start = hdu.data_start;
    if data_start + naxis1 * naxis2 > fits_data.len() {
        return Err(Error::TruncatedFile);
    }

    let row_offset = data_start + row_index * naxis1;
    let mut result = Vec::with_capacity(tfields);

    for col in &columns {
        let field_start = row_offset + col.tbcol;
        let field_end = field_start + col.format.width();
        if field_end > fits_data.len() {
            return Err(Error::TruncatedFile);
        }
        let field_bytes = &fits_data[field_start..field_end];
        let field_str = core::str::from_utf8(field_bytes)
            .map_err(|_| Error::HeaderConsistency(String::from("table field is not valid UTF-8")))?;

        let data = parse_single_field(field_str, &col.format)?;
        result.push(data);
    }

    Ok(result)
}

// ── Writing ──

/// Format a single value from a column data vector according to its column format.
///
/// `index` selects which element of the data vector to format.
pub fn format_ascii_field(
    value: &AsciiColumnData,
    fmt: &AsciiColumnFormat,
    index: usize,
) -> Result<String> {
    let w = fmt.width();
    match (value, fmt) {
        (AsciiColumnData::Character(vals), AsciiColumnFormat::Character(_)) => {
            let s = vals
                .get(index)
                .ok_or_else(|| Error::HeaderConsistency(format!("no value at row {index}")))?;
            Ok(pad_or_truncate_left(s, w))
        }
        (AsciiColumnData::Integer(vals), AsciiColumnFormat::Integer(_)) => {
            let n = vals
                .get(index)
                .ok_or_else(|| Error::HeaderConsistency(format!("no value at row {index}")))?;
            let s = format!("{}", n);
            Ok(right_justify(&s, w))
        }
        (AsciiColumnData::Float(vals), AsciiColumnFormat::FloatF(_, d)) => {
            let f = vals
                .get(index)
                .ok_or_else(|| Error::HeaderConsistency(format!("no value at row {index}")))?;
            let s = format!("{:.*}", *d, f);
            Ok(right_justify(&s, w))
        }
        (AsciiColumnData::Float(vals), AsciiColumnFormat::FloatE(_, d)) => {
            let f = vals
                .get(index)
                .ok_or_else(|| Error::HeaderConsistency(format!("no value at row {index}")))?;
            let s = format_exponential(*f, *d);
            Ok(right_justify(&s, w))
        }
        (AsciiColumnData::Float(vals), AsciiColumnFormat::DoubleE(_, d)) => {
            let f = vals
                .get(index)
                .ok_or_else(|| Error::HeaderConsistency(format!("no value at row {index}")))?;
            let s = format_exponential_d(*f, *d);
            Ok(right_justify(&s, w))
        }
        _ => Err(Error::HeaderConsistency(String::from(
            "column data type does not match its format",
        ))),
    }
}

/// Build the header cards for an ASCII table extension.
///
/// Creates XTENSION, BITPIX, NAXIS, NAXIS1, NAXIS2, PCOUNT, GCOUNT, TFIELDS,
/// and per-column TFORMn, TBCOLn, and TTYPEn cards.
pub fn build_ascii_table_cards(
    columns: &[AsciiColumnDescriptor],
    naxis2: usize,
) -> Result<Vec<Card>> {
    let naxis1: usize = columns
        .iter()
        .map(|c| c.tbcol + c.format.width())
        .max()
        .unwrap_or(0);

    let tfields = columns.len();
    let mut cards = Vec::with_capacity(8 + tfields * 3);

    cards.push(make_card("XTENSION", Value::String(String::from("TABLE"))));
    cards.push(make_card("BITPIX", Value::Integer(8)));
    cards.push(make_card("NAXIS", Value::Integer(2)));
    cards.push(make_card("NAXIS1", Value::Integer(naxis1 as i64)));
    cards.push(make_card("NAXIS2", Value::Integer(naxis2 as i64)));
    cards.push(make_card("PCOUNT", Value::Integer(0)));
    cards.push(make_card("GCOUNT", Value::Integer(1)));
    cards.push(make_card("TFIELDS", Value::Integer(tfields as i64)));

    for (i, col) in columns.iter().enumerate() {
        let n = i + 1;

        let tform_str = format_tform(&col.format);
        cards.push(make_card(&format!("TFORM{}", n), Value::String(tform_str)));

        cards.push(make_card(
            &format!("TBCOL{}", n),
            Value::Integer((col.tbcol + 1) as i64), // back to 1-indexed
        ));

        if let Some(ref name) = col.name {
            cards.push(make_card(
                &format!("TTYPE{}", n),
                Value::String(name.clone()),
            ));
        }
    }

    Ok(cards)
}

/// Serialize column data into padded FITS data bytes for an ASCII table.
///
/// `naxis1` is the row width in bytes.  Each row is written to exactly
/// `naxis1` bytes, space-padded.  The result is padded to a FITS block
/// boundary.
pub fn serialize_ascii_table(
    columns: &[AsciiColumnDescriptor],
    col_data: &[AsciiColumnData],
    naxis1: usize,
) -> Result<Vec<u8>> {
    if columns.len() != col_data.len() {
        return Err(Error::HeaderConsistency(String::from(
            "column descriptor count does not match column data count",
        )));
    }

    let naxis2 = match col_data.first() {
        Some(AsciiColumnData::Character(v)) => v.len(),
        Some(AsciiColumnData::Integer(v)) => v.len(),
        Some(AsciiColumnData::Float(v)) => v.len(),
        None => 0,
    };

    let raw_len = naxis1 * naxis2;
    let padded_len = padded_byte_len(raw_len);
    let mut buf = vec![b' '; padded_len];

    for row in 0..naxis2 {
        let row_start = row * naxis1;
        for (col_idx, (col, data)) in columns.iter().zip(col_data.iter()).enumerate() {
            let field_str = format_ascii_field(data, &col.format, row)?;
            let field_bytes = field_str.as_bytes();
            let dest_start = row_start + col.tbcol;
            let copy_len = field_bytes.len().min(col.format.width());
            if dest_start + copy_len > raw_len {
                return Err(Error::HeaderConsistency(String::from(
                    "column field does not fit within the row",
                )));
            }
            buf[dest_start..dest_start + copy_len].copy_from_slice(&field_bytes[..copy_len]);
            let _ = col_idx;
        }
    }

    // ASCII table data sections pad to the block boundary with spaces, not
    // NUL bytes (unlike IMAGE/BINTABLE); `buf` is already space-filled.
    Ok(buf)
}

/// Build and serialize a complete ASCII table HDU (header + data).
///
/// Returns the combined header and data bytes, each padded to block boundaries.
pub fn serialize_ascii_table_hdu(
    columns: &[AsciiColumnDescriptor],
    col_data: &[AsciiColumnData],
) -> Result<Vec<u8>> {
    let naxis1: usize = columns
        .iter()
        .map(|c| c.tbcol + c.format.width())
        .max()
        .unwrap_or(0);

    let naxis2 = match col_data.first() {
        Some(AsciiColumnData::Character(v)) => v.len(),
        Some(AsciiColumnData::Integer(v)) => v.len(),
        Some(AsciiColumnData::Float(v)) => v.len(),
        None => 0,
    };

    let cards = build_ascii_table_cards(columns, naxis2)?;
    let header_bytes = crate::header::serialize_header(&cards)?;
    let data_bytes = serialize_ascii_table(columns, col_data, naxis1)?;

    let mut result = Vec::with_capacity(header_bytes.len() + data_bytes.len());
    result.extend_from_slice(&header_bytes);
    result.extend_from_slice(&data_bytes);
    Ok(result)
}

// ── Internal Helpers ──

fn ascii_table_dims(hdu: &Hdu) -> Result<(usize, usize, usize)> {
    match &hdu.info {
        HduInfo::AsciiTable {
            naxis1,
            naxis2,
            tfields,
        } => Ok((*naxis1, *naxis2, *tfields)),
        _ => Err(Error::HeaderConsistency(String::from(
            "not an ASCII table HDU",
        ))),
    }
}

fn find_card_string(cards: &[Card], keyword: &str) -> Option<String> {
    cards.iter().find_map(|c| {
        if c.keyword_str() == keyword {
            match &c.value {
                Some(Value::String(s)) => Some(s.trim().into()),
                _ => None,
            }
        } else {
            None
        }
    })
}

fn find_card_integer(cards: &[Card], keyword: &str) -> Option<i64> {
    cards.iter().find_map(|c| {
        if c.keyword_str() == keyword {
            match &c.value {
                Some(Value::Integer(n)) => Some(*n),
                _ => None,
            }
        } else {
            None
        }
    })
}

fn parse_column_values(
    fits_data: &[u8],
    data_start: usize,
    naxis1: usize,
    naxis2: usize,
    col: &AsciiColumnDescriptor,
) -> Result<AsciiColumnData> {
    match &col.format {
        AsciiColumnFormat::Character(w) => {
            let mut vals = Vec::with_capacity(naxis2);
            for row in 0..naxis2 {
                let offset = data_start + row * naxis1 + col.tbcol;
                let end = offset + w;
                if end > fits_data.len() {
                    return Err(Error::TruncatedFile);
                }
                let s = core::str::from_utf8(&fits_data[offset..end]).map_err(|_| {
                    Error::HeaderConsistency(String::from("table field is not valid UTF-8"))
                })?;
                vals.push(String::from(s.trim_end()));
            }
            Ok(AsciiColumnData::Character(vals))
        }
        AsciiColumnFormat::Integer(w) => {
            let mut vals = Vec::with_capacity(naxis2);
            for row in 0..naxis2 {
                let offset = data_start + row * naxis1 + col.tbcol;
                let end = offset + w;
                if end > fits_data.len() {
                    return Err(Error::TruncatedFile);
                }
                let s = core::str::from_utf8(&fits_data[offset..end]).map_err(|_| {
                    Error::HeaderConsistency(String::from("table field is not valid UTF-8"))
                })?;
                let n: i64 = s.trim().parse().map_err(|_| {
                    Error::HeaderConsistency(format!("invalid integer table field: {s}"))
                })?;
                vals.push(n);
            }
            Ok(AsciiColumnData::Integer(vals))
        }
        AsciiColumnFormat::FloatF(w, _)
        | AsciiColumnFormat::FloatE(w, _)
        | AsciiColumnFormat::DoubleE(w, _) => {
            let mut vals = Vec::with_capacity(naxis2);
            for row in 0..naxis2 {
                let offset = data_start + row * naxis1 + col.tbcol;
                let end = offset + w;
                if end > fits_data.len() {
                    return Err(Error::TruncatedFile);
                }
                let s = core::str::from_utf8(&fits_data[offset..end]).map_err(|_| {
                    Error::HeaderConsistency(String::from("table field is not valid UTF-8"))
                })?;
                let f = parse_fits_float(s.trim())?;
                vals.push(f);
            }
            Ok(AsciiColumnData::Float(vals))
        }
    }
}

fn parse_single_field(field_str: &str, fmt: &AsciiColumnFormat) -> Result<AsciiColumnData> {
    match fmt {
        AsciiColumnFormat::Character(_) => Ok(AsciiColumnData::Character(vec![String::from(
            field_str.trim_end(),
        )])),
        AsciiColumnFormat::Integer(_) => {
            let n: i64 = field_str.trim().parse().map_err(|_| {
                Error::HeaderConsistency(format!("invalid integer table field: {field_str}"))
            })?;
            Ok(AsciiColumnData::Integer(vec![n]))
        }
        AsciiColumnFormat::FloatF(_, _)
        | AsciiColumnFormat::FloatE(_, _)
        | AsciiColumnFormat::DoubleE(_, _) => {
            let f = parse_fits_float(field_str.trim())?;
            Ok(AsciiColumnData::Float(vec![f]))
        }
    }
}

/// Parse a FITS float string, handling `D` exponent notation.
fn parse_fits_float(s: &str) -> Result<f64> {
    let normalized = s.replace('D', "E").replace('d', "e");
    normalized
        .parse::<f64>()
        .map_err(|_| Error::HeaderConsistency(format!("invalid float table field: {s}")))
}

fn pad_or_truncate_left(s: &str, width: usize) -> String {
    if s.len() >= width {
        String::from(&s[..width])
    } else {
        let mut out = String::from(s);
        for _ in 0..(width - s.len()) {
            out.push(' ');
        }
        out
    }
}

fn right_justify(s: &str, width: usize) -> String {
    if s.len() >= width {
        String::from(&s[s.len() - width..])
    } else {
        let pad = width - s.len();
        let mut out = String::with_capacity(width);
        for _ in 0..pad {
            out.push(' ');
        }
        out.push_str(s);
        out
    }
}

fn format_exponential(f: f64, d: usize) -> String {
    format!("{:.*E}", d, f)
}

fn format_exponential_d(f: f64, d: usize) -> String {
    let s = format!("{:.*E}", d, f);
    s.replace('E', "D")
}

fn format_tform(fmt: &AsciiColumnFormat) -> String {
    match fmt {
        AsciiColumnFormat::Character(w) => format!("A{}", w),
        AsciiColumnFormat::Integer(w) => format!("I{}", w),
        AsciiColumnFormat::FloatF(w, d) => format!("F{}.{}", w, d),
        AsciiColumnFormat::FloatE(w, d) => format!("E{}.{}", w, d),
        AsciiColumnFormat::DoubleE(w, d) => format!("D{}.{}", w, d),
    }
}

fn make_card(keyword: &str, value: Value) -> Card {
    let mut kw = [b' '; 8];
    let bytes = keyword.as_bytes();
    let len = bytes.len().min(8);
    kw[..len].copy_from_slice(&bytes[..len]);
    Card {
        keyword: kw,
        value: Some(value),
        comment: None,
    }
}

// ── Tests ──
