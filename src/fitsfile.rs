//! The file engine: an in-memory [`FitsObject`] plus the disk-facing
//! operations (`create`, `read`, `extend`, `save_as`, `copy`, `collect`) and
//! the header-mutation and inspection operations built on top of it.
//!
//! Grounded on the compatibility layer's `FitsFile`/`NewFitsFile` pattern:
//! an object is assembled in memory (mandatory cards are always derived from
//! the data, never hand-edited) and only touches the filesystem at the
//! points the caller asks it to.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::fs::File;
#[cfg(feature = "std")]
use std::io::Write as _;

use crate::bintable::{
    self, serialize_binary_table, BinaryColumnData, BinaryColumnDescriptor,
};
use crate::block::{padded_byte_len, BLOCK_SIZE, CARD_SIZE};
use crate::error::{Error, Result};
use crate::extension::{build_extension_header, ExtensionType};
use crate::filename::validate_filename;
use crate::hdu::{parse_fits, Hdu, HduInfo};
use crate::header::{serialize_header, validate_required_keywords, Card, HduType};
use crate::image::{self, serialize_image, ImageData};
use crate::primary::build_primary_header;
use crate::table::{self, serialize_ascii_table, AsciiColumnData, AsciiColumnDescriptor};
use crate::value::Value;

// ── Message sink ──

/// A destination for the engine's advisory messages (the write confirmation
/// `create`/`save_as` emit when `WriteOptions::msg` is set).
///
/// Mirrors a minimal logging facade: callers that don't care wire in
/// [`NullSink`], callers running interactively wire in [`StderrSink`] (or
/// their own `tracing`/`log` bridge).
pub trait MessageSink {
    fn emit(&self, message: &str);
}

/// A sink that discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn emit(&self, _message: &str) {}
}

/// A sink that writes each message to standard error, one line at a time.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

#[cfg(feature = "std")]
impl MessageSink for StderrSink {
    fn emit(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// The default sink: [`StderrSink`] under `std`, [`NullSink`] otherwise.
#[cfg(feature = "std")]
pub fn default_sink() -> StderrSink {
    StderrSink
}

#[cfg(not(feature = "std"))]
pub fn default_sink() -> NullSink {
    NullSink
}

// ── Write options ──

/// Options shared by every disk-writing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Refuse to overwrite an existing file at the destination.
    pub protect: bool,
    /// Emit an advisory message through the caller's [`MessageSink`] on success.
    pub msg: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            protect: true,
            msg: false,
        }
    }
}

// ── In-memory data model ──

/// A single IMAGE payload: axis shape, the on-disk (signed) pixel buffer,
/// and an optional `(BZERO, BSCALE)` pair.
///
/// `offset` carries whatever calibration the header should record. Callers
/// that want the zero-offset unsigned convention build `data` and `offset`
/// via [`crate::offset::apply_offset`] before constructing this; a reader
/// that wants the native unsigned values back out calls
/// [`crate::offset::remove_offset`] on the decoded `data`/`offset` pair
/// itself. This engine never silently swaps representations depending on
/// what the header happens to say.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub naxes: Vec<usize>,
    pub data: ImageData,
    pub offset: Option<(f64, f64)>,
}

/// The data carried by one HDU, independent of its header cards.
#[derive(Debug, Clone, PartialEq)]
pub enum DataObject {
    Image(ImagePayload),
    AsciiTable {
        columns: Vec<AsciiColumnDescriptor>,
        data: Vec<AsciiColumnData>,
    },
    BinaryTable {
        columns: Vec<BinaryColumnDescriptor>,
        data: Vec<BinaryColumnData>,
        pcount: usize,
    },
}

/// One HDU's worth of state: its data plus the non-mandatory cards a caller
/// has attached (EXTNAME, COMMENT, HISTORY, custom keywords, ...).
///
/// Mandatory cards (SIMPLE/XTENSION, BITPIX, NAXIS*, PCOUNT, GCOUNT,
/// TFIELDS, TFORMn/TBCOLn/TTYPEn, EXTEND) are never stored here; they are
/// rederived from `kind` every time the HDU is serialized, so they can never
/// drift out of sync with the data. A caller who wants to change one of
/// their comments uses [`edit_key`], which is recorded in
/// `mandatory_comments` and applied at serialization time.
#[derive(Debug, Clone, PartialEq)]
pub struct HduRecord {
    pub kind: DataObject,
    pub extra_cards: Vec<Card>,
    mandatory_comments: Vec<([u8; 8], Option<String>)>,
}

impl HduRecord {
    fn new(kind: DataObject) -> Self {
        HduRecord {
            kind,
            extra_cards: Vec::new(),
            mandatory_comments: Vec::new(),
        }
    }
}

/// An in-memory FITS object: a primary HDU plus zero or more extensions.
///
/// `filename` tracks the path this object was last read from or saved to;
/// it has no bearing on serialization and is purely bookkeeping for
/// `save_as` and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FitsObject {
    pub filename: String,
    pub hdus: Vec<HduRecord>,
}

impl FitsObject {
    pub fn primary(&self) -> &HduRecord {
        &self.hdus[0]
    }

    pub fn len(&self) -> usize {
        self.hdus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hdus.is_empty()
    }
}

// ── Keyword helpers ──

/// Pad a short keyword name to 8 bytes with trailing ASCII spaces.
fn kw(name: &str) -> [u8; 8] {
    let mut buf = [b' '; 8];
    let bytes = name.as_bytes();
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

fn make_card(keyword: &str, value: Value, comment: Option<String>) -> Card {
    Card {
        keyword: kw(keyword),
        value: Some(value),
        comment,
    }
}

/// Returns `true` if `keyword` belongs to the FITS mandatory-keyword set for
/// some HDU type: `SIMPLE`, `XTENSION`, `BITPIX`, `NAXIS`, `NAXISn`,
/// `PCOUNT`, `GCOUNT`, `TFIELDS`, `TFORMn`/`TBCOLn`/`TTYPEn`, `EXTEND`,
/// `BZERO`, `BSCALE`, `END`.
///
/// This is a guard, not a per-HDU-type check: it answers "can a caller ever
/// hand-edit this name" rather than "is this mandatory for this HDU".
pub fn is_mandatory_keyword(keyword: &str) -> bool {
    let upper = keyword.trim().to_ascii_uppercase();
    let fixed = [
        "SIMPLE", "XTENSION", "BITPIX", "NAXIS", "PCOUNT", "GCOUNT", "TFIELDS", "EXTEND",
        "BZERO", "BSCALE", "END",
    ];
    if fixed.contains(&upper.as_str()) {
        return true;
    }
    for prefix in ["NAXIS", "TFORM", "TBCOL", "TTYPE"] {
        if let Some(rest) = upper.strip_prefix(prefix) {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return true;
            }
        }
    }
    false
}

fn apply_mandatory_comments(cards: &mut [Card], overrides: &[([u8; 8], Option<String>)]) {
    for card in cards.iter_mut() {
        if let Some((_, comment)) = overrides.iter().find(|(kw, _)| *kw == card.keyword) {
            card.comment.clone_from(comment);
        }
    }
}

fn bitpix_of(data: &ImageData) -> i64 {
    match data {
        ImageData::U8(_) => 8,
        ImageData::I16(_) => 16,
        ImageData::I32(_) => 32,
        ImageData::I64(_) => 64,
        ImageData::F32(_) => -32,
        ImageData::F64(_) => -64,
    }
}

fn ascii_row_count(data: &[AsciiColumnData]) -> usize {
    match data.first() {
        Some(AsciiColumnData::Character(v)) => v.len(),
        Some(AsciiColumnData::Integer(v)) => v.len(),
        Some(AsciiColumnData::Float(v)) => v.len(),
        None => 0,
    }
}

fn binary_row_count(data: &[BinaryColumnData]) -> usize {
    match data.first() {
        Some(BinaryColumnData::Logical(v)) => v.len(),
        Some(BinaryColumnData::Byte(v)) => v.len(),
        Some(BinaryColumnData::Short(v)) => v.len(),
        Some(BinaryColumnData::Int(v)) => v.len(),
        Some(BinaryColumnData::Long(v)) => v.len(),
        Some(BinaryColumnData::Float(v)) => v.len(),
        Some(BinaryColumnData::Double(v)) => v.len(),
        Some(BinaryColumnData::ComplexFloat(v)) => v.len(),
        Some(BinaryColumnData::ComplexDouble(v)) => v.len(),
        Some(BinaryColumnData::Ascii(v)) => v.len(),
        Some(BinaryColumnData::Bit(v)) => v.len(),
        None => 0,
    }
}

/// Derive the complete set of header cards for one HDU (mandatory cards
/// rebuilt from `kind`, `EXTEND`/`BZERO`/`BSCALE` inserted where applicable,
/// then the caller's non-mandatory cards). Does not include `END`;
/// [`crate::header::serialize_header`] appends that.
fn cast_header(rec: &HduRecord, is_primary: bool) -> Result<Vec<Card>> {
    let mut cards = match &rec.kind {
        DataObject::Image(img) => {
            let bitpix = bitpix_of(&img.data);
            if is_primary {
                build_primary_header(bitpix, &img.naxes)?
            } else {
                build_extension_header(ExtensionType::Image, bitpix, &img.naxes, 0, 1)?
            }
        }
        DataObject::AsciiTable { columns, data } => {
            table::build_ascii_table_cards(columns, ascii_row_count(data))?
        }
        DataObject::BinaryTable {
            columns,
            data,
            pcount,
        } => bintable::build_binary_table_cards(columns, binary_row_count(data), *pcount)?,
    };

    if let DataObject::Image(img) = &rec.kind {
        if let Some((bzero, bscale)) = img.offset {
            cards.push(make_card(
                "BZERO",
                Value::Float(bzero),
                Some("offset data range to that of unsigned integer".to_string()),
            ));
            cards.push(make_card(
                "BSCALE",
                Value::Float(bscale),
                Some("default scaling factor".to_string()),
            ));
        }
    }

    if is_primary {
        cards.push(make_card(
            "EXTEND",
            Value::Logical(true),
            Some("FITS dataset may contain extensions".to_string()),
        ));
    }

    apply_mandatory_comments(&mut cards, &rec.mandatory_comments);

    cards.extend(rec.extra_cards.iter().cloned());
    Ok(cards)
}

fn data_bytes(rec: &HduRecord) -> Result<Vec<u8>> {
    match &rec.kind {
        DataObject::Image(img) => Ok(serialize_image(&img.data)),
        DataObject::AsciiTable { columns, data } => {
            let naxis1: usize = columns
                .iter()
                .map(|c| c.tbcol + c.format.width())
                .max()
                .unwrap_or(0);
            serialize_ascii_table(columns, data, naxis1)
        }
        DataObject::BinaryTable { columns, data, .. } => {
            serialize_binary_table(columns, data, binary_row_count(data))
        }
    }
}

fn serialize_fits_object(fits: &FitsObject) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (index, rec) in fits.hdus.iter().enumerate() {
        let cards = cast_header(rec, index == 0)?;
        out.extend(serialize_header(&cards)?);
        out.extend(data_bytes(rec)?);
    }
    Ok(out)
}

// ── Reading ──

fn data_object_from_hdu(bytes: &[u8], hdu: &Hdu) -> Result<DataObject> {
    match &hdu.info {
        HduInfo::Primary { naxes, .. } | HduInfo::Image { naxes, .. } => {
            let data = image::read_image_data(bytes, hdu)?;
            let (bscale, bzero) = image::extract_bscale_bzero(&hdu.cards);
            let offset = if bscale != 1.0 || bzero != 0.0 {
                Some((bzero, bscale))
            } else {
                None
            };
            Ok(DataObject::Image(ImagePayload {
                naxes: naxes.clone(),
                data,
                offset,
            }))
        }
        HduInfo::AsciiTable { tfields, .. } => {
            let columns = table::parse_ascii_table_columns(&hdu.cards, *tfields)?;
            let mut data = Vec::with_capacity(*tfields);
            for i in 0..*tfields {
                data.push(table::read_ascii_column(bytes, hdu, i)?);
            }
            Ok(DataObject::AsciiTable { columns, data })
        }
        HduInfo::BinaryTable { tfields, pcount, .. } => {
            let columns = bintable::parse_binary_table_columns(&hdu.cards, *tfields)?;
            let mut data = Vec::with_capacity(*tfields);
            for i in 0..*tfields {
                data.push(bintable::read_binary_column(bytes, hdu, i)?);
            }
            Ok(DataObject::BinaryTable {
                columns,
                data,
                pcount: *pcount,
            })
        }
    }
}

fn extra_cards_of(hdu: &Hdu) -> (Vec<Card>, Vec<([u8; 8], Option<String>)>) {
    let mut extra = Vec::new();
    let mut mandatory_comments = Vec::new();
    for card in &hdu.cards {
        if card.is_end() {
            continue;
        }
        if is_mandatory_keyword(card.keyword_str()) {
            if card.comment.is_some() {
                mandatory_comments.push((card.keyword, card.comment.clone()));
            }
        } else {
            extra.push(card.clone());
        }
    }
    (extra, mandatory_comments)
}

fn fits_object_from_bytes(filename: &str, bytes: &[u8]) -> Result<FitsObject> {
    let parsed = parse_fits(bytes)?;
    let mut hdus = Vec::with_capacity(parsed.len());
    for hdu in parsed.iter() {
        let kind = data_object_from_hdu(bytes, hdu)?;
        let (extra_cards, mandatory_comments) = extra_cards_of(hdu);
        hdus.push(HduRecord {
            kind,
            extra_cards,
            mandatory_comments,
        });
    }
    Ok(FitsObject {
        filename: filename.to_string(),
        hdus,
    })
}

// ── Disk operations (std only: everything below touches the filesystem) ──

#[cfg(feature = "std")]
fn atomic_write(filename: &str, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(filename)?;
    match file.write_all(bytes) {
        Ok(()) => Ok(()),
        Err(e) => {
            drop(file);
            let _ = std::fs::remove_file(filename);
            Err(Error::from(e))
        }
    }
}

#[cfg(feature = "std")]
fn check_protect(filename: &str, protect: bool) -> Result<()> {
    if protect && std::path::Path::new(filename).exists() {
        return Err(Error::FileExists(filename.to_string()));
    }
    Ok(())
}

/// Build a single-HDU primary-image FITS object and write it to `filename`.
#[cfg(feature = "std")]
pub fn create(
    filename: &str,
    image: ImagePayload,
    opts: WriteOptions,
    sink: &dyn MessageSink,
) -> Result<FitsObject> {
    validate_filename(filename)?;
    check_protect(filename, opts.protect)?;

    let fits = FitsObject {
        filename: filename.to_string(),
        hdus: alloc::vec![HduRecord::new(DataObject::Image(image))],
    };

    let bytes = serialize_fits_object(&fits)?;
    atomic_write(filename, &bytes)?;
    if opts.msg {
        sink.emit(&format!("wrote {filename} ({} bytes)", bytes.len()));
    }
    Ok(fits)
}

/// Read a complete FITS file from disk into a [`FitsObject`].
#[cfg(feature = "std")]
pub fn read(filename: &str) -> Result<FitsObject> {
    let bytes = std::fs::read(filename)?;
    fits_object_from_bytes(filename, &bytes)
}

/// Append a new HDU of data to an in-memory [`FitsObject`]. Does not write
/// to disk; the caller persists the result explicitly via [`save_as`].
pub fn extend(fits: &mut FitsObject, data: DataObject) -> Result<()> {
    fits.hdus.push(HduRecord::new(data));
    Ok(())
}

/// Serialize `fits` and write it to `filename`, updating `fits.filename` on
/// success.
#[cfg(feature = "std")]
pub fn save_as(
    fits: &mut FitsObject,
    filename: &str,
    opts: WriteOptions,
    sink: &dyn MessageSink,
) -> Result<()> {
    validate_filename(filename)?;
    check_protect(filename, opts.protect)?;

    let bytes = serialize_fits_object(fits)?;
    atomic_write(filename, &bytes)?;
    fits.filename = filename.to_string();
    if opts.msg {
        sink.emit(&format!("wrote {filename} ({} bytes)", bytes.len()));
    }
    Ok(())
}

/// Copy the raw bytes of `src` to `dst`, subject to the same overwrite
/// protection as [`save_as`]. Does not parse `src`: a malformed source file
/// is copied as-is.
#[cfg(feature = "std")]
pub fn copy(src: &str, dst: &str, opts: WriteOptions, sink: &dyn MessageSink) -> Result<()> {
    validate_filename(src)?;
    validate_filename(dst)?;
    check_protect(dst, opts.protect)?;

    let bytes = std::fs::read(src)?;
    atomic_write(dst, &bytes)?;
    if opts.msg {
        sink.emit(&format!("copied {src} to {dst} ({} bytes)", bytes.len()));
    }
    Ok(())
}

/// Read a numbered sequence of single-HDU IMAGE files from `first` through
/// `last` inclusive (via [`crate::filename::next_in_sequence`]) and
/// assemble them into one multi-HDU [`FitsObject`]: the first frame becomes
/// the primary HDU, the rest become IMAGE extensions in sequence order.
///
/// Purely in-memory; the caller persists the result via [`save_as`]. Errors
/// partway through (a malformed frame, a frame with more than one HDU, or a
/// sequence that never reaches `last`) discard everything collected so far.
#[cfg(feature = "std")]
pub fn collect(first: &str, last: &str) -> Result<FitsObject> {
    let mut hdus = Vec::new();
    let mut name = first.to_string();
    loop {
        let frame = read(&name)?;
        if frame.len() != 1 {
            return Err(Error::HeaderConsistency(format!(
                "{name} has {} HDUs, expected exactly one",
                frame.len()
            )));
        }
        let rec = frame.hdus.into_iter().next().unwrap();
        match &rec.kind {
            DataObject::Image(_) => {}
            _ => {
                return Err(Error::HeaderConsistency(format!(
                    "{name} is not an IMAGE HDU"
                )))
            }
        }
        hdus.push(rec);
        if name == last {
            break;
        }
        name = crate::filename::next_in_sequence(&name)?;
    }
    Ok(FitsObject {
        filename: String::new(),
        hdus,
    })
}

// ── Header mutation ──

fn hdu_mut(fits: &mut FitsObject, index: usize) -> Result<&mut HduRecord> {
    fits.hdus.get_mut(index).ok_or(Error::HduIndex(index))
}

/// Insert a new non-mandatory card into HDU `index`.
pub fn add_key(
    fits: &mut FitsObject,
    index: usize,
    keyword: &str,
    value: Value,
    comment: Option<String>,
) -> Result<()> {
    if is_mandatory_keyword(keyword) {
        return Err(Error::MandatoryKeyword(mandatory_keyword_name(keyword)));
    }
    let rec = hdu_mut(fits, index)?;
    rec.extra_cards.push(Card {
        keyword: kw(keyword),
        value: Some(value),
        comment,
    });
    Ok(())
}

/// Replace the value and/or comment of an existing card in HDU `index`.
///
/// For a mandatory keyword only the comment is honored (mandatory values
/// are always rederived from the HDU's data on serialization, so they
/// cannot be overridden independently of it).
pub fn edit_key(
    fits: &mut FitsObject,
    index: usize,
    keyword: &str,
    value: Value,
    comment: Option<String>,
) -> Result<()> {
    let rec = hdu_mut(fits, index)?;
    if is_mandatory_keyword(keyword) {
        let kwb = kw(keyword);
        rec.mandatory_comments.retain(|(k, _)| *k != kwb);
        rec.mandatory_comments.push((kwb, comment));
        return Ok(());
    }
    let kwb = kw(keyword);
    match rec.extra_cards.iter_mut().find(|c| c.keyword == kwb) {
        Some(card) => {
            card.value = Some(value);
            card.comment = comment;
            Ok(())
        }
        None => Err(Error::HeaderConsistency(format!(
            "no existing card for keyword {keyword}"
        ))),
    }
}

/// Remove a non-mandatory card from HDU `index`. A no-op if the keyword is
/// absent.
pub fn delete_key(fits: &mut FitsObject, index: usize, keyword: &str) -> Result<()> {
    if is_mandatory_keyword(keyword) {
        return Err(Error::MandatoryKeyword(mandatory_keyword_name(keyword)));
    }
    let rec = hdu_mut(fits, index)?;
    let kwb = kw(keyword);
    rec.extra_cards.retain(|c| c.keyword != kwb);
    Ok(())
}

/// Rename a non-mandatory card in HDU `index`, keeping its value and comment.
pub fn rename_key(fits: &mut FitsObject, index: usize, old: &str, new: &str) -> Result<()> {
    if is_mandatory_keyword(old) {
        return Err(Error::MandatoryKeyword(mandatory_keyword_name(old)));
    }
    if is_mandatory_keyword(new) {
        return Err(Error::MandatoryKeyword(mandatory_keyword_name(new)));
    }
    let rec = hdu_mut(fits, index)?;
    let kwb = kw(old);
    match rec.extra_cards.iter_mut().find(|c| c.keyword == kwb) {
        Some(card) => {
            card.keyword = kw(new);
            Ok(())
        }
        None => Err(Error::HeaderConsistency(format!(
            "no existing card for keyword {old}"
        ))),
    }
}

/// Map a keyword onto the `&'static str` the closed [`Error::MandatoryKeyword`]
/// variant carries. Loses the caller's exact spelling (e.g. `naxis2` vs.
/// `NAXIS2`) in favor of a fixed, non-allocating error payload; callers that
/// need the original string should keep it on their own side.
fn mandatory_keyword_name(keyword: &str) -> &'static str {
    let upper = keyword.trim().to_ascii_uppercase();
    match upper.as_str() {
        "SIMPLE" => "SIMPLE",
        "XTENSION" => "XTENSION",
        "BITPIX" => "BITPIX",
        "PCOUNT" => "PCOUNT",
        "GCOUNT" => "GCOUNT",
        "TFIELDS" => "TFIELDS",
        "EXTEND" => "EXTEND",
        "BZERO" => "BZERO",
        "BSCALE" => "BSCALE",
        "END" => "END",
        _ if upper.starts_with("NAXIS") => "NAXISn",
        _ if upper.starts_with("TFORM") => "TFORMn",
        _ if upper.starts_with("TBCOL") => "TBCOLn",
        _ if upper.starts_with("TTYPE") => "TTYPEn",
        _ => "(mandatory)",
    }
}

// ── Inspection ──

/// A one-line-per-field human-readable summary of a parsed HDU: its kind,
/// shape, `EXTNAME` if present, and data size.
pub fn info(hdu: &Hdu) -> String {
    let mut out = String::new();
    match &hdu.info {
        HduInfo::Primary { bitpix, naxes } => {
            out.push_str(&format!(
                "PRIMARY  BITPIX={bitpix}  NAXIS={}  dims={naxes:?}",
                naxes.len()
            ));
        }
        HduInfo::Image { bitpix, naxes } => {
            out.push_str(&format!(
                "IMAGE  BITPIX={bitpix}  NAXIS={}  dims={naxes:?}",
                naxes.len()
            ));
        }
        HduInfo::AsciiTable {
            naxis1,
            naxis2,
            tfields,
        } => {
            out.push_str(&format!(
                "TABLE  rows={naxis2}  row_width={naxis1}  fields={tfields}"
            ));
        }
        HduInfo::BinaryTable {
            naxis1,
            naxis2,
            pcount,
            tfields,
        } => {
            out.push_str(&format!(
                "BINTABLE  rows={naxis2}  row_width={naxis1}  fields={tfields}  heap={pcount}"
            ));
        }
    }
    if let Some(name) = hdu
        .cards
        .iter()
        .find(|c| c.keyword_str() == "EXTNAME")
        .and_then(|c| match &c.value {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        })
    {
        out.push_str(&format!("  EXTNAME={name}"));
    }
    out.push_str(&format!(
        "  data_bytes={}",
        padded_byte_len(hdu.data_len)
    ));
    out
}

/// Enumerate the raw 80-byte header cards and raw 2880-byte data blocks of
/// `filename` in file order, each tagged with its 1-based sequential record
/// index (cards and blocks share one counter, so the first data block right
/// after a 36-card header is record 37).
#[cfg(feature = "std")]
pub fn record_dump(filename: &str) -> Result<Vec<(usize, Vec<u8>)>> {
    let bytes = std::fs::read(filename)?;
    let parsed = parse_fits(&bytes)?;
    let mut out = Vec::new();
    let mut index = 0usize;
    for hdu in parsed.iter() {
        let header_len = hdu.data_start - hdu.header_start;
        let mut off = hdu.header_start;
        while off < hdu.header_start + header_len {
            index += 1;
            out.push((index, bytes[off..off + CARD_SIZE].to_vec()));
            off += CARD_SIZE;
        }

        let padded_data_len = padded_byte_len(hdu.data_len);
        let mut doff = hdu.data_start;
        while doff < hdu.data_start + padded_data_len {
            index += 1;
            let end = (doff + BLOCK_SIZE).min(bytes.len());
            out.push((index, bytes[doff..end].to_vec()));
            doff += BLOCK_SIZE;
        }
    }
    Ok(out)
}

/// Count the HDUs in `filename` whose mandatory keywords are missing or out
/// of required order. Zero means the file is fully conformant.
#[cfg(feature = "std")]
pub fn verifier(filename: &str) -> Result<i64> {
    let bytes = std::fs::read(filename)?;
    let parsed = parse_fits(&bytes)?;
    let mut violations = 0i64;
    for (index, hdu) in parsed.iter().enumerate() {
        let hdu_type = match &hdu.info {
            HduInfo::Primary { .. } => HduType::Primary,
            HduInfo::Image { .. } => HduType::Image,
            HduInfo::AsciiTable { .. } => HduType::AsciiTable,
            HduInfo::BinaryTable { .. } => HduType::BinaryTable,
        };
        if index == 0 && hdu_type != HduType::Primary {
            violations += 1;
            continue;
        }
        if validate_required_keywords(hdu_type, &hdu.cards).is_err() {
            violations += 1;
        }
    }
    Ok(violations)
}

/// Look up a FITS glossary term (re-exported from [`crate::terminology`]).
pub fn terminology(term: &str) -> Option<&'static str> {
    crate::terminology::terminology(term)
}
