//! Primary HDU header parsing and construction.

use alloc::string::String;
use alloc::vec::Vec;

use crate::block::padded_byte_len;
#[cfg(test)]
use crate::block::BLOCK_SIZE;
use crate::error::{Error, Result};
use crate::header::{validate_required_keywords, Card, HduType};
use crate::value::Value;

const VALID_BITPIX: [i64; 6] = [8, 16, 32, 64, -32, -64];

/// Pad a short keyword name to 8 bytes with trailing ASCII spaces.
const fn kw(name: &[u8]) -> [u8; 8] {
    let mut buf = [b' '; 8];
    let mut i = 0;
    while i < name.len() && i < 8 {
        buf[i] = name[i];
        i += 1;
    }
    buf
}

const KW_BITPIX: [u8; 8] = kw(b"BITPIX");
const KW_NAXIS: [u8; 8] = kw(b"NAXIS");

fn find_keyword<'a>(cards: &'a [Card], name: &[u8; 8]) -> Option<&'a Card> {
    cards.iter().find(|c| &c.keyword == name)
}

fn naxis_keyword(n: usize) -> [u8; 8] {
    let s = alloc::format!("NAXIS{}", n);
    let mut buf = [b' '; 8];
    let bytes = s.as_bytes();
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

fn extract_integer(card: &Card, name: &'static str) -> Result<i64> {
    match &card.value {
        Some(Value::Integer(n)) => Ok(*n),
        _ => Err(missing_keyword(name)),
    }
}

fn missing_keyword(name: &'static str) -> Error {
    Error::HeaderConsistency(alloc::format!("missing mandatory keyword {name}"))
}

/// Parsed primary HDU header.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryHeader {
    /// BITPIX value (8, 16, 32, 64, -32, -64).
    pub bitpix: i64,
    /// Number of axes.
    pub naxis: usize,
    /// Dimensions (NAXIS1, NAXIS2, ..., NAXISn).
    pub naxes: Vec<usize>,
    /// All header cards for reference.
    pub cards: Vec<Card>,
}

impl PrimaryHeader {
    /// Compute the number of data bytes: `|BITPIX/8| * NAXIS1 * ... * NAXISn`.
    ///
    /// Returns 0 if NAXIS is 0 or any axis has length 0.
    pub fn data_byte_count(&self) -> usize {
        if self.naxis == 0 || self.naxes.is_empty() {
            return 0;
        }
        let bytes_per_value = (self.bitpix.unsigned_abs() / 8) as usize;
        self.naxes
            .iter()
            .copied()
            .fold(bytes_per_value, |acc, dim| acc * dim)
    }

    /// Compute the padded data size (always a multiple of 2880).
    pub fn data_padded_byte_count(&self) -> usize {
        padded_byte_len(self.data_byte_count())
    }
}

/// Parse and validate a primary HDU header from a list of cards.
pub fn parse_primary_header(cards: &[Card]) -> Result<PrimaryHeader> {
    validate_required_keywords(HduType::Primary, cards)?;

    let bitpix_card = find_keyword(cards, &KW_BITPIX).ok_or_else(|| missing_keyword("BITPIX"))?;
    let bitpix = extract_integer(bitpix_card, "BITPIX")?;
    if !VALID_BITPIX.contains(&bitpix) {
        return Err(Error::Bitpix(bitpix));
    }

    let naxis_card = find_keyword(cards, &KW_NAXIS).ok_or_else(|| missing_keyword("NAXIS"))?;
    let naxis_val = extract_integer(naxis_card, "NAXIS")?;
    if naxis_val < 0 {
        return Err(Error::HeaderConsistency(String::from("NAXIS must not be negative")));
    }
    let naxis = naxis_val as usize;

    let mut naxes = Vec::with_capacity(naxis);
    for i in 1..=naxis {
        let kw_name = naxis_keyword(i);
        let card = find_keyword(cards, &kw_name).ok_or_else(|| missing_keyword("NAXISn"))?;
        let val = extract_integer(card, "NAXISn")?;
        if val < 0 {
            return Err(Error::HeaderConsistency(String::from("NAXISn must not be negative")));
        }
        naxes.push(val as usize);
    }

    Ok(PrimaryHeader {
        bitpix,
        naxis,
        naxes,
        cards: cards.to_vec(),
    })
}

/// Build the minimal set of cards for a primary HDU header.
pub fn build_primary_header(bitpix: i64, naxes: &[usize]) -> Result<Vec<Card>> {
    if !VALID_BITPIX.contains(&bitpix) {
        return Err(Error::Bitpix(bitpix));
    }

    let mut cards = Vec::new();

    cards.push(Card {
        keyword: kw(b"SIMPLE"),
        value: Some(Value::Logical(true)),
        comment: Some(String::from("conforms to FITS standard")),
    });

    cards.push(Card {
        keyword: kw(b"BITPIX"),
        value: Some(Value::Integer(bitpix)),
        comment: Some(String::from("bits per data value")),
    });

    cards.push(Card {
        keyword: kw(b"NAXIS"),
        value: Some(Value::Integer(naxes.len() as i64)),
        comment: Some(String::from("number of axes")),
    });

    for (i, &dim) in naxes.iter().enumerate() {
        cards.push(Card {
            keyword: naxis_keyword(i + 1),
            value: Some(Value::Integer(dim as i64)),
            comment: None,
        });
    }

    Ok(cards)
}
