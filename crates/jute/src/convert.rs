//! Conversion between code-unit sequences and code points.
//!
//! Every encoding form gets a strict decoder (full well-formedness checks,
//! the only thing the parser uses on raw input) and an unchecked one for
//! sequences the caller has already validated. Encoders are symmetric.
//! [`convert_one`] composes a decoder, the active [`CodePointFilter`] and an
//! encoder into one step of the source→target matrix.
//!
//! All functions operate on host-endian code units; byte order is the
//! cursor's problem (see `cursor`).

use crate::codepoint::{
    combine_surrogates, is_code_point, is_high_surrogate, is_low_surrogate, is_noncharacter,
    is_surrogate, lead_surrogate, trail_surrogate, utf8_encoded_len_unchecked, utf8_is_trail,
    REPLACEMENT_CHARACTER, UTF8_TRAILS,
};

/// Why a conversion step failed.
///
/// `FilterRejected` carries the offending code point so callers can report
/// it; the other members describe malformed input or an unencodable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertError {
    /// A multi-unit sequence was interrupted by a non-trail unit.
    TrailExpected,
    /// A byte that can never start a UTF-8 sequence (trail, 0xC0/0xC1,
    /// 0xF5..).
    InvalidStartByte,
    /// A lead/trail combination that would decode to an overlong sequence,
    /// a surrogate, or a value beyond the codespace.
    UnconvertableOffset,
    /// A code point outside the Unicode codespace.
    InvalidCodePoint,
    /// A scalar value that is not a Unicode character.
    NoCharacter,
    /// A Unicode noncharacter.
    NonCharacter,
    /// The filter matched and its policy is to reject; the field holds the
    /// rejected code point.
    FilterRejected(u32),
    /// The input range ended inside a multi-unit sequence.
    UnexpectedEnd,
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Selects which code points the conversion layer refuses (or substitutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    /// Let everything through.
    #[default]
    None,
    /// Match Unicode noncharacters.
    Noncharacter,
    /// Match surrogate values and noncharacters.
    SurrogateOrNoncharacter,
    /// Match noncharacters and U+0000.
    NoncharacterOrNul,
}

/// A code-point predicate with a replacement policy, consulted after every
/// successful non-ASCII decode.
///
/// A replacement of 0 means "reject": matching code points make the
/// conversion fail with [`ConvertError::FilterRejected`].
#[derive(Debug, Clone, Copy)]
pub struct CodePointFilter {
    kind: FilterKind,
    replacement: u32,
}

impl Default for CodePointFilter {
    fn default() -> Self {
        Self::new(FilterKind::None)
    }
}

impl CodePointFilter {
    pub const fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            replacement: REPLACEMENT_CHARACTER,
        }
    }

    pub const fn rejecting(kind: FilterKind) -> Self {
        Self {
            kind,
            replacement: 0,
        }
    }

    pub const fn with_replacement(kind: FilterKind, replacement: u32) -> Self {
        Self { kind, replacement }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Whether the filter matches `cp`.
    #[inline]
    pub fn matches(&self, cp: u32) -> bool {
        match self.kind {
            FilterKind::None => false,
            FilterKind::Noncharacter => is_noncharacter(cp),
            FilterKind::SurrogateOrNoncharacter => is_surrogate(cp) || is_noncharacter(cp),
            FilterKind::NoncharacterOrNul => cp == 0 || is_noncharacter(cp),
        }
    }

    /// Whether matching code points are substituted rather than rejected.
    #[inline]
    pub fn replaces(&self) -> bool {
        self.replacement != 0
    }

    /// The substitute for a matched code point.
    #[inline]
    pub fn replacement(&self, _cp: u32) -> u32 {
        self.replacement
    }

    /// Run the filter over a decoded code point: pass it through, replace
    /// it, or reject it.
    #[inline]
    pub fn apply(&self, cp: u32) -> ConvertResult<u32> {
        if self.matches(cp) {
            if self.replaces() {
                Ok(self.replacement(cp))
            } else {
                Err(ConvertError::FilterRejected(cp))
            }
        } else {
            Ok(cp)
        }
    }
}

/// Decoding half of an encoding form.
pub trait DecodeUnits {
    type Unit: Copy + Into<u32>;

    /// Decode the character starting at `units[*index]`, advancing `index`
    /// past it. Strict: validates well-formedness and never reads past the
    /// end.
    fn decode_one(units: &[Self::Unit], index: &mut usize) -> ConvertResult<u32>;

    /// Decode assuming the input is well-formed.
    ///
    /// # Safety
    /// `units[*index..]` must start with a complete, well-formed character
    /// in this encoding; otherwise the result is meaningless and reads may
    /// go out of bounds.
    unsafe fn decode_one_unchecked(units: &[Self::Unit], index: &mut usize) -> u32;
}

/// Encoding half of an encoding form.
pub trait EncodeUnits {
    type Unit: Copy;

    /// Units needed to encode a valid scalar value.
    fn encoded_len(cp: u32) -> usize;

    /// Encode `cp`, appending 1..=4 units to `out` and returning how many.
    /// Strict: rejects surrogates and values beyond the codespace.
    fn encode_one(cp: u32, out: &mut Vec<Self::Unit>) -> ConvertResult<usize>;

    /// Encode assuming `cp` is a valid Unicode scalar value.
    fn encode_one_unchecked(cp: u32, out: &mut Vec<Self::Unit>) -> usize;
}

/// The UTF-8 encoding form (host-endian bytes).
pub struct Utf8;

/// The UTF-16 encoding form (host-endian units).
pub struct Utf16;

/// The UTF-32 encoding form (host-endian units).
pub struct Utf32;

impl DecodeUnits for Utf8 {
    type Unit = u8;

    fn decode_one(units: &[u8], index: &mut usize) -> ConvertResult<u32> {
        let first = *units.get(*index).ok_or(ConvertError::UnexpectedEnd)?;
        let trails = UTF8_TRAILS[first as usize];
        if trails < 0 {
            return Err(ConvertError::InvalidStartByte);
        }
        if trails == 0 {
            *index += 1;
            return Ok(first as u32);
        }

        let b1 = *units.get(*index + 1).ok_or(ConvertError::UnexpectedEnd)?;
        if !utf8_is_trail(b1) {
            return Err(ConvertError::TrailExpected);
        }
        // second-byte subranges ruling out overlongs, surrogates and values
        // beyond U+10FFFF
        match (first, b1) {
            (0xE0, 0x80..=0x9F)
            | (0xED, 0xA0..=0xBF)
            | (0xF0, 0x80..=0x8F)
            | (0xF4, 0x90..=0xBF) => return Err(ConvertError::UnconvertableOffset),
            _ => (),
        }

        let mut cp = match trails {
            1 => ((first as u32) << 6) & 0x7FF | (b1 as u32) & 0x3F,
            2 => ((first as u32) << 12) & 0xFFFF | ((b1 as u32) << 6) & 0xFFF,
            _ => ((first as u32) << 18) & 0x1F_FFFF | ((b1 as u32) << 12) & 0x3_FFFF,
        };
        for k in 2..=trails as usize {
            let b = *units.get(*index + k).ok_or(ConvertError::UnexpectedEnd)?;
            if !utf8_is_trail(b) {
                return Err(ConvertError::TrailExpected);
            }
            cp |= ((b as u32) & 0x3F) << (6 * (trails as usize - k));
        }
        *index += 1 + trails as usize;
        Ok(cp)
    }

    unsafe fn decode_one_unchecked(units: &[u8], index: &mut usize) -> u32 {
        let first = *units.get_unchecked(*index);
        *index += 1;
        if first < 0x80 {
            return first as u32;
        }
        let b1 = *units.get_unchecked(*index) as u32;
        *index += 1;
        if first < 0xE0 {
            return ((first as u32) << 6) & 0x7FF | b1 & 0x3F;
        }
        let b2 = *units.get_unchecked(*index) as u32;
        *index += 1;
        if first < 0xF0 {
            return ((first as u32) << 12) & 0xFFFF | (b1 << 6) & 0xFFF | b2 & 0x3F;
        }
        let b3 = *units.get_unchecked(*index) as u32;
        *index += 1;
        ((first as u32) << 18) & 0x1F_FFFF | (b1 << 12) & 0x3_FFFF | (b2 << 6) & 0xFFF | b3 & 0x3F
    }
}

impl EncodeUnits for Utf8 {
    type Unit = u8;

    #[inline]
    fn encoded_len(cp: u32) -> usize {
        utf8_encoded_len_unchecked(cp)
    }

    fn encode_one(cp: u32, out: &mut Vec<u8>) -> ConvertResult<usize> {
        if !is_code_point(cp) {
            return Err(ConvertError::InvalidCodePoint);
        }
        if is_surrogate(cp) {
            // surrogates have no well-formed UTF-8 representation
            return Err(ConvertError::InvalidCodePoint);
        }
        Ok(Self::encode_one_unchecked(cp, out))
    }

    fn encode_one_unchecked(cp: u32, out: &mut Vec<u8>) -> usize {
        match utf8_encoded_len_unchecked(cp) {
            1 => {
                out.push(cp as u8);
                1
            }
            2 => {
                out.push((cp >> 6) as u8 | 0xC0);
                out.push((cp & 0x3F) as u8 | 0x80);
                2
            }
            3 => {
                out.push((cp >> 12) as u8 | 0xE0);
                out.push((cp >> 6) as u8 & 0x3F | 0x80);
                out.push((cp & 0x3F) as u8 | 0x80);
                3
            }
            _ => {
                out.push((cp >> 18) as u8 | 0xF0);
                out.push((cp >> 12) as u8 & 0x3F | 0x80);
                out.push((cp >> 6) as u8 & 0x3F | 0x80);
                out.push((cp & 0x3F) as u8 | 0x80);
                4
            }
        }
    }
}

impl DecodeUnits for Utf16 {
    type Unit = u16;

    fn decode_one(units: &[u16], index: &mut usize) -> ConvertResult<u32> {
        let first = *units.get(*index).ok_or(ConvertError::UnexpectedEnd)? as u32;
        if !is_surrogate(first) {
            *index += 1;
            return Ok(first);
        }
        if !is_high_surrogate(first) {
            return Err(ConvertError::TrailExpected);
        }
        let second = *units.get(*index + 1).ok_or(ConvertError::UnexpectedEnd)? as u32;
        if !is_low_surrogate(second) {
            return Err(ConvertError::TrailExpected);
        }
        *index += 2;
        Ok(combine_surrogates(first, second))
    }

    unsafe fn decode_one_unchecked(units: &[u16], index: &mut usize) -> u32 {
        let first = *units.get_unchecked(*index) as u32;
        *index += 1;
        if !is_high_surrogate(first) {
            return first;
        }
        let second = *units.get_unchecked(*index) as u32;
        *index += 1;
        combine_surrogates(first, second)
    }
}

impl EncodeUnits for Utf16 {
    type Unit = u16;

    #[inline]
    fn encoded_len(cp: u32) -> usize {
        if cp <= 0xFFFF {
            1
        } else {
            2
        }
    }

    fn encode_one(cp: u32, out: &mut Vec<u16>) -> ConvertResult<usize> {
        if !is_code_point(cp) {
            return Err(ConvertError::InvalidCodePoint);
        }
        if is_surrogate(cp) {
            return Err(ConvertError::InvalidCodePoint);
        }
        Ok(Self::encode_one_unchecked(cp, out))
    }

    fn encode_one_unchecked(cp: u32, out: &mut Vec<u16>) -> usize {
        if cp <= 0xFFFF {
            out.push(cp as u16);
            1
        } else {
            out.push(lead_surrogate(cp));
            out.push(trail_surrogate(cp));
            2
        }
    }
}

impl DecodeUnits for Utf32 {
    type Unit = u32;

    fn decode_one(units: &[u32], index: &mut usize) -> ConvertResult<u32> {
        let cp = *units.get(*index).ok_or(ConvertError::UnexpectedEnd)?;
        if !is_code_point(cp) {
            return Err(ConvertError::InvalidCodePoint);
        }
        if is_surrogate(cp) {
            return Err(ConvertError::InvalidCodePoint);
        }
        *index += 1;
        Ok(cp)
    }

    unsafe fn decode_one_unchecked(units: &[u32], index: &mut usize) -> u32 {
        let cp = *units.get_unchecked(*index);
        *index += 1;
        cp
    }
}

impl EncodeUnits for Utf32 {
    type Unit = u32;

    #[inline]
    fn encoded_len(_cp: u32) -> usize {
        1
    }

    fn encode_one(cp: u32, out: &mut Vec<u32>) -> ConvertResult<usize> {
        if !is_code_point(cp) || is_surrogate(cp) {
            return Err(ConvertError::InvalidCodePoint);
        }
        out.push(cp);
        Ok(1)
    }

    fn encode_one_unchecked(cp: u32, out: &mut Vec<u32>) -> usize {
        out.push(cp);
        1
    }
}

/// Convert one character from `S` to `D`: strict decode, filter, encode.
///
/// Advances `index` past the consumed character and returns the number of
/// code units written to `out`.
pub fn convert_one<S: DecodeUnits, D: EncodeUnits>(
    units: &[S::Unit],
    index: &mut usize,
    out: &mut Vec<D::Unit>,
    filter: &CodePointFilter,
) -> ConvertResult<usize> {
    let cp = S::decode_one(units, index)?;
    let cp = filter.apply(cp)?;
    D::encode_one(cp, out)
}

/// Convert a whole sequence from `S` to `D` under `filter`.
///
/// Stops at the first error, reporting the code-unit index it occurred at.
pub fn convert_all<S: DecodeUnits, D: EncodeUnits>(
    units: &[S::Unit],
    out: &mut Vec<D::Unit>,
    filter: &CodePointFilter,
) -> Result<usize, (usize, ConvertError)> {
    let mut index = 0;
    let mut written = 0;
    while index < units.len() {
        let at = index;
        written += convert_one::<S, D>(units, &mut index, out, filter).map_err(|e| (at, e))?;
    }
    Ok(written)
}
