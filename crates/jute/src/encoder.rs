//! JSON string encoding: escaping plus re-encoding into a target encoding.

use crate::codepoint::{lead_surrogate, trail_surrogate};
use crate::convert::{CodePointFilter, ConvertError, DecodeUnits, EncodeUnits};
use crate::encoding::{CodeUnit, Endianness};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Bitmask options for [`encode_string`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    bits: u8,
}

impl EncodeOptions {
    const ESCAPE_SOLIDUS: u8 = 1 << 0;
    const ESCAPE_NON_ASCII: u8 = 1 << 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Also escape `/` as `\/`.
    pub fn escape_solidus(mut self) -> Self {
        self.bits |= Self::ESCAPE_SOLIDUS;
        self
    }

    /// Emit `\uXXXX` for every code point at or above U+0080, producing
    /// ASCII-only output.
    pub fn escape_non_ascii(mut self) -> Self {
        self.bits |= Self::ESCAPE_NON_ASCII;
        self
    }

    fn has(self, bit: u8) -> bool {
        self.bits & bit != 0
    }
}

#[inline]
fn push_ascii<D: EncodeUnits>(out: &mut Vec<D::Unit>, ch: u8) {
    D::encode_one_unchecked(u32::from(ch), out);
}

fn push_control_escape<D: EncodeUnits>(out: &mut Vec<D::Unit>, cp: u32) {
    push_ascii::<D>(out, b'\\');
    push_ascii::<D>(out, b'u');
    push_ascii::<D>(out, b'0');
    push_ascii::<D>(out, b'0');
    push_ascii::<D>(out, HEX_DIGITS[(cp >> 4) as usize & 0xF]);
    push_ascii::<D>(out, HEX_DIGITS[cp as usize & 0xF]);
}

fn push_u16_escape<D: EncodeUnits>(out: &mut Vec<D::Unit>, unit: u16) {
    push_ascii::<D>(out, b'\\');
    push_ascii::<D>(out, b'u');
    push_ascii::<D>(out, HEX_DIGITS[(unit >> 12) as usize & 0xF]);
    push_ascii::<D>(out, HEX_DIGITS[(unit >> 8) as usize & 0xF]);
    push_ascii::<D>(out, HEX_DIGITS[(unit >> 4) as usize & 0xF]);
    push_ascii::<D>(out, HEX_DIGITS[unit as usize & 0xF]);
}

/// Escape `src` as JSON string content and re-encode it from `S` to `D`.
///
/// The mandatory escape set is `"`, `\` and all control characters; the
/// options add the solidus and, with `escape_non_ascii`, every code point
/// at or above U+0080 (supplementary planes become surrogate-pair
/// escapes). The surrounding quotes are the caller's business.
///
/// Returns the number of code units written; on malformed input, the
/// code-unit index the strict decoder stopped at and why.
pub fn encode_string<S: DecodeUnits, D: EncodeUnits>(
    src: &[S::Unit],
    out: &mut Vec<D::Unit>,
    options: EncodeOptions,
) -> Result<usize, (usize, ConvertError)> {
    let start = out.len();
    let filter = CodePointFilter::default();
    let mut index = 0;
    while index < src.len() {
        let at = index;
        let cp = S::decode_one(src, &mut index).map_err(|e| (at, e))?;
        let cp = filter.apply(cp).map_err(|e| (at, e))?;
        match cp {
            0x22 => {
                push_ascii::<D>(out, b'\\');
                push_ascii::<D>(out, b'"');
            }
            0x5C => {
                push_ascii::<D>(out, b'\\');
                push_ascii::<D>(out, b'\\');
            }
            0x2F if options.has(EncodeOptions::ESCAPE_SOLIDUS) => {
                push_ascii::<D>(out, b'\\');
                push_ascii::<D>(out, b'/');
            }
            0x08 => {
                push_ascii::<D>(out, b'\\');
                push_ascii::<D>(out, b'b');
            }
            0x0C => {
                push_ascii::<D>(out, b'\\');
                push_ascii::<D>(out, b'f');
            }
            0x0A => {
                push_ascii::<D>(out, b'\\');
                push_ascii::<D>(out, b'n');
            }
            0x0D => {
                push_ascii::<D>(out, b'\\');
                push_ascii::<D>(out, b'r');
            }
            0x09 => {
                push_ascii::<D>(out, b'\\');
                push_ascii::<D>(out, b't');
            }
            c if c < 0x20 => push_control_escape::<D>(out, c),
            c if c >= 0x80 && options.has(EncodeOptions::ESCAPE_NON_ASCII) => {
                if c <= 0xFFFF {
                    push_u16_escape::<D>(out, c as u16);
                } else {
                    push_u16_escape::<D>(out, lead_surrogate(c));
                    push_u16_escape::<D>(out, trail_surrogate(c));
                }
            }
            c => {
                D::encode_one(c, out).map_err(|e| (at, e))?;
            }
        }
    }
    Ok(out.len() - start)
}

/// Write the byte order mark for the target encoding.
///
/// U+FEFF encoded in the target is exactly the BOM pattern for every
/// supported form.
pub fn write_bom<D: EncodeUnits>(out: &mut Vec<D::Unit>) {
    D::encode_one_unchecked(0xFEFF, out);
}

/// Serialize host-order code units to bytes in the requested byte order.
pub fn units_to_bytes<U: CodeUnit>(units: &[U], endianness: Endianness) -> Vec<u8> {
    let mut out = Vec::with_capacity(units.len() * U::WIDTH);
    for unit in units {
        let unit = if endianness.needs_swap() {
            unit.byte_swap()
        } else {
            *unit
        };
        unit.write_ne_bytes(&mut out);
    }
    out
}
