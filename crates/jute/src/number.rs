//! Number builder.
//!
//! The parser feeds this builder one event per token class while it walks a
//! numeric literal, so digit positions are recorded as they arrive and the
//! literal never has to be scanned twice. The builder owns the ASCII lexeme
//! and five (start, end) ranges into it: sign, integer, decimal point,
//! fractional and exponent.

use lexical_parse_float::{format as lexical_format, FromLexicalWithOptions, Options as ParseFloatOptions};

use crate::errors::ParseErrorType;

// u64 holds every 19-digit decimal number
const U64_DIGITS10: usize = 19;

/// Half-open range into the lexeme buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }
}

/// The five ranges of a JSON number literal, in order of appearance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberParts {
    pub sign: Span,
    pub integer: Span,
    pub decimal_point: Span,
    pub fractional: Span,
    pub exponent: Span,
}

/// `(mantissa, exponent, sign)` form of a literal: the literal's value is
/// `mantissa * 10^exponent`, negated if `negative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedNumber {
    pub mantissa: u64,
    pub exponent: i16,
    pub negative: bool,
}

/// A parsed number, tagged integer or float.
///
/// `Float(f64::NAN)` only ever appears as the sentinel for a lexeme that
/// never completed, which a successful parse rules out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaggedNumber {
    Integer(i64),
    Float(f64),
}

/// Accumulates one numeric literal from parser events.
#[derive(Debug)]
pub struct NumberBuilder {
    buf: Vec<u8>,
    parts: NumberParts,
}

impl Default for NumberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberBuilder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            parts: NumberParts::default(),
        }
    }

    /// Forget the previous literal, reusing the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.parts = NumberParts::default();
    }

    fn index(&self) -> usize {
        self.buf.len()
    }

    pub fn push_sign(&mut self, negative: bool) {
        self.parts.sign.start = self.index();
        self.buf.push(if negative { b'-' } else { b'+' });
        self.parts.sign.end = self.index();
    }

    pub fn push_integer_start(&mut self, digit: u8) {
        self.parts.integer.start = self.index();
        self.buf.push(digit);
    }

    pub fn integer_end(&mut self) {
        self.parts.integer.end = self.index();
    }

    pub fn push_decimal_point(&mut self) {
        self.parts.decimal_point.start = self.index();
        self.buf.push(b'.');
        self.parts.decimal_point.end = self.index();
    }

    pub fn push_fractional_start(&mut self, digit: u8) {
        self.parts.fractional.start = self.index();
        self.buf.push(digit);
    }

    pub fn fractional_end(&mut self) {
        self.parts.fractional.end = self.index();
    }

    pub fn push_exponent_indicator(&mut self, e_or_upper_e: u8) {
        debug_assert!(matches!(e_or_upper_e, b'e' | b'E'));
        self.buf.push(e_or_upper_e);
    }

    pub fn push_exponent_start(&mut self, digit_or_sign: u8) {
        self.parts.exponent.start = self.index();
        self.buf.push(digit_or_sign);
    }

    pub fn exponent_end(&mut self) {
        self.parts.exponent.end = self.index();
    }

    /// Extend whichever range is currently open.
    pub fn push_digit(&mut self, digit: u8) {
        self.buf.push(digit);
    }

    /// The literal exactly as it appeared in the input.
    pub fn verbatim(&self) -> &str {
        // safety: only ASCII sign/digit/point/exponent bytes are ever pushed
        unsafe { std::str::from_utf8_unchecked(&self.buf) }
    }

    pub fn parts(&self) -> &NumberParts {
        &self.parts
    }

    pub fn is_negative(&self) -> bool {
        !self.parts.sign.is_empty() && self.buf[self.parts.sign.start] == b'-'
    }

    /// True if the literal has neither a decimal point nor an exponent.
    pub fn is_integer(&self) -> bool {
        self.parts.decimal_point.is_empty() && self.parts.exponent.is_empty()
    }

    fn span_bytes(&self, span: Span) -> &[u8] {
        &self.buf[span.start..span.end]
    }

    /// The explicit exponent as written, without the fractional correction.
    fn explicit_exponent(&self) -> Result<i64, ParseErrorType> {
        let bytes = self.span_bytes(self.parts.exponent);
        if bytes.is_empty() {
            return Ok(0);
        }
        let (digits, negative) = match bytes[0] {
            b'-' => (&bytes[1..], true),
            b'+' => (&bytes[1..], false),
            _ => (bytes, false),
        };
        let mut value: i64 = 0;
        for d in digits {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i64::from(d & 0x0F)))
                .ok_or(ParseErrorType::NumberOutOfRange)?;
        }
        Ok(if negative { -value } else { value })
    }

    /// Normalize the literal into `(mantissa, exponent, sign)`.
    ///
    /// Integer and fractional digits are concatenated into the mantissa;
    /// digits beyond u64 precision are truncated from the right with the
    /// exponent compensated. Fails with `NumberOutOfRange` when the final
    /// exponent does not fit an i16.
    pub fn normalize(&self) -> Result<NormalizedNumber, ParseErrorType> {
        let int_digits = self.span_bytes(self.parts.integer);
        let frac_digits = self.span_bytes(self.parts.fractional);
        let total = int_digits.len() + frac_digits.len();
        let strip = total.saturating_sub(U64_DIGITS10);
        let kept = total - strip;

        let mut mantissa: u64 = 0;
        for d in int_digits.iter().chain(frac_digits).take(kept) {
            mantissa = mantissa * 10 + u64::from(d & 0x0F);
        }

        // stripping k trailing digits scales the mantissa by 10^-k, so the
        // correction is k minus the number of fractional digits written
        let correction = strip as i64 - frac_digits.len() as i64;
        let exponent = self.explicit_exponent()? + correction;
        let exponent =
            i16::try_from(exponent).map_err(|_| ParseErrorType::NumberOutOfRange)?;

        Ok(NormalizedNumber {
            mantissa,
            exponent,
            negative: self.is_negative(),
        })
    }

    /// The literal as a tagged number: base-10 `i64` for integer-only
    /// literals, locale-independent decimal→double otherwise. Integer
    /// literals outside the i64 range degrade to `Float`.
    pub fn tagged(&self) -> TaggedNumber {
        if self.buf.is_empty() {
            return TaggedNumber::Float(f64::NAN);
        }
        if self.is_integer() {
            if let Some(int) = self.parse_i64() {
                return TaggedNumber::Integer(int);
            }
        }
        const JSON: u128 = lexical_format::JSON;
        let options = ParseFloatOptions::new();
        match f64::from_lexical_with_options::<JSON>(&self.buf, &options) {
            Ok(float) => TaggedNumber::Float(float),
            Err(_) => TaggedNumber::Float(f64::NAN),
        }
    }

    fn parse_i64(&self) -> Option<i64> {
        let negative = self.is_negative();
        let mut value: i64 = 0;
        for d in self.span_bytes(self.parts.integer) {
            value = value.checked_mul(10)?;
            value = if negative {
                value.checked_sub(i64::from(d & 0x0F))?
            } else {
                value.checked_add(i64::from(d & 0x0F))?
            };
        }
        Some(value)
    }
}

/// Read-only view of a finished literal, handed to the semantic actions.
#[derive(Debug, Clone, Copy)]
pub struct JsonNumber<'a> {
    builder: &'a NumberBuilder,
}

impl<'a> JsonNumber<'a> {
    pub(crate) fn new(builder: &'a NumberBuilder) -> Self {
        Self { builder }
    }

    /// The literal exactly as written.
    pub fn verbatim(&self) -> &'a str {
        self.builder.verbatim()
    }

    pub fn parts(&self) -> &'a NumberParts {
        self.builder.parts()
    }

    pub fn is_negative(&self) -> bool {
        self.builder.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.builder.is_integer()
    }

    pub fn normalize(&self) -> Result<NormalizedNumber, ParseErrorType> {
        self.builder.normalize()
    }

    pub fn tagged(&self) -> TaggedNumber {
        self.builder.tagged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(literal: &str) -> NumberBuilder {
        // drive the event API the way the parser does
        let mut b = NumberBuilder::new();
        let bytes = literal.as_bytes();
        let mut i = 0;
        if bytes[0] == b'-' {
            b.push_sign(true);
            i = 1;
        }
        b.push_integer_start(bytes[i]);
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            b.push_digit(bytes[i]);
            i += 1;
        }
        b.integer_end();
        if i < bytes.len() && bytes[i] == b'.' {
            b.push_decimal_point();
            i += 1;
            b.push_fractional_start(bytes[i]);
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                b.push_digit(bytes[i]);
                i += 1;
            }
            b.fractional_end();
        }
        if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
            b.push_exponent_indicator(bytes[i]);
            i += 1;
            if bytes[i] == b'+' || bytes[i] == b'-' {
                b.push_exponent_start(bytes[i]);
                i += 1;
                b.push_digit(bytes[i]);
            } else {
                b.push_exponent_start(bytes[i]);
            }
            i += 1;
            while i < bytes.len() {
                b.push_digit(bytes[i]);
                i += 1;
            }
            b.exponent_end();
        }
        assert_eq!(b.verbatim(), literal);
        b
    }

    #[test]
    fn normalize_mixed_literal() {
        let b = build("-12.5e+3");
        assert_eq!(
            b.normalize(),
            Ok(NormalizedNumber {
                mantissa: 125,
                exponent: 2,
                negative: true,
            })
        );
        assert_eq!(b.tagged(), TaggedNumber::Float(-12500.0));
    }

    #[test]
    fn normalize_integer() {
        let b = build("42");
        assert_eq!(
            b.normalize(),
            Ok(NormalizedNumber {
                mantissa: 42,
                exponent: 0,
                negative: false,
            })
        );
        assert_eq!(b.tagged(), TaggedNumber::Integer(42));
    }

    #[test]
    fn normalize_truncates_excess_digits() {
        // 25 integer digits: six are stripped, exponent compensates
        let b = build("1234567890123456789012345");
        let n = b.normalize().unwrap();
        assert_eq!(n.mantissa, 1_234_567_890_123_456_789);
        assert_eq!(n.exponent, 6);
        assert!(!n.negative);
    }

    #[test]
    fn normalize_fractional_truncation() {
        // 19 integer + 4 fractional digits: all fractional digits stripped
        let b = build("1234567890123456789.0123");
        let n = b.normalize().unwrap();
        assert_eq!(n.mantissa, 1_234_567_890_123_456_789);
        assert_eq!(n.exponent, 0);
    }

    #[test]
    fn normalize_exponent_overflow() {
        let b = build("1e40000");
        assert_eq!(b.normalize(), Err(ParseErrorType::NumberOutOfRange));
        let b = build("1e99999999999999999999");
        assert_eq!(b.normalize(), Err(ParseErrorType::NumberOutOfRange));
    }

    #[test]
    fn negative_zero() {
        let b = build("-0");
        let n = b.normalize().unwrap();
        assert_eq!(n.mantissa, 0);
        assert!(n.negative);
        assert_eq!(b.tagged(), TaggedNumber::Integer(0));
    }

    #[test]
    fn tagged_integer_overflow_degrades_to_float() {
        let b = build("9223372036854775807");
        assert_eq!(b.tagged(), TaggedNumber::Integer(i64::MAX));
        let b = build("9223372036854775808");
        assert_eq!(b.tagged(), TaggedNumber::Float(9.223_372_036_854_776e18));
        let b = build("-9223372036854775808");
        assert_eq!(b.tagged(), TaggedNumber::Integer(i64::MIN));
    }

    #[test]
    fn tagged_floats() {
        assert_eq!(build("0.0").tagged(), TaggedNumber::Float(0.0));
        assert_eq!(build("1e-3").tagged(), TaggedNumber::Float(0.001));
        assert_eq!(build("-1.5E+10").tagged(), TaggedNumber::Float(-1.5e10));
    }

    #[test]
    fn clear_reuses_allocation() {
        let mut b = build("123.5");
        b.clear();
        assert_eq!(b.verbatim(), "");
        b.push_integer_start(b'7');
        b.integer_end();
        assert_eq!(b.verbatim(), "7");
        assert_eq!(b.tagged(), TaggedNumber::Integer(7));
    }
}
