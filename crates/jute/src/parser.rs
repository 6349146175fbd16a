//! Recursive-descent JSON parser over any supported source encoding.
//!
//! There is no tokenizer/parser split: tokens are recognized at the point of
//! use, one method per production. The parser is monomorphized over the
//! source encoding, which selects the multi-unit string path and lets the
//! cursor's endian adaptation compile away for host-order input.
//!
//! Event dispatch, staging and error policy follow one rule: the first error
//! halts the parse, is reported through `SemanticActions::error` exactly
//! once, and is also returned to the caller.

use crate::actions::{NoncharacterHandling, SemanticActions};
use crate::codepoint::{is_code_point, is_noncharacter, is_surrogate, utf8_is_lead};
use crate::convert::{CodePointFilter, ConvertError, DecodeUnits, FilterKind, Utf8};
use crate::cursor::Cursor;
use crate::encoding::{CodeUnit, Encoding, Endianness, SourceEncoding, Utf8Source};
use crate::encoding::{Utf16BeSource, Utf16LeSource, Utf32BeSource, Utf32LeSource};
use crate::errors::{parse_err, parse_error, ParseError, ParseResult, DEFAULT_RECURSION_LIMIT};
use crate::number::{JsonNumber, NumberBuilder};
use crate::staging::{Mode, PreExtend, StringStaging};

/// Knobs for a parser instance.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Maximum container nesting depth before `NestingTooDeep`.
    pub recursion_limit: u8,
    /// Consume whitespace after the top-level value (default true).
    pub skip_trailing_whitespace: bool,
    /// Allow large string values to reach the sink in chunks through
    /// `value_string`.
    pub allow_partial_strings: bool,
    /// Stage decoded strings as UTF-32 code points and re-encode into the
    /// sink encoding when a chunk is handed over.
    pub stage_chars: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            skip_trailing_whitespace: true,
            allow_partial_strings: false,
            stage_chars: false,
        }
    }
}

/// Outcome of the last parse, kept for callers that inspect the parser
/// instead of the returned `Result`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    error: Option<ParseError>,
}

impl ParserState {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.error_type.to_string())
    }
}

/// The parser core, generic over source encoding and semantic actions.
pub struct Parser<'j, 'a, E: SourceEncoding, A: SemanticActions> {
    cursor: Cursor<'j, E>,
    actions: &'a mut A,
    state: ParserState,
    staging: StringStaging,
    number: NumberBuilder,
    filter: CodePointFilter,
    options: ParserOptions,
    sink: Encoding,
    depth: u8,
    config_error: Option<ParseError>,
}

impl<'j, 'a, E: SourceEncoding, A: SemanticActions> Parser<'j, 'a, E, A> {
    pub fn new(data: &'j [u8], actions: &'a mut A) -> Self {
        Self::with_options(data, actions, ParserOptions::default())
    }

    pub fn with_options(data: &'j [u8], actions: &'a mut A, options: ParserOptions) -> Self {
        let mut config_error = None;
        let filter = match actions.noncharacter_handling() {
            NoncharacterHandling::SignalError => {
                CodePointFilter::rejecting(FilterKind::NoncharacterOrNul)
            }
            NoncharacterHandling::Substitute => CodePointFilter::new(FilterKind::NoncharacterOrNul),
            // declared by the interface but not implemented; refuse rather
            // than silently degrade
            NoncharacterHandling::Skip => {
                config_error = Some(parse_error!(InternalLogicError, 0));
                CodePointFilter::rejecting(FilterKind::NoncharacterOrNul)
            }
        };
        let sink = actions.output_encoding();
        // staging and sink must be addressable in host order
        if sink.endianness() != Endianness::HOST {
            config_error.get_or_insert(parse_error!(InternalLogicError, 0));
        }
        let mut staging = if options.stage_chars {
            StringStaging::staged_chars(sink, Mode::Data)
        } else {
            StringStaging::new(sink, Mode::Data)
        };
        staging.set_partial_strings(options.allow_partial_strings);
        Self {
            cursor: Cursor::new(data),
            actions,
            state: ParserState::default(),
            staging,
            number: NumberBuilder::new(),
            filter,
            options,
            sink,
            depth: 0,
            config_error,
        }
    }

    /// Drive the grammar over the whole input.
    ///
    /// On failure the error has already been delivered to
    /// `SemanticActions::error` and is kept in [`Self::state`].
    pub fn parse(&mut self) -> ParseResult<()> {
        if let Some(e) = self.config_error.clone() {
            return self.fail(e);
        }
        if self.actions.is_canceled() {
            let e = parse_error!(Canceled, self.cursor.index);
            return self.fail(e);
        }
        self.actions.input_encoding(E::TAG.name());
        self.actions.parse_begin();
        match self.parse_text() {
            Ok(()) => {
                if self.options.skip_trailing_whitespace {
                    self.skip_whitespace();
                }
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Clear error state, buffers and the number builder, and rewind the
    /// cursor for re-use.
    pub fn reset(&mut self) {
        self.state = ParserState::default();
        self.staging.begin_string();
        self.number.clear();
        self.depth = 0;
        self.cursor.index = 0;
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Byte position after the last consumed code unit.
    pub fn consumed(&self) -> usize {
        self.cursor.index
    }

    /// Proxy to the semantic actions' payload.
    pub fn result(&mut self) -> Option<A::Result> {
        self.actions.result()
    }

    fn fail(&mut self, e: ParseError) -> ParseResult<()> {
        self.actions.error(&e, &e.error_type.to_string());
        self.state.error = Some(e.clone());
        Err(e)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.cursor.get() {
            match c {
                0x20 | 0x09 | 0x0A | 0x0D => self.cursor.bump(),
                _ => return,
            }
        }
    }

    // text => object | array
    fn parse_text(&mut self) -> ParseResult<()> {
        self.skip_whitespace();
        match self.cursor.get() {
            None => parse_err!(EmptyText, self.cursor.index),
            Some(c) if c == u32::from(b'[') => {
                self.actions.begin_array();
                self.parse_array()?;
                self.actions.end_array();
                self.actions.parse_end();
                Ok(())
            }
            Some(c) if c == u32::from(b'{') => {
                self.actions.begin_object();
                self.parse_object()?;
                if !self.actions.end_object() {
                    return parse_err!(DuplicateKey, self.cursor.index);
                }
                self.actions.parse_end();
                Ok(())
            }
            Some(0) => parse_err!(UnicodeNulNotAllowed, self.cursor.index),
            Some(_) => parse_err!(ExpectedArrayOrObject, self.cursor.index),
        }
    }

    fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= self.options.recursion_limit {
            return parse_err!(NestingTooDeep, self.cursor.index);
        }
        self.depth += 1;
        Ok(())
    }

    // the cursor sits on '['; consumes through the matching ']'
    fn parse_array(&mut self) -> ParseResult<()> {
        self.enter()?;
        self.cursor.bump();
        self.skip_whitespace();
        match self.cursor.get() {
            None => return parse_err!(UnexpectedEnd, self.cursor.index),
            Some(c) if c == u32::from(b']') => {
                self.cursor.bump();
                self.depth -= 1;
                return Ok(());
            }
            Some(0) => return parse_err!(UnicodeNulNotAllowed, self.cursor.index),
            Some(_) => (),
        }
        let mut index = 0;
        loop {
            self.actions.begin_value_at_index(index);
            self.parse_value()?;
            self.actions.end_value_at_index(index);
            match self.cursor.get() {
                Some(c) if c == u32::from(b',') => {
                    self.cursor.bump();
                    self.skip_whitespace();
                    if self.cursor.at_end() {
                        return parse_err!(UnexpectedEnd, self.cursor.index);
                    }
                    index += 1;
                }
                Some(c) if c == u32::from(b']') => {
                    self.cursor.bump();
                    self.depth -= 1;
                    return Ok(());
                }
                None => return parse_err!(UnexpectedEnd, self.cursor.index),
                Some(_) => return parse_err!(ExpectedTokenArrayEnd, self.cursor.index),
            }
        }
    }

    // the cursor sits on '{'; consumes through the matching '}'
    fn parse_object(&mut self) -> ParseResult<()> {
        self.enter()?;
        self.cursor.bump();
        self.skip_whitespace();
        match self.cursor.get() {
            None => return parse_err!(UnexpectedEnd, self.cursor.index),
            Some(c) if c == u32::from(b'}') => {
                self.cursor.bump();
                self.depth -= 1;
                return Ok(());
            }
            Some(0) => return parse_err!(UnicodeNulNotAllowed, self.cursor.index),
            Some(_) => (),
        }
        self.parse_key_value_list()?;
        match self.cursor.get() {
            Some(c) if c == u32::from(b'}') => {
                self.cursor.bump();
                self.depth -= 1;
                Ok(())
            }
            Some(0) => parse_err!(UnicodeNulNotAllowed, self.cursor.index),
            None => parse_err!(UnexpectedEnd, self.cursor.index),
            Some(_) => parse_err!(ExpectedTokenObjectEnd, self.cursor.index),
        }
    }

    // string ':' value (',' string ':' value)*
    fn parse_key_value_list(&mut self) -> ParseResult<()> {
        // each nesting level stages its keys separately; the buffer is
        // small and dies with the list
        let mut key_staging = if self.options.stage_chars {
            StringStaging::staged_chars(self.sink, Mode::Key)
        } else {
            StringStaging::new(self.sink, Mode::Key)
        };
        key_staging.set_partial_strings(self.options.allow_partial_strings);

        let mut index = 0;
        loop {
            match self.cursor.get() {
                Some(c) if c == u32::from(b'"') => (),
                None => return parse_err!(UnexpectedEnd, self.cursor.index),
                Some(_) => return parse_err!(ExpectedStringKey, self.cursor.index),
            }
            self.parse_string(&mut key_staging)?;
            {
                let key = key_staging.sink_chunk();
                self.actions.push_key(&key);
            }
            match self.cursor.get() {
                Some(c) if c == u32::from(b':') => {
                    self.cursor.bump();
                    self.skip_whitespace();
                    if self.cursor.at_end() {
                        return parse_err!(UnexpectedEnd, self.cursor.index);
                    }
                }
                None => return parse_err!(UnexpectedEnd, self.cursor.index),
                Some(_) => return parse_err!(ExpectedTokenKeyValueSep, self.cursor.index),
            }
            {
                let key = key_staging.sink_chunk();
                self.actions.begin_value_with_key(&key, index);
            }
            self.parse_value()?;
            {
                let key = key_staging.sink_chunk();
                self.actions.end_value_with_key(&key, index);
            }
            match self.cursor.get() {
                Some(c) if c == u32::from(b',') => {
                    self.cursor.bump();
                    self.skip_whitespace();
                    index += 1;
                }
                // '}' (or anything else) is the caller's business
                Some(_) => return Ok(()),
                None => return parse_err!(UnexpectedEnd, self.cursor.index),
            }
        }
    }

    fn parse_value(&mut self) -> ParseResult<()> {
        match self.cursor.get() {
            Some(c) if c == u32::from(b'"') => {
                let mut staging = self.take_data_staging();
                let parsed = self.parse_string(&mut staging);
                let dispatched = parsed.map(|()| {
                    let flushed = staging.has_flushed();
                    let chunk = staging.sink_chunk();
                    if flushed {
                        self.actions.value_string(&chunk, false);
                    } else {
                        self.actions.push_string(&chunk);
                    }
                });
                self.staging = staging;
                dispatched
            }
            Some(c) if c == u32::from(b'{') => {
                self.actions.begin_object();
                self.parse_object()?;
                if !self.actions.end_object() {
                    return parse_err!(DuplicateKey, self.cursor.index);
                }
                self.skip_whitespace();
                Ok(())
            }
            Some(c) if c == u32::from(b'[') => {
                self.actions.begin_array();
                self.parse_array()?;
                self.actions.end_array();
                self.skip_whitespace();
                Ok(())
            }
            Some(c) if c == u32::from(b'-') || (c >= u32::from(b'0') && c <= u32::from(b'9')) => {
                self.number.clear();
                self.parse_number()?;
                let number = JsonNumber::new(&self.number);
                self.actions.push_number(&number);
                Ok(())
            }
            Some(c) if c == u32::from(b't') => {
                self.match_ident(b"true")?;
                self.actions.push_boolean(true);
                self.skip_whitespace();
                Ok(())
            }
            Some(c) if c == u32::from(b'f') => {
                self.match_ident(b"false")?;
                self.actions.push_boolean(false);
                self.skip_whitespace();
                Ok(())
            }
            Some(c) if c == u32::from(b'n') => {
                self.match_ident(b"null")?;
                self.actions.push_null();
                self.skip_whitespace();
                Ok(())
            }
            Some(0) => parse_err!(UnicodeNulNotAllowed, self.cursor.index),
            None => parse_err!(UnexpectedEnd, self.cursor.index),
            Some(_) => parse_err!(ExpectedValue, self.cursor.index),
        }
    }

    fn match_ident(&mut self, ident: &'static [u8]) -> ParseResult<()> {
        for expected in ident {
            match self.cursor.get() {
                Some(c) if c == u32::from(*expected) => self.cursor.bump(),
                None => return parse_err!(UnexpectedEnd, self.cursor.index),
                Some(_) => return parse_err!(ExpectedValue, self.cursor.index),
            }
        }
        Ok(())
    }

    fn take_data_staging(&mut self) -> StringStaging {
        std::mem::replace(&mut self.staging, StringStaging::new(Encoding::Utf8, Mode::Data))
    }

    // ---------------------------------------------------------------------
    // staging plumbing
    // ---------------------------------------------------------------------

    /// Guarantee room for `units` more code units, flushing a chunk to the
    /// sink if the buffer elects to.
    fn staging_make_room(&mut self, staging: &mut StringStaging, units: usize) -> ParseResult<()> {
        match staging.pre_extend(units) {
            PreExtend::Ready => Ok(()),
            PreExtend::FlushFirst => {
                {
                    let chunk = staging.sink_chunk();
                    self.actions.value_string(&chunk, true);
                }
                staging.reset_after_flush();
                match staging.pre_extend(units) {
                    PreExtend::Ready => Ok(()),
                    _ => parse_err!(InternalLogicError, self.cursor.index),
                }
            }
            PreExtend::KeyTooLarge => parse_err!(KeyStringTooLarge, self.cursor.index),
        }
    }

    fn staging_push_ascii(&mut self, staging: &mut StringStaging, ch: u8) -> ParseResult<()> {
        self.staging_make_room(staging, 1)?;
        staging.append_ascii(ch);
        Ok(())
    }

    /// Run the filter over a decoded scalar value and append the survivor.
    fn staging_push_unicode(
        &mut self,
        staging: &mut StringStaging,
        cp: u32,
        at: usize,
    ) -> ParseResult<()> {
        let cp = match self.filter.apply(cp) {
            Ok(cp) => cp,
            Err(ConvertError::FilterRejected(cp)) => return Err(self.filter_rejection(cp, at)),
            Err(_) => return parse_err!(InternalLogicError, at),
        };
        self.staging_make_room(staging, staging.max_units_per_char())?;
        staging.append_unicode(cp);
        Ok(())
    }

    fn filter_rejection(&self, cp: u32, at: usize) -> ParseError {
        if cp == 0 {
            parse_error!(UnicodeNulNotAllowed, at)
        } else if is_noncharacter(cp) {
            parse_error!(UnicodeNonCharacter, at)
        } else {
            parse_error!(UnicodeRejectedByFilter, at)
        }
    }

    // ---------------------------------------------------------------------
    // strings
    // ---------------------------------------------------------------------

    /// Parse a string literal into `staging`; the cursor sits on the
    /// opening quote and ends past the closing quote and any trailing
    /// whitespace.
    fn parse_string(&mut self, staging: &mut StringStaging) -> ParseResult<()> {
        staging.begin_string();
        self.cursor.bump();
        match E::Unit::WIDTH {
            1 => self.parse_string_utf8(staging),
            2 => self.parse_string_utf16(staging),
            _ => self.parse_string_utf32(staging),
        }
    }

    fn parse_string_utf8(&mut self, staging: &mut StringStaging) -> ParseResult<()> {
        while let Some(c) = self.cursor.get() {
            // ASCII except control characters
            if c.wrapping_sub(0x20) < 0x60 {
                match c as u8 {
                    b'"' => {
                        self.cursor.bump();
                        self.skip_whitespace();
                        return Ok(());
                    }
                    b'\\' => self.escape_sequence(staging)?,
                    ch => {
                        self.staging_push_ascii(staging, ch)?;
                        self.cursor.bump();
                    }
                }
            } else if utf8_is_lead(c as u8) {
                self.parse_string_utf8_mb(staging)?;
            } else if c == 0 {
                return parse_err!(UnicodeNulNotAllowed, self.cursor.index);
            } else if c < 0x20 {
                return parse_err!(ControlCharNotAllowed, self.cursor.index);
            } else {
                // stray trail byte or invalid start byte
                return parse_err!(IllformedUnicodeSequence, self.cursor.index);
            }
        }
        parse_err!(UnexpectedEnd, self.cursor.index)
    }

    /// Decode one multi-byte UTF-8 character through the strict decoder and
    /// push it; the cursor sits on a lead byte.
    fn parse_string_utf8_mb(&mut self, staging: &mut StringStaging) -> ParseResult<()> {
        let at = self.cursor.index;
        let mut index = at;
        match Utf8::decode_one(self.cursor.data(), &mut index) {
            Ok(cp) => {
                self.cursor.index = index;
                self.staging_push_unicode(staging, cp, at)
            }
            Err(ConvertError::UnexpectedEnd) => parse_err!(UnexpectedEnd, self.cursor.data().len()),
            Err(_) => parse_err!(IllformedUnicodeSequence, at),
        }
    }

    fn parse_string_utf16(&mut self, staging: &mut StringStaging) -> ParseResult<()> {
        while let Some(c) = self.cursor.get() {
            if c.wrapping_sub(0x20) < 0x60 {
                match c as u8 {
                    b'"' => {
                        self.cursor.bump();
                        self.skip_whitespace();
                        return Ok(());
                    }
                    b'\\' => self.escape_sequence(staging)?,
                    ch => {
                        self.staging_push_ascii(staging, ch)?;
                        self.cursor.bump();
                    }
                }
            } else if !is_surrogate(c) {
                if c == 0 {
                    return parse_err!(UnicodeNulNotAllowed, self.cursor.index);
                } else if c < 0x20 {
                    return parse_err!(ControlCharNotAllowed, self.cursor.index);
                }
                let at = self.cursor.index;
                self.staging_push_unicode(staging, c, at)?;
                self.cursor.bump();
            } else if E::is_lead(c) {
                let at = self.cursor.index;
                self.cursor.bump();
                match self.cursor.get() {
                    Some(c2) if E::is_trail(c2) => {
                        let cp = crate::codepoint::combine_surrogates(c, c2);
                        self.staging_push_unicode(staging, cp, at)?;
                        self.cursor.bump();
                    }
                    Some(_) => return parse_err!(ExpectedLowSurrogate, self.cursor.index),
                    None => return parse_err!(UnexpectedEnd, self.cursor.index),
                }
            } else {
                // a low surrogate with no lead
                return parse_err!(ExpectedHighSurrogate, self.cursor.index);
            }
        }
        parse_err!(UnexpectedEnd, self.cursor.index)
    }

    fn parse_string_utf32(&mut self, staging: &mut StringStaging) -> ParseResult<()> {
        while let Some(c) = self.cursor.get() {
            if c.wrapping_sub(0x20) < 0x60 {
                match c as u8 {
                    b'"' => {
                        self.cursor.bump();
                        self.skip_whitespace();
                        return Ok(());
                    }
                    b'\\' => self.escape_sequence(staging)?,
                    ch => {
                        self.staging_push_ascii(staging, ch)?;
                        self.cursor.bump();
                    }
                }
            } else if c >= 0x20 && is_code_point(c) && !is_surrogate(c) {
                let at = self.cursor.index;
                self.staging_push_unicode(staging, c, at)?;
                self.cursor.bump();
            } else if c == 0 {
                return parse_err!(UnicodeNulNotAllowed, self.cursor.index);
            } else if c < 0x20 {
                return parse_err!(ControlCharNotAllowed, self.cursor.index);
            } else {
                // surrogate code unit or beyond the codespace
                return parse_err!(InvalidUnicode, self.cursor.index);
            }
        }
        parse_err!(UnexpectedEnd, self.cursor.index)
    }

    // ---------------------------------------------------------------------
    // escapes
    // ---------------------------------------------------------------------

    // the cursor sits on the backslash
    fn escape_sequence(&mut self, staging: &mut StringStaging) -> ParseResult<()> {
        self.cursor.bump();
        let Some(c) = self.cursor.get() else {
            return parse_err!(UnexpectedEnd, self.cursor.index);
        };
        if c > 0x7F {
            return parse_err!(InvalidEscapeSequence, self.cursor.index);
        }
        let ascii = match c as u8 {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let at = self.cursor.index;
                let cp = self.escaped_unicode()?;
                return self.staging_push_unicode(staging, cp, at);
            }
            _ => return parse_err!(InvalidEscapeSequence, self.cursor.index),
        };
        self.staging_push_ascii(staging, ascii)?;
        self.cursor.bump();
        Ok(())
    }

    /// Decode `uXXXX`, combining a surrogate pair when the first escape is
    /// a high surrogate. The cursor sits on the `u` and ends past the last
    /// hex digit.
    fn escaped_unicode(&mut self) -> ParseResult<u32> {
        self.cursor.bump();
        let first = u32::from(self.hex4()?);
        if !is_surrogate(first) {
            return Ok(first);
        }
        if !crate::codepoint::is_high_surrogate(first) {
            return parse_err!(ExpectedHighSurrogate, self.cursor.index);
        }
        // the pair must continue with "\uXXXX" holding a low surrogate
        match self.cursor.get() {
            Some(c) if c == u32::from(b'\\') => self.cursor.bump(),
            None => return parse_err!(UnexpectedEnd, self.cursor.index),
            Some(_) => return parse_err!(ExpectedLowSurrogate, self.cursor.index),
        }
        match self.cursor.get() {
            Some(c) if c == u32::from(b'u') => self.cursor.bump(),
            None => return parse_err!(UnexpectedEnd, self.cursor.index),
            Some(_) => return parse_err!(ExpectedLowSurrogate, self.cursor.index),
        }
        let second = u32::from(self.hex4()?);
        if crate::codepoint::is_low_surrogate(second) {
            Ok(crate::codepoint::combine_surrogates(first, second))
        } else {
            parse_err!(ExpectedLowSurrogate, self.cursor.index)
        }
    }

    fn hex4(&mut self) -> ParseResult<u16> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let Some(c) = self.cursor.get() else {
                return parse_err!(UnexpectedEnd, self.cursor.index);
            };
            let digit = match c as u8 {
                d @ b'0'..=b'9' if c < 0x80 => d - b'0',
                d @ b'a'..=b'f' if c < 0x80 => d - b'a' + 10,
                d @ b'A'..=b'F' if c < 0x80 => d - b'A' + 10,
                _ => return parse_err!(InvalidHexValue, self.cursor.index),
            };
            value = (value << 4) + u16::from(digit);
            self.cursor.bump();
        }
        Ok(value)
    }

    // ---------------------------------------------------------------------
    // numbers
    // ---------------------------------------------------------------------

    /// The number state machine; consumes the literal and trailing
    /// whitespace, leaving the result in the builder.
    fn parse_number(&mut self) -> ParseResult<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum S {
            Start,
            Sign,
            IntZero,
            Int,
            Point,
            Fractional,
            ExpStart,
            ExpSign,
            Exp,
        }

        let mut s = S::Start;
        while let Some(c) = self.cursor.get() {
            let byte = if c < 0x80 { c as u8 } else { 0xFF };
            match (s, byte) {
                (S::Start, b'-') => {
                    self.number.push_sign(true);
                    s = S::Sign;
                }
                (S::Start | S::Sign, b'0') => {
                    self.number.push_integer_start(b'0');
                    s = S::IntZero;
                }
                (S::Start | S::Sign, d @ b'1'..=b'9') => {
                    self.number.push_integer_start(d);
                    self.consume_digit_run();
                    s = S::Int;
                    continue;
                }
                // a leading zero must be the whole integer part
                (S::IntZero, b'0'..=b'9') => {
                    return parse_err!(BadNumber, self.cursor.index);
                }
                (S::IntZero | S::Int, b'.') => {
                    self.number.integer_end();
                    self.number.push_decimal_point();
                    s = S::Point;
                }
                (S::IntZero | S::Int, b'e' | b'E') => {
                    self.number.integer_end();
                    self.number.push_exponent_indicator(byte);
                    s = S::ExpStart;
                }
                (S::Point, d @ b'0'..=b'9') => {
                    self.number.push_fractional_start(d);
                    self.consume_digit_run();
                    s = S::Fractional;
                    continue;
                }
                (S::Fractional, b'e' | b'E') => {
                    self.number.fractional_end();
                    self.number.push_exponent_indicator(byte);
                    s = S::ExpStart;
                }
                (S::ExpStart, b'+' | b'-') => {
                    self.number.push_exponent_start(byte);
                    s = S::ExpSign;
                }
                (S::ExpStart, d @ b'0'..=b'9') => {
                    self.number.push_exponent_start(d);
                    self.consume_digit_run();
                    s = S::Exp;
                    continue;
                }
                (S::ExpSign, d @ b'0'..=b'9') => {
                    self.number.push_digit(d);
                    self.consume_digit_run();
                    s = S::Exp;
                    continue;
                }
                _ => break,
            }
            self.cursor.bump();
        }

        match s {
            S::IntZero | S::Int => self.number.integer_end(),
            S::Fractional => self.number.fractional_end(),
            S::Exp => self.number.exponent_end(),
            _ => return parse_err!(BadNumber, self.cursor.index),
        }
        self.skip_whitespace();
        Ok(())
    }

    /// Consume the digit the cursor sits on plus any digits following it.
    fn consume_digit_run(&mut self) {
        self.cursor.bump();
        while let Some(c) = self.cursor.get() {
            if c >= u32::from(b'0') && c <= u32::from(b'9') {
                self.number.push_digit(c as u8);
                self.cursor.bump();
            } else {
                break;
            }
        }
    }
}

/// Detect the encoding from a leading BOM (defaulting to UTF-8 when absent)
/// and parse; the BOM itself is consumed and never reaches the grammar.
pub fn parse_bytes<A: SemanticActions>(
    data: &[u8],
    actions: &mut A,
    options: ParserOptions,
) -> ParseResult<()> {
    let (encoding, bom_len) = Encoding::detect(data).unwrap_or((Encoding::Utf8, 0));
    let body = &data[bom_len..];
    match encoding {
        Encoding::Utf8 => Parser::<Utf8Source, A>::with_options(body, actions, options).parse(),
        Encoding::Utf16Le => {
            Parser::<Utf16LeSource, A>::with_options(body, actions, options).parse()
        }
        Encoding::Utf16Be => {
            Parser::<Utf16BeSource, A>::with_options(body, actions, options).parse()
        }
        Encoding::Utf32Le => {
            Parser::<Utf32LeSource, A>::with_options(body, actions, options).parse()
        }
        Encoding::Utf32Be => {
            Parser::<Utf32BeSource, A>::with_options(body, actions, options).parse()
        }
    }
}
