//! The pluggable callback surface the parser dispatches into.

use crate::encoding::Encoding;
use crate::errors::ParseError;
use crate::number::JsonNumber;

/// A staged string payload in the sink encoding.
///
/// Chunks always start and end on character boundaries, but remain valid
/// only until the next call into the semantic actions; implementations that
/// keep string data must copy it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    Utf8(&'a [u8]),
    Utf16(&'a [u16]),
    Utf32(&'a [u32]),
}

impl Chunk<'_> {
    /// Number of code units in the chunk.
    pub fn len(&self) -> usize {
        match self {
            Self::Utf8(u) => u.len(),
            Self::Utf16(u) => u.len(),
            Self::Utf32(u) => u.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the chunk into an owned `String`.
    ///
    /// Payloads coming out of the parser are well-formed in their encoding;
    /// anything that is not (a hand-built chunk) decodes lossily.
    pub fn to_string(&self) -> String {
        match self {
            Self::Utf8(u) => String::from_utf8_lossy(u).into_owned(),
            Self::Utf16(u) => String::from_utf16_lossy(u),
            Self::Utf32(u) => u
                .iter()
                .map(|&cp| char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect(),
        }
    }
}

/// How the parser treats Unicode noncharacters (and U+0000) in strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoncharacterHandling {
    /// Stop the parse with an error.
    #[default]
    SignalError,
    /// Replace the offending code point with U+FFFD and continue.
    Substitute,
    /// Reserved: consume matching code points without emitting them. Not
    /// implemented; parser construction rejects it.
    Skip,
}

/// Parse events, in strict document order.
///
/// Scalar `push_*` calls arrive between the `begin_value_*`/`end_value_*`
/// pair for their slot; containers are bracketed by their begin/end events.
/// Every method except [`Self::result`] has a default, so SAX-style
/// implementations only override what they observe.
pub trait SemanticActions {
    /// Whatever the implementation builds out of the event stream.
    type Result;

    /// First event of every parse (unless canceled).
    fn parse_begin(&mut self) {}

    /// Last event of a successful parse.
    fn parse_end(&mut self) {}

    fn begin_array(&mut self) {}

    fn end_array(&mut self) {}

    fn begin_object(&mut self) {}

    /// Close an object. Returning `false` reports a duplicate key and fails
    /// the parse with `DuplicateKey`.
    fn end_object(&mut self) -> bool {
        true
    }

    fn begin_value_at_index(&mut self, _index: usize) {}

    fn end_value_at_index(&mut self, _index: usize) {}

    fn begin_value_with_key(&mut self, _key: &Chunk<'_>, _index: usize) {}

    fn end_value_with_key(&mut self, _key: &Chunk<'_>, _index: usize) {}

    /// An object key, always delivered whole.
    fn push_key(&mut self, _key: &Chunk<'_>) {}

    /// A complete string value that never needed chunking.
    fn push_string(&mut self, _value: &Chunk<'_>) {}

    /// A fragment of a large string value; `has_more` is false on the final
    /// fragment. Only emitted when partial strings are enabled.
    fn value_string(&mut self, _chunk: &Chunk<'_>, _has_more: bool) {}

    fn push_number(&mut self, _number: &JsonNumber<'_>) {}

    fn push_boolean(&mut self, _value: bool) {}

    fn push_null(&mut self) {}

    /// Called exactly once when a parse fails.
    fn error(&mut self, _error: &ParseError, _msg: &str) {}

    /// Polled before `parse_begin`; true aborts with `Canceled`.
    fn is_canceled(&self) -> bool {
        false
    }

    /// Noncharacter policy the parser configures its filter from.
    fn noncharacter_handling(&self) -> NoncharacterHandling {
        NoncharacterHandling::default()
    }

    /// The encoding string payloads should be delivered in.
    fn output_encoding(&self) -> Encoding {
        Encoding::Utf8
    }

    /// Announces the source encoding before the first parse event.
    fn input_encoding(&mut self, _name: &'static str) {}

    /// The payload built so far, if any.
    fn result(&mut self) -> Option<Self::Result>;
}

/// Event counter with no payload; useful for validation-only parses and as
/// the smallest possible implementation.
#[derive(Debug, Default)]
pub struct NoopActions {
    pub events: usize,
    pub max_depth: usize,
    depth: usize,
    canceled: bool,
}

impl NoopActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canceled() -> Self {
        Self {
            canceled: true,
            ..Self::default()
        }
    }
}

impl SemanticActions for NoopActions {
    type Result = usize;

    fn parse_begin(&mut self) {
        self.events += 1;
    }

    fn parse_end(&mut self) {
        self.events += 1;
    }

    fn begin_array(&mut self) {
        self.events += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn end_array(&mut self) {
        self.events += 1;
        self.depth -= 1;
    }

    fn begin_object(&mut self) {
        self.events += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn end_object(&mut self) -> bool {
        self.events += 1;
        self.depth -= 1;
        true
    }

    fn push_key(&mut self, _key: &Chunk<'_>) {
        self.events += 1;
    }

    fn push_string(&mut self, _value: &Chunk<'_>) {
        self.events += 1;
    }

    fn value_string(&mut self, _chunk: &Chunk<'_>, _has_more: bool) {
        self.events += 1;
    }

    fn push_number(&mut self, _number: &JsonNumber<'_>) {
        self.events += 1;
    }

    fn push_boolean(&mut self, _value: bool) {
        self.events += 1;
    }

    fn push_null(&mut self) {
        self.events += 1;
    }

    fn is_canceled(&self) -> bool {
        self.canceled
    }

    fn result(&mut self) -> Option<usize> {
        Some(self.events)
    }
}
