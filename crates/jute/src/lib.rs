#![doc = include_str!("../../../README.md")]

mod actions;
mod codepoint;
mod convert;
mod cursor;
mod encoder;
mod encoding;
mod errors;
mod index_map;
mod number;
mod parser;
mod staging;
mod value;
mod writer;

pub use actions::{Chunk, NoncharacterHandling, NoopActions, SemanticActions};
pub use codepoint::{
    is_code_point, is_high_surrogate, is_low_surrogate, is_noncharacter, is_scalar_value,
    is_surrogate, utf16_encoded_len, utf8_encoded_len, REPLACEMENT_CHARACTER,
};
pub use convert::{
    convert_all, convert_one, CodePointFilter, ConvertError, ConvertResult, DecodeUnits,
    EncodeUnits, FilterKind, Utf16, Utf32, Utf8,
};
pub use encoder::{encode_string, units_to_bytes, write_bom, EncodeOptions};
pub use encoding::{
    byte_swap, ByteSwap, CodeUnit, Encoding, Endianness, SourceEncoding, Utf16BeSource,
    Utf16LeSource, Utf16Source, Utf32BeSource, Utf32LeSource, Utf32Source, Utf8Source,
};
pub use errors::{LinePosition, ParseError, ParseErrorType, ParseResult};
pub use index_map::JsonMap;
pub use number::{JsonNumber, NormalizedNumber, NumberBuilder, NumberParts, Span, TaggedNumber};
pub use parser::{parse_bytes, Parser, ParserOptions, ParserState};
pub use staging::{Mode, StringStaging};
pub use value::{validate, JsonArray, JsonObject, JsonValue, TreeActions};
pub use writer::{write_value, write_value_to_string, WriteResult};
