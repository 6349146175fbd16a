//! A JSON value tree and the tree-building semantic actions.

use smallvec::SmallVec;

use crate::actions::{Chunk, NoncharacterHandling, SemanticActions};
use crate::encoding::Encoding;
use crate::errors::{ParseError, ParseResult};
use crate::index_map::JsonMap;
use crate::number::{JsonNumber, TaggedNumber};
use crate::parser::{parse_bytes, Parser, ParserOptions};

/// Enum representing a parsed JSON value.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Box<JsonArray>),
    Object(Box<JsonObject>),
}

pub type JsonArray = SmallVec<[JsonValue; 8]>;
pub type JsonObject = JsonMap<String, JsonValue>;

impl JsonValue {
    /// Parse a UTF-8 document into a value tree.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let mut actions = TreeActions::new();
        Parser::<crate::encoding::Utf8Source, _>::new(data, &mut actions).parse()?;
        actions
            .result()
            .ok_or_else(|| crate::errors::parse_error!(InternalLogicError, 0))
    }

    /// Parse a document in any supported encoding, detected from its BOM
    /// (UTF-8 assumed when absent).
    pub fn parse_detect(data: &[u8]) -> Result<Self, ParseError> {
        let mut actions = TreeActions::new();
        parse_bytes(data, &mut actions, ParserOptions::default())?;
        actions
            .result()
            .ok_or_else(|| crate::errors::parse_error!(InternalLogicError, 0))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Member lookup on objects.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Element lookup on arrays.
    pub fn at(&self, index: usize) -> Option<&JsonValue> {
        match self {
            Self::Array(items) => items.get(index),
            _ => None,
        }
    }
}

enum Frame {
    Array(JsonArray),
    Object {
        map: JsonObject,
        pending_key: Option<String>,
        duplicate: bool,
    },
}

/// Semantic actions that materialize the event stream into a [`JsonValue`].
///
/// Keys are tracked per object frame; `end_object` reports duplicates back
/// to the parser, which turns them into `DuplicateKey`.
pub struct TreeActions {
    stack: SmallVec<[Frame; 8]>,
    root: Option<JsonValue>,
    partial: String,
    error: Option<ParseError>,
    noncharacters: NoncharacterHandling,
}

impl Default for TreeActions {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeActions {
    pub fn new() -> Self {
        Self {
            stack: SmallVec::new(),
            root: None,
            partial: String::new(),
            error: None,
            noncharacters: NoncharacterHandling::SignalError,
        }
    }

    /// Substitute noncharacters with U+FFFD instead of failing the parse.
    pub fn substituting_noncharacters() -> Self {
        Self {
            noncharacters: NoncharacterHandling::Substitute,
            ..Self::new()
        }
    }

    pub fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    fn attach(&mut self, value: JsonValue) {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object {
                map,
                pending_key,
                duplicate,
            }) => {
                let key = pending_key.take().unwrap_or_default();
                if !map.try_insert(key, value) {
                    *duplicate = true;
                }
            }
            None => self.root = Some(value),
        }
    }
}

impl SemanticActions for TreeActions {
    type Result = JsonValue;

    fn parse_begin(&mut self) {
        self.stack.clear();
        self.root = None;
        self.partial.clear();
        self.error = None;
    }

    fn begin_array(&mut self) {
        self.stack.push(Frame::Array(JsonArray::new()));
    }

    fn end_array(&mut self) {
        if let Some(Frame::Array(items)) = self.stack.pop() {
            self.attach(JsonValue::Array(Box::new(items)));
        }
    }

    fn begin_object(&mut self) {
        self.stack.push(Frame::Object {
            map: JsonObject::new(),
            pending_key: None,
            duplicate: false,
        });
    }

    fn end_object(&mut self) -> bool {
        match self.stack.pop() {
            Some(Frame::Object { map, duplicate, .. }) => {
                self.attach(JsonValue::Object(Box::new(map)));
                !duplicate
            }
            _ => true,
        }
    }

    fn push_key(&mut self, key: &Chunk<'_>) {
        if let Some(Frame::Object { pending_key, .. }) = self.stack.last_mut() {
            *pending_key = Some(key.to_string());
        }
    }

    fn push_string(&mut self, value: &Chunk<'_>) {
        self.attach(JsonValue::Str(value.to_string()));
    }

    fn value_string(&mut self, chunk: &Chunk<'_>, has_more: bool) {
        self.partial.push_str(&chunk.to_string());
        if !has_more {
            let whole = std::mem::take(&mut self.partial);
            self.attach(JsonValue::Str(whole));
        }
    }

    fn push_number(&mut self, number: &JsonNumber<'_>) {
        match number.tagged() {
            TaggedNumber::Integer(int) => self.attach(JsonValue::Int(int)),
            TaggedNumber::Float(float) => self.attach(JsonValue::Float(float)),
        }
    }

    fn push_boolean(&mut self, value: bool) {
        self.attach(JsonValue::Bool(value));
    }

    fn push_null(&mut self) {
        self.attach(JsonValue::Null);
    }

    fn error(&mut self, error: &ParseError, _msg: &str) {
        self.error = Some(error.clone());
    }

    fn noncharacter_handling(&self) -> NoncharacterHandling {
        self.noncharacters
    }

    fn output_encoding(&self) -> Encoding {
        Encoding::Utf8
    }

    fn result(&mut self) -> Option<JsonValue> {
        self.root.take()
    }
}

/// Validate a UTF-8 document without building anything.
pub fn validate(data: &[u8]) -> ParseResult<()> {
    let mut actions = crate::actions::NoopActions::new();
    Parser::<crate::encoding::Utf8Source, _>::new(data, &mut actions).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let value = JsonValue::parse(br#"{"a": [1, 2.5, "x"], "b": {"c": null}}"#).unwrap();
        assert_eq!(value.get("a").and_then(|a| a.at(0)).and_then(JsonValue::as_int), Some(1));
        assert_eq!(
            value.get("a").and_then(|a| a.at(1)).and_then(JsonValue::as_float),
            Some(2.5)
        );
        assert_eq!(
            value.get("a").and_then(|a| a.at(2)).and_then(JsonValue::as_str),
            Some("x")
        );
        assert_eq!(value.get("b").and_then(|b| b.get("c")), Some(&JsonValue::Null));
        assert_eq!(value.get("missing"), None);
        assert_eq!(value.at(0), None);
    }

    #[test]
    fn object_member_order_is_document_order() {
        let value = JsonValue::parse(br#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let JsonValue::Object(map) = value else { panic!("expected object") };
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn integer_widths() {
        let value = JsonValue::parse(br#"[9223372036854775807, -9223372036854775808, 9223372036854775808]"#)
            .unwrap();
        assert_eq!(value.at(0).and_then(JsonValue::as_int), Some(i64::MAX));
        assert_eq!(value.at(1).and_then(JsonValue::as_int), Some(i64::MIN));
        // one past i64::MAX degrades to a float
        assert_eq!(
            value.at(2).and_then(JsonValue::as_float),
            Some(9.223_372_036_854_776e18)
        );
    }
}
