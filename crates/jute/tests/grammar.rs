//! Grammar conformance corpus, following the shape of the classic json.org
//! checker suite: documents that must parse and documents that must fail
//! with a specific error.

use jute::{validate, JsonValue, NoopActions, ParseErrorType, Parser, Utf8Source};

const PASS: &[&str] = &[
    // a feature-dense document
    r##"[
        "JSON Test Pattern pass",
        {"object with 1 member": ["array with 1 element"]},
        {},
        [],
        -42,
        true,
        false,
        null,
        {
            "integer": 1234567890,
            "real": -9876.543210,
            "e": 0.123456789e-12,
            "E": 1.234567890E+34,
            "": 23456789012E66,
            "zero": 0,
            "one": 1,
            "space": " ",
            "quote": "\"",
            "backslash": "\\",
            "controls": "\b\f\n\r\t",
            "slash": "/ & \/",
            "alpha": "abcdefghijklmnopqrstuvwyz",
            "ALPHA": "ABCDEFGHIJKLMNOPQRSTUVWYZ",
            "digit": "0123456789",
            "0123456789": "digit",
            "special": "`1~!@#$%^&*()_+-={':[,]}|;.</>?",
            "hex": "\u0123\u4567\u89AB\uCDEF\uabcd\uef4A",
            "unicode": "é€𝄞",
            "url": "http://www.JSON.org/",
            "comment": "// /* <!-- --",
            "# -- --> */": " ",
            " s p a c e d " : [1,2 , 3

,

4 , 5        ,          6           ,7        ],
            "compact":[1,2,3,4,5,6,7],
            "quotes": "&#34; \u0022 %22 0x22 034 &#34;"
        },
        0.5, 98.6, 99.44, 1066, 1e1, 0.1e1, 1e-1, 1e00, 2e+00, 2e-00,
        "rosebud"
    ]"##,
    // 19 levels: not too deep
    r#"[[[[[[[[[[[[[[[[[[["Not too deep"]]]]]]]]]]]]]]]]]]]"#,
    // the outermost value may be an object
    r#"{"JSON Test Pattern pass3": {
        "The outermost value": "must be an object or an array.",
        "In this test": "It is an object."
    }}"#,
];

const FAIL: &[(&str, ParseErrorType)] = &[
    (r#"["Unclosed array"#, ParseErrorType::UnexpectedEnd),
    (
        r#"{unquoted_key: "keys must be quoted"}"#,
        ParseErrorType::ExpectedStringKey,
    ),
    (r#"["extra comma",]"#, ParseErrorType::ExpectedValue),
    (r#"["double extra comma",,]"#, ParseErrorType::ExpectedValue),
    (
        r#"[   , "<-- missing value"]"#,
        ParseErrorType::ExpectedValue,
    ),
    (
        r#"{"Extra comma": true,}"#,
        ParseErrorType::ExpectedStringKey,
    ),
    (
        r#"{"Illegal expression": 1 + 2}"#,
        ParseErrorType::ExpectedTokenObjectEnd,
    ),
    (
        r#"{"Illegal invocation": alert()}"#,
        ParseErrorType::ExpectedValue,
    ),
    (
        r#"{"Numbers cannot have leading zeroes": 013}"#,
        ParseErrorType::BadNumber,
    ),
    (
        r#"{"Numbers cannot be hex": 0x14}"#,
        ParseErrorType::ExpectedTokenObjectEnd,
    ),
    (
        r#"["Illegal backslash escape: \x15"]"#,
        ParseErrorType::InvalidEscapeSequence,
    ),
    (r#"[\naked]"#, ParseErrorType::ExpectedValue),
    (
        r#"["Illegal backslash escape: \017"]"#,
        ParseErrorType::InvalidEscapeSequence,
    ),
    (r#"{"Missing colon" null}"#, ParseErrorType::ExpectedTokenKeyValueSep),
    (r#"{"Double colon":: null}"#, ParseErrorType::ExpectedValue),
    (
        r#"{"Comma instead of colon", null}"#,
        ParseErrorType::ExpectedTokenKeyValueSep,
    ),
    (
        r#"["Colon instead of comma": false]"#,
        ParseErrorType::ExpectedTokenArrayEnd,
    ),
    (r#"["Bad value", truth]"#, ParseErrorType::ExpectedValue),
    (r#"['single quote']"#, ParseErrorType::ExpectedValue),
    ("[\"tab\t character\tin\tstring\"]", ParseErrorType::ControlCharNotAllowed),
    ("[\"line\nbreak\"]", ParseErrorType::ControlCharNotAllowed),
    ("[\"line\\\nbreak\"]", ParseErrorType::InvalidEscapeSequence),
    ("[0e]", ParseErrorType::BadNumber),
    ("[0e+]", ParseErrorType::BadNumber),
    ("[0e+-1]", ParseErrorType::BadNumber),
    (
        r#"{"Comma instead if closing brace": true,"#,
        ParseErrorType::UnexpectedEnd,
    ),
    (r#"["mismatch"}"#, ParseErrorType::ExpectedTokenArrayEnd),
    (r#"{"mismatch": 1]"#, ParseErrorType::ExpectedTokenObjectEnd),
];

#[test]
fn pass_corpus() {
    for (i, doc) in PASS.iter().enumerate() {
        validate(doc.as_bytes()).unwrap_or_else(|e| panic!("pass{}: {e}", i + 1));
        // the tree builder agrees
        JsonValue::parse(doc.as_bytes()).unwrap_or_else(|e| panic!("pass{}: {e}", i + 1));
    }
}

#[test]
fn fail_corpus() {
    for (doc, expected) in FAIL {
        let err = validate(doc.as_bytes())
            .expect_err(&format!("should not parse: {doc}"));
        assert_eq!(err.error_type, *expected, "{doc}");
    }
}

/// The parse stops after the top-level value; trailing garbage is left for
/// the caller to observe.
#[test]
fn trailing_content_is_left_unconsumed() {
    for (doc, json_len) in [
        (&r#"["Comma after the close"],"#[..], 25),
        (r#"{"Extra value after close": true} "misplaced"#, 34),
    ] {
        let mut actions = NoopActions::new();
        let mut parser = Parser::<Utf8Source, _>::new(doc.as_bytes(), &mut actions);
        parser.parse().unwrap();
        assert_eq!(parser.consumed(), json_len, "{doc}");
        assert!(parser.consumed() < doc.len());
    }
}
