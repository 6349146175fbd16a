//! Serialize a [`JsonValue`] tree into JSON text in any target encoding.

use crate::convert::{ConvertError, EncodeUnits, Utf8};
use crate::encoder::{encode_string, EncodeOptions};
use crate::value::JsonValue;

pub type WriteResult = Result<(), (usize, ConvertError)>;

#[inline]
fn push_ascii_str<D: EncodeUnits>(out: &mut Vec<D::Unit>, s: &str) {
    for ch in s.bytes() {
        D::encode_one_unchecked(u32::from(ch), out);
    }
}

fn write_string<D: EncodeUnits>(s: &str, out: &mut Vec<D::Unit>, options: EncodeOptions) -> WriteResult {
    push_ascii_str::<D>(out, "\"");
    encode_string::<Utf8, D>(s.as_bytes(), out, options)?;
    push_ascii_str::<D>(out, "\"");
    Ok(())
}

fn write_float<D: EncodeUnits>(f: f64, out: &mut Vec<D::Unit>) {
    if f.is_finite() {
        let mut repr = f.to_string();
        // keep the lexeme a number per the grammar: Display drops ".0" for
        // whole floats
        if !repr.contains(&['.', 'e', 'E'][..]) {
            repr.push_str(".0");
        }
        push_ascii_str::<D>(out, &repr);
    } else {
        // non-finite values have no JSON representation
        push_ascii_str::<D>(out, "null");
    }
}

/// Write `value` as JSON text in the target encoding.
///
/// Object members appear in insertion order, so encoding the same tree
/// twice produces identical output.
pub fn write_value<D: EncodeUnits>(
    value: &JsonValue,
    out: &mut Vec<D::Unit>,
    options: EncodeOptions,
) -> WriteResult {
    match value {
        JsonValue::Null => push_ascii_str::<D>(out, "null"),
        JsonValue::Bool(true) => push_ascii_str::<D>(out, "true"),
        JsonValue::Bool(false) => push_ascii_str::<D>(out, "false"),
        JsonValue::Int(int) => push_ascii_str::<D>(out, &int.to_string()),
        JsonValue::Float(float) => write_float::<D>(*float, out),
        JsonValue::Str(s) => write_string::<D>(s, out, options)?,
        JsonValue::Array(items) => {
            push_ascii_str::<D>(out, "[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    push_ascii_str::<D>(out, ",");
                }
                write_value::<D>(item, out, options)?;
            }
            push_ascii_str::<D>(out, "]");
        }
        JsonValue::Object(map) => {
            push_ascii_str::<D>(out, "{");
            for (i, (key, member)) in map.iter().enumerate() {
                if i > 0 {
                    push_ascii_str::<D>(out, ",");
                }
                write_string::<D>(key, out, options)?;
                push_ascii_str::<D>(out, ":");
                write_value::<D>(member, out, options)?;
            }
            push_ascii_str::<D>(out, "}");
        }
    }
    Ok(())
}

/// Write `value` as a UTF-8 string.
pub fn write_value_to_string(value: &JsonValue, options: EncodeOptions) -> Result<String, (usize, ConvertError)> {
    let mut out: Vec<u8> = Vec::new();
    write_value::<Utf8>(value, &mut out, options)?;
    // the writer only ever emits well-formed UTF-8
    Ok(String::from_utf8(out).expect("writer output is UTF-8"))
}
