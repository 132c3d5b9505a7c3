//! Low-level binary message codec for the endpoints without a maintained
//! descriptor: primitive field appenders on the encode side, a universal
//! tree walker on the decode side.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{PhotosError, Result};

const WIRE_VARINT: u64 = 0;
const WIRE_FIXED64: u64 = 1;
const WIRE_BYTES: u64 = 2;
const WIRE_START_GROUP: u64 = 3;
const WIRE_END_GROUP: u64 = 4;
const WIRE_FIXED32: u64 = 5;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

pub fn append_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

fn append_tag(buf: &mut Vec<u8>, field: u32, wire_type: u64) {
    append_varint(buf, (u64::from(field) << 3) | wire_type);
}

/// Appends an empty sub-message; the server reads these as feature toggles.
pub fn append_empty_message(buf: &mut Vec<u8>, field: u32) {
    append_tag(buf, field, WIRE_BYTES);
    append_varint(buf, 0);
}

/// Appends a string field, skipping it entirely when the value is empty.
pub fn append_string_field(buf: &mut Vec<u8>, field: u32, value: &str) {
    if value.is_empty() {
        return;
    }
    append_tag(buf, field, WIRE_BYTES);
    append_varint(buf, value.len() as u64);
    buf.extend_from_slice(value.as_bytes());
}

pub fn append_varint_field(buf: &mut Vec<u8>, field: u32, value: i64) {
    append_tag(buf, field, WIRE_VARINT);
    append_varint(buf, value as u64);
}

pub fn append_bytes_field(buf: &mut Vec<u8>, field: u32, value: &[u8]) {
    append_tag(buf, field, WIRE_BYTES);
    append_varint(buf, value.len() as u64);
    buf.extend_from_slice(value);
}

/// Appends a packed repeated varint field; empty slices append nothing.
pub fn append_packed_varints(buf: &mut Vec<u8>, field: u32, values: &[i64]) {
    if values.is_empty() {
        return;
    }
    let mut packed = Vec::new();
    for v in values {
        append_varint(&mut packed, *v as u64);
    }
    append_bytes_field(buf, field, &packed);
}

/// Appends a pre-encoded sub-message.
pub fn append_message(buf: &mut Vec<u8>, field: u32, msg: &[u8]) {
    append_bytes_field(buf, field, msg);
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Field-number-keyed contents of a decoded message.
pub type FieldMap = BTreeMap<u32, Value>;

/// A decoded field value.
///
/// Length-delimited payloads are re-parsed as nested messages when they
/// decode cleanly, promoted to text when every code unit is printable
/// UTF-8, and kept as raw bytes otherwise. Repeated occurrences of a
/// field number collapse into `List`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Varint(u64),
    Fixed32(u32),
    Fixed64(u64),
    Text(String),
    Bytes(Vec<u8>),
    Message(FieldMap),
    List(Vec<Value>),
}

impl Value {
    /// Looks up a direct child field of a message value.
    pub fn field(&self, number: u32) -> Option<&Value> {
        match self {
            Value::Message(map) => map.get(&number),
            _ => None,
        }
    }

    /// Follows a chain of field numbers through nested messages.
    pub fn path(&self, path: &[u32]) -> Option<&Value> {
        let mut current = self;
        for number in path {
            current = current.field(*number)?;
        }
        Some(current)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value; accepts any integer representation.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Varint(v) => Some(*v),
            Value::Fixed32(v) => Some(u64::from(*v)),
            Value::Fixed64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_u64().map(|v| v as i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Fixed64(v) => Some(f64::from_bits(*v)),
            Value::Fixed32(v) => Some(f64::from(f32::from_bits(*v))),
            Value::Varint(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Iterates the value as a repeated field: lists yield their
    /// elements, anything else yields itself once.
    pub fn items(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Value::List(values) => Box::new(values.iter()),
            other => Box::new(std::iter::once(other)),
        }
    }
}

fn consume_varint(data: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, byte) in data.iter().enumerate() {
        if i >= 10 {
            return None;
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Printable text per the reference client: valid UTF-8 whose only
/// control characters are tab, newline and carriage return.
fn is_printable_utf8(data: &[u8]) -> bool {
    match std::str::from_utf8(data) {
        Ok(s) => s
            .chars()
            .all(|c| c >= '\u{20}' || matches!(c, '\t' | '\n' | '\r')),
        Err(_) => false,
    }
}

fn insert_field(map: &mut FieldMap, number: u32, value: Value) {
    match map.get_mut(&number) {
        Some(Value::List(values)) => values.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::Varint(0));
            *existing = Value::List(vec![first, value]);
        }
        None => {
            map.insert(number, value);
        }
    }
}

/// Decodes raw bytes into a field tree. Empty input yields `None`.
pub fn decode_tree(mut data: &[u8]) -> Result<Option<Value>> {
    if data.is_empty() {
        return Ok(None);
    }

    let mut map = FieldMap::new();
    while !data.is_empty() {
        let (tag, n) = consume_varint(data)
            .ok_or_else(|| PhotosError::Protocol("truncated field tag".into()))?;
        data = &data[n..];

        let field = (tag >> 3) as u32;
        if field == 0 {
            return Err(PhotosError::Protocol("field number zero".into()));
        }

        let value = match tag & 0x7 {
            WIRE_VARINT => {
                let (v, n) = consume_varint(data)
                    .ok_or_else(|| PhotosError::Protocol("truncated varint".into()))?;
                data = &data[n..];
                Value::Varint(v)
            }
            WIRE_FIXED64 => {
                if data.len() < 8 {
                    return Err(PhotosError::Protocol("truncated fixed64".into()));
                }
                let v = u64::from_le_bytes(data[..8].try_into().unwrap());
                data = &data[8..];
                Value::Fixed64(v)
            }
            WIRE_FIXED32 => {
                if data.len() < 4 {
                    return Err(PhotosError::Protocol("truncated fixed32".into()));
                }
                let v = u32::from_le_bytes(data[..4].try_into().unwrap());
                data = &data[4..];
                Value::Fixed32(v)
            }
            WIRE_BYTES => {
                let (len, n) = consume_varint(data)
                    .ok_or_else(|| PhotosError::Protocol("truncated length".into()))?;
                data = &data[n..];
                let len = len as usize;
                if data.len() < len {
                    return Err(PhotosError::Protocol("truncated bytes field".into()));
                }
                let payload = &data[..len];
                data = &data[len..];

                match decode_tree(payload) {
                    Ok(Some(nested)) => nested,
                    _ if is_printable_utf8(payload) => {
                        Value::Text(String::from_utf8_lossy(payload).into_owned())
                    }
                    _ => Value::Bytes(payload.to_vec()),
                }
            }
            WIRE_START_GROUP | WIRE_END_GROUP => {
                return Err(PhotosError::Protocol("groups not supported".into()));
            }
            other => {
                return Err(PhotosError::Protocol(format!("unknown wire type {other}")));
            }
        };

        insert_field(&mut map, field, value);
    }

    Ok(Some(Value::Message(map)))
}

/// Decodes raw bytes into a JSON tree keyed by decimal field numbers;
/// non-text payloads become base64 strings. Useful for dumping replies
/// whose layout is still being mapped.
pub fn decode_to_json(data: &[u8]) -> Result<serde_json::Value> {
    match decode_tree(data)? {
        Some(value) => Ok(value_to_json(&value)),
        None => Ok(serde_json::Value::Null),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Varint(v) | Value::Fixed64(v) => serde_json::json!(v),
        Value::Fixed32(v) => serde_json::json!(v),
        Value::Text(s) => serde_json::json!(s),
        Value::Bytes(b) => serde_json::json!(BASE64.encode(b)),
        Value::Message(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_string(), value_to_json(v)))
                .collect(),
        ),
        Value::List(values) => {
            serde_json::Value::Array(values.iter().map(value_to_json).collect())
        }
    }
}
