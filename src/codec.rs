//! Encoding and decoding between [`Value`]s and the `type`/`value`
//! attribute pair of the wire format.

use crate::error::{Error, Result};
use crate::value::{Family, Value};

/// Literals decoded as boolean true. Membership is exact and case-sensitive.
pub const TRUE_LITERALS: [&str; 12] = [
    "1", "true", "True", "TRUE", "y", "yes", "Y", "Yes", "YES", "ON", "on", "On",
];

/// Literals decoded as boolean false.
pub const FALSE_LITERALS: [&str; 12] = [
    "0", "false", "False", "FALSE", "n", "no", "N", "No", "NO", "OFF", "off", "Off",
];

/// The type-tag vocabulary used when writing attributes.
///
/// Reads accept tags from either vocabulary interchangeably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    /// `int` / `float`
    Native,
    /// `long` / `double`, for callers targeting wider numeric precision
    Wide,
}

impl Vocabulary {
    /// The tag written for a value family under this vocabulary.
    pub fn tag(self, family: Family) -> &'static str {
        match (self, family) {
            (Self::Native, Family::Int) => "int",
            (Self::Native, Family::Float) => "float",
            (Self::Wide, Family::Int) => "long",
            (Self::Wide, Family::Float) => "double",
            (_, Family::Bool) => "bool",
            (_, Family::Str) => "string",
        }
    }
}

/// Serializes a value into its `(value, type)` attribute pair.
///
/// Floats are written as 16-significant-digit scientific notation so a
/// decode reproduces the stored value. The absence marker has no encoded
/// form and is rejected.
pub fn encode(value: &Value, vocabulary: Vocabulary) -> Result<(String, &'static str)> {
    let (raw, family) = match value {
        Value::Null => return Err(Error::UnsupportedValue),
        Value::Bool(b) => (b.to_string(), Family::Bool),
        Value::Int(i) => (i.to_string(), Family::Int),
        Value::Float(x) => (format!("{x:.15e}"), Family::Float),
        Value::Str(s) => (s.clone(), Family::Str),
    };
    Ok((raw, vocabulary.tag(family)))
}

/// Decodes a stored string under its declared type tag, or by inference
/// when no tag is present.
pub fn decode(raw: &str, type_tag: Option<&str>) -> Result<Value> {
    let Some(tag) = type_tag else {
        return Ok(infer(raw));
    };
    match tag {
        "string" => Ok(Value::Str(raw.to_owned())),
        "float" | "double" => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| malformed(raw, tag)),
        "int" | "long" => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| malformed(raw, tag)),
        "bool" => parse_bool(raw).map(Value::Bool).ok_or_else(|| malformed(raw, tag)),
        _ => Err(malformed(raw, tag)),
    }
}

/// Classifies an untagged string: numeric first (a decimal point selects
/// float over int), then the boolean literal sets, else the literal text.
pub fn infer(raw: &str) -> Value {
    if let Ok(x) = raw.parse::<f64>() {
        if raw.contains('.') {
            return Value::Float(x);
        }
        // Exponent forms and out-of-range magnitudes fail here and fall
        // through to the literal checks.
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int(i);
        }
    }
    match parse_bool(raw) {
        Some(b) => Value::Bool(b),
        None => Value::Str(raw.to_owned()),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if TRUE_LITERALS.contains(&raw) {
        Some(true)
    } else if FALSE_LITERALS.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

fn malformed(raw: &str, tag: &str) -> Error {
    Error::MalformedValue {
        value: raw.to_owned(),
        type_tag: tag.to_owned(),
    }
}
