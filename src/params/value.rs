// src/params/value.rs
// Tagged parameter values, parsed once when a parameter is declared.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A parameter value as declared in a sheet.
///
/// Values are written as text but parsed once into the narrowest matching
/// kind, so that appliers coerce from a typed value instead of re-parsing a
/// string on every pass. Numbers keep the text they were written with:
/// `Display` gives it back unchanged and string fields receive it verbatim.
/// Equality between numbers compares the numeric value only.
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// `true` / `false`
    Bool(bool),
    /// Integer literal and its source text
    Int(i64, String),
    /// Finite floating point literal and its source text
    Float(f64, String),
    /// Anything else: strings, enum names, flag combinations
    Text(String),
}

impl ParamValue {
    /// Parses a textual value into its narrowest kind.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed {
            "true" => return ParamValue::Bool(true),
            "false" => return ParamValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return ParamValue::Int(i, trimmed.to_string());
        }
        // f64 parsing also accepts "inf" and "nan"; those stay text
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => ParamValue::Float(f, trimmed.to_string()),
            _ => ParamValue::Text(text.to_string()),
        }
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i, _) => Some(*i as f64),
            ParamValue::Float(f, _) => Some(*f),
            _ => None,
        }
    }

    /// Short name of the value's kind, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(..) => "int",
            ParamValue::Float(..) => "float",
            ParamValue::Text(_) => "text",
        }
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamValue::Bool(a), ParamValue::Bool(b)) => a == b,
            (ParamValue::Text(a), ParamValue::Text(b)) => a == b,
            (ParamValue::Int(a, _), ParamValue::Int(b, _)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(_, text) | ParamValue::Float(_, text) | ParamValue::Text(text) => {
                f.write_str(text)
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(text: &str) -> Self {
        ParamValue::parse(text)
    }
}

impl From<String> for ParamValue {
    fn from(text: String) -> Self {
        ParamValue::parse(&text)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i, i.to_string())
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::from(i64::from(i))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v, v.to_string())
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        // go through the shortest decimal form so 0.1f32 stays 0.1
        let text = v.to_string();
        ParamValue::Float(text.parse().unwrap_or(f64::from(v)), text)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParamValueVisitor)
    }
}

struct ParamValueVisitor;

impl<'de> Visitor<'de> for ParamValueVisitor {
    type Value = ParamValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a parameter value (string, number or bool)")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ParamValue, E> {
        Ok(ParamValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ParamValue, E> {
        Ok(ParamValue::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ParamValue, E> {
        // beyond i64 the digits are kept for unsigned fields
        Ok(i64::try_from(v).map_or_else(|_| ParamValue::parse(&v.to_string()), ParamValue::from))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ParamValue, E> {
        Ok(ParamValue::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ParamValue, E> {
        Ok(ParamValue::parse(v))
    }
}
