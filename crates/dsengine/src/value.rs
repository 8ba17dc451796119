//! Scalar payload stored by the sequence engines and hash tables.

use std::{fmt, result};

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// A number or a string.
///
/// Equality is exact: `Number(1.0)` and `Text("1")` are different values.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A JSON number.
    Number(f64),
    /// A JSON string.
    Text(String),
}

impl Value {
    /// Convert a JSON value, rejecting anything that is not a finite number or a string.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(Self::Number)
                .ok_or_else(|| Error::invalid(format!("number {n} is out of range"))),
            serde_json::Value::String(s) => Ok(Self::Text(s.clone())),
            other => Err(Error::invalid(format!(
                "expected a number or a string, got {other}"
            ))),
        }
    }

    /// The integral form of a number, when it has one that survives a round trip.
    fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(*n as i64),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> result::Result<S::Ok, S::Error> {
        if let Some(i) = self.as_integer() {
            return serializer.serialize_i64(i);
        }
        match self {
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Integral numbers print without a trailing ".0".
        if let Some(i) = self.as_integer() {
            return write!(f, "{i}");
        }
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
