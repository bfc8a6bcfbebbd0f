use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single attribute value.
///
/// The exporter writes whatever scalar the instrumentation attached. Arrays and
/// objects are not expected but are kept as their compact JSON text so one odd
/// attribute never invalidates the whole span line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used for token accumulation. Strings are not coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(n) => Some(*n as f64),
            AttributeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer view used for ordering (step indices). Accepts integral floats
    /// and numeric strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(n) => Some(*n),
            AttributeValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            AttributeValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Str(s) => write!(f, "{}", s),
            AttributeValue::Int(n) => write!(f, "{}", n),
            AttributeValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => AttributeValue::Str(s),
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttributeValue::Int(i),
                None => AttributeValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::Null => AttributeValue::Str(String::new()),
            other => AttributeValue::Str(other.to_string()),
        }
    }
}

impl From<AttributeValue> for Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Str(s) => Value::String(s),
            AttributeValue::Int(n) => Value::from(n),
            AttributeValue::Float(f) => Value::from(f),
            AttributeValue::Bool(b) => Value::Bool(b),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// Exporter envelope around an attribute value: `{"Type": "STRING", "Value": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeEnvelope {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// `None` when the value was `null` or missing; such attributes stay in the
    /// ordered list but never enter the lookup map.
    #[serde(rename = "Value", default)]
    pub value: Option<AttributeValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "Key", default)]
    pub key: String,

    #[serde(rename = "Value", default)]
    pub value: AttributeEnvelope,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        let value = value.into();
        let kind = match &value {
            AttributeValue::Str(_) => "STRING",
            AttributeValue::Int(_) => "INT64",
            AttributeValue::Float(_) => "FLOAT64",
            AttributeValue::Bool(_) => "BOOL",
        };
        Self {
            key: key.into(),
            value: AttributeEnvelope {
                kind: Some(kind.to_string()),
                value: Some(value),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_decoding() {
        let attr: Attribute =
            serde_json::from_str(r#"{"Key":"n","Value":{"Type":"INT64","Value":120}}"#).unwrap();
        assert_eq!(attr.value.value, Some(AttributeValue::Int(120)));

        let attr: Attribute =
            serde_json::from_str(r#"{"Key":"f","Value":{"Type":"FLOAT64","Value":0.5}}"#).unwrap();
        assert_eq!(attr.value.value, Some(AttributeValue::Float(0.5)));

        let attr: Attribute =
            serde_json::from_str(r#"{"Key":"b","Value":{"Value":true}}"#).unwrap();
        assert_eq!(attr.value.value, Some(AttributeValue::Bool(true)));
        assert_eq!(attr.value.kind, None);
    }

    #[test]
    fn test_null_and_missing_values() {
        let attr: Attribute = serde_json::from_str(r#"{"Key":"x","Value":{"Value":null}}"#).unwrap();
        assert_eq!(attr.value.value, None);

        let attr: Attribute = serde_json::from_str(r#"{"Key":"x"}"#).unwrap();
        assert_eq!(attr.value.value, None);
    }

    #[test]
    fn test_non_scalar_kept_as_json_text() {
        let attr: Attribute =
            serde_json::from_str(r#"{"Key":"list","Value":{"Value":["a","b"]}}"#).unwrap();
        assert_eq!(
            attr.value.value,
            Some(AttributeValue::Str(r#"["a","b"]"#.to_string()))
        );
    }

    #[test]
    fn test_display_and_numeric_views() {
        assert_eq!(AttributeValue::Float(30.0).to_string(), "30");
        assert_eq!(AttributeValue::Float(1.25).to_string(), "1.25");
        assert_eq!(AttributeValue::Str("3".into()).as_i64(), Some(3));
        assert_eq!(AttributeValue::Str("3".into()).as_f64(), None);
        assert_eq!(AttributeValue::Float(2.0).as_i64(), Some(2));
        assert_eq!(AttributeValue::Bool(true).as_f64(), None);
    }
}
