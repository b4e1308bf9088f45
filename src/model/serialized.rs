//! Bounded, transmissible value trees.
//!
//! [`SerializedValue`] is what the serializer produces and what travels over
//! the transport. It is a closed tagged union, internally tagged by `type`
//! on the wire:
//!
//! ```json
//! {"type":"object","value":{"a":{"type":"number","value":1}},"preview":"Object {a}"}
//! ```
//!
//! Object members keep their insertion order, and non-finite numbers survive
//! the JSON round trip as the strings `"NaN"`, `"Infinity"` and `"-Infinity"`.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A serialized value tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SerializedValue {
    /// String leaf, possibly truncated with a length suffix.
    String {
        /// Text of the string.
        value: String,
    },
    /// Number leaf, including NaN and the infinities.
    Number {
        /// The number.
        #[serde(with = "number_repr")]
        value: f64,
    },
    /// Boolean leaf.
    Boolean {
        /// The boolean.
        value: bool,
    },
    /// `null`.
    Null,
    /// `undefined`, kept apart from `null`.
    Undefined,
    /// Textual signature of a function.
    Function {
        /// Signature text, shortened for long definitions.
        value: String,
    },
    /// Error leaf; never recursed into.
    Error {
        /// Error message.
        message: String,
        /// Stack text, when the error had one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
    /// Object node, cut to the configured key limit.
    Object {
        /// Serialized members in insertion order.
        value: ObjectFields,
        /// Short summary such as `Object {a, b, c...}`.
        preview: String,
    },
    /// Array node, cut to the configured length limit.
    Array {
        /// Serialized elements.
        value: Vec<SerializedValue>,
        /// Short summary such as `Array(150) [showing first 100 items]`.
        preview: String,
    },
}

impl SerializedValue {
    /// String leaf.
    pub fn string(value: impl Into<String>) -> Self {
        SerializedValue::String {
            value: value.into(),
        }
    }

    /// Number leaf.
    pub fn number(value: f64) -> Self {
        SerializedValue::Number { value }
    }

    /// Wire tag of this node.
    pub fn type_name(&self) -> &'static str {
        match self {
            SerializedValue::String { .. } => "string",
            SerializedValue::Number { .. } => "number",
            SerializedValue::Boolean { .. } => "boolean",
            SerializedValue::Null => "null",
            SerializedValue::Undefined => "undefined",
            SerializedValue::Function { .. } => "function",
            SerializedValue::Error { .. } => "error",
            SerializedValue::Object { .. } => "object",
            SerializedValue::Array { .. } => "array",
        }
    }

    /// The text of a string leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SerializedValue::String { value } => Some(value),
            _ => None,
        }
    }

    /// Whether this node has children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            SerializedValue::Object { .. } | SerializedValue::Array { .. }
        )
    }

    /// Preview line of a container node.
    pub fn preview(&self) -> Option<&str> {
        match self {
            SerializedValue::Object { preview, .. } | SerializedValue::Array { preview, .. } => {
                Some(preview)
            }
            _ => None,
        }
    }

    /// Follow a dotted path of object keys / array indices from this node.
    ///
    /// `"a.b"` selects key `b` of key `a`; numeric segments index arrays.
    pub fn at_path(&self, path: &str) -> Option<&SerializedValue> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| match node {
                SerializedValue::Object { value, .. } => value.get(segment),
                SerializedValue::Array { value, .. } => {
                    segment.parse::<usize>().ok().and_then(|i| value.get(i))
                }
                _ => None,
            })
    }
}

/// Canonical text form of a number.
///
/// Integral values print without a fractional part, `-0` prints as `0`, and
/// the non-finite values print as `NaN`, `Infinity`, `-Infinity`. Magnitudes
/// at or above `1e21` or below `1e-6` use exponent form with an explicit
/// sign: `1e+21`, `1.5e-7`.
pub fn number_to_text(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        "0".to_string()
    } else if !(1e-6..1e21).contains(&value.abs()) {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        value.to_string()
    }
}

/// Ordered object members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectFields(Vec<(String, SerializedValue)>);

impl ObjectFields {
    /// Empty member list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty member list with room for `capacity` members.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Append a member. Duplicate keys replace the earlier value in place.
    pub fn push(&mut self, key: impl Into<String>, value: SerializedValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&SerializedValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SerializedValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &SerializedValue> {
        self.0.iter().map(|(_, v)| v)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SerializedValue)> for ObjectFields {
    fn from_iter<I: IntoIterator<Item = (K, SerializedValue)>>(iter: I) -> Self {
        let mut fields = ObjectFields::new();
        for (key, value) in iter {
            fields.push(key, value);
        }
        fields
    }
}

impl Serialize for ObjectFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ObjectFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = ObjectFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of serialized values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields = ObjectFields::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, SerializedValue>()? {
                    fields.push(key, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// JSON has no NaN or infinities; those travel as strings.
mod number_repr {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&number_to_text(*value))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        struct NumberVisitor;

        impl Visitor<'_> for NumberVisitor {
            type Value = f64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or one of \"NaN\", \"Infinity\", \"-Infinity\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
                match v {
                    "NaN" => Ok(f64::NAN),
                    "Infinity" => Ok(f64::INFINITY),
                    "-Infinity" => Ok(f64::NEG_INFINITY),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}
