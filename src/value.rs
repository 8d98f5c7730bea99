//! Config values and their text projection.
//!
//! [`ConfigValue`] is the closed set of values a profile may hold. Every
//! variant has a total, deterministic projection to text through
//! [`ConfigValue::to_env_string`]; nothing in this module fails at render
//! time.
//!
//! Deserialization is hand-written so that key order survives for every
//! supported source format (JSON, YAML, TOML).

use std::fmt;

use chrono::{
    DateTime,
    FixedOffset,
    SecondsFormat,
    Utc,
};
use serde::de::{
    self,
    Deserialize,
    Deserializer,
    EnumAccess,
    IgnoredAny,
    MapAccess,
    SeqAccess,
    VariantAccess,
    Visitor,
};
use serde::ser::{
    Serialize,
    SerializeMap,
    SerializeSeq,
    Serializer,
};

// Field name the `toml` deserializer uses to smuggle datetimes through serde.
const TOML_DATETIME_FIELD: &str = "$__toml_private_datetime";

// Whole floats up to 2^53 - 1 are written as JSON integers.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Absent or explicit null.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Integer-like number.
    Integer(i128),
    /// Floating point number.
    Float(f64),
    /// Text, kept verbatim.
    String(String),
    /// A point in time with its original offset.
    Timestamp(DateTime<FixedOffset>),
    /// An ordered list of values.
    Sequence(Vec<ConfigValue>),
    /// A nested key/value mapping.
    Mapping(ConfigMapping),
    /// A value the source format can express but genv cannot (YAML tags,
    /// byte strings). Carries a short description of what was found.
    Unsupported(String),
}

impl ConfigValue {
    /// Projects the value to the text written after `KEY=`.
    ///
    /// | Variant | Text |
    /// |---|---|
    /// | `Null`, `Unsupported` | empty |
    /// | `Bool` | `true` / `false` |
    /// | `Integer`, `Float` | decimal |
    /// | `String` | itself |
    /// | `Timestamp` | ISO-8601 in UTC, e.g. `2024-01-02T03:04:05.000Z` |
    /// | `Sequence`, `Mapping` | compact JSON |
    ///
    /// # Examples
    ///
    /// ```rust
    /// use genv::{ConfigMapping, ConfigValue};
    ///
    /// assert_eq!(ConfigValue::Null.to_env_string(), "");
    /// assert_eq!(ConfigValue::from(3.5).to_env_string(), "3.5");
    ///
    /// let mut nested = ConfigMapping::new();
    /// nested.insert("a", 1);
    /// assert_eq!(ConfigValue::Mapping(nested).to_env_string(), r#"{"a":1}"#);
    /// ```
    pub fn to_env_string(&self) -> String {
        match self {
            Self::Null | Self::Unsupported(_) => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Float(f) => format_float(*f),
            Self::String(s) => s.clone(),
            Self::Timestamp(ts) => format_timestamp(ts),
            Self::Sequence(_) | Self::Mapping(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// Returns `true` for [`ConfigValue::Unsupported`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if f == 0.0 {
        // -0.0 prints as "-0" otherwise
        "0".to_string()
    } else if (1e-6..1e21).contains(&f.abs()) {
        f.to_string()
    } else {
        // `{:e}` gives the shortest digits but omits the `+` on the exponent
        let text = format!("{:e}", f);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    }
}

fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// An ordered list of key/value pairs.
///
/// Keys are kept exactly as written in the source; duplicates are allowed
/// here and resolved when the mapping is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigMapping(Vec<(String, ConfigValue)>);

impl ConfigMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, keeping insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.push((key.into(), value.into()));
    }

    /// Returns the value of the last entry with this exact key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigMapping
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<DateTime<FixedOffset>> for ConfigValue {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        Self::Sequence(items)
    }
}

impl From<ConfigMapping> for ConfigValue {
    fn from(mapping: ConfigMapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// JSON projection used for structured values. Unsupported entries are
// dropped from objects and written as `null` inside arrays.
impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null | Self::Unsupported(_) => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(n) => {
                if let Ok(v) = i64::try_from(*n) {
                    serializer.serialize_i64(v)
                } else if let Ok(v) = u64::try_from(*n) {
                    serializer.serialize_u64(v)
                } else {
                    serializer.serialize_i128(*n)
                }
            }
            Self::Float(f) => {
                if !f.is_finite() {
                    serializer.serialize_unit()
                } else if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
                    serializer.serialize_i64(*f as i64)
                } else {
                    serializer.serialize_f64(*f)
                }
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(mapping) => mapping.serialize(serializer),
        }
    }
}

impl Serialize for ConfigMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.iter().filter(|(_, v)| !v.is_unsupported()) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConfigValueVisitor)
    }
}

impl<'de> Deserialize<'de> for ConfigMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ConfigValue::deserialize(deserializer)? {
            ConfigValue::Mapping(mapping) => Ok(mapping),
            ConfigValue::Null => Ok(Self::new()),
            _ => Err(de::Error::custom("expected a mapping of variables")),
        }
    }
}

struct ConfigValueVisitor;

impl<'de> Visitor<'de> for ConfigValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a config value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Integer(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Integer(v.into()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Integer(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<ConfigValue, E> {
        Ok(i128::try_from(v).map_or(ConfigValue::Float(v as f64), ConfigValue::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(v))
    }

    fn visit_bytes<E: de::Error>(self, _v: &[u8]) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Unsupported("bytes".to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ConfigValue, D::Error> {
        ConfigValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ConfigValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ConfigValue::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ConfigValue, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(MapKey(key)) = map.next_key()? {
            if entries.is_empty() && key == TOML_DATETIME_FIELD {
                let raw: String = map.next_value()?;
                return Ok(parse_datetime(raw));
            }
            let value: ConfigValue = map.next_value()?;
            entries.push((key, value));
        }
        Ok(ConfigValue::Mapping(ConfigMapping(entries)))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<ConfigValue, A::Error> {
        // YAML `!Tag value`
        let (tag, variant): (String, _) = data.variant()?;
        variant.newtype_variant::<IgnoredAny>()?;
        Ok(ConfigValue::Unsupported(format!("!{tag}")))
    }
}

// TOML local dates and times carry no offset; they stay as text.
fn parse_datetime(raw: String) -> ConfigValue {
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => ConfigValue::Timestamp(ts),
        Err(_) => ConfigValue::String(raw),
    }
}

/// Mapping key; YAML allows scalars other than strings.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl Visitor<'_> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MapKey, E> {
        Ok(MapKey(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MapKey, E> {
        Ok(MapKey(format_float(v)))
    }
}
