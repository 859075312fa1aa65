use std::fmt;

use headstyle_core::{HeadstyleError, HeadstyleResult};
use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a style unit: the bundler's module id, which is either a
/// number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum StyleId {
    Number(i64),
    Name(String),
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleId::Number(n) => write!(f, "{}", n),
            StyleId::Name(s) => f.write_str(s),
        }
    }
}

impl StyleId {
    /// Id for a JavaScript number. Integral values in the safe-integer range
    /// become `Number`; anything else keeps its decimal text as a `Name`.
    pub fn from_f64(v: f64) -> Self {
        if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
            StyleId::Number(v as i64)
        } else {
            StyleId::Name(v.to_string())
        }
    }
}

impl From<&str> for StyleId {
    fn from(value: &str) -> Self {
        StyleId::Name(value.to_string())
    }
}

impl From<String> for StyleId {
    fn from(value: String) -> Self {
        StyleId::Name(value)
    }
}

impl From<i64> for StyleId {
    fn from(value: i64) -> Self {
        StyleId::Number(value)
    }
}

impl<'de> Deserialize<'de> for StyleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = StyleId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a module id (string or integer)")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<StyleId, E> {
                Ok(StyleId::Name(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<StyleId, E> {
                Ok(StyleId::Name(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<StyleId, E> {
                Ok(StyleId::Number(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<StyleId, E> {
                i64::try_from(v)
                    .map(StyleId::Number)
                    .or_else(|_| Ok(StyleId::Name(v.to_string())))
            }

            // JavaScript hands every number over as a double.
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<StyleId, E> {
                Ok(StyleId::from_f64(v))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Structured source-map data attached to a descriptor by the upstream
/// CSS compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceMap(Value);

impl SourceMap {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for SourceMap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One compiled style unit as the bundler produces it.
///
/// On the wire this is the positional tuple `[id, css, media?, sourceMap?]`.
/// It is decoded into named fields once, here. Trailing tuple elements added
/// by newer CSS compilers are ignored.
///
/// `media` is kept exactly as given, `""` included; only `null` or a missing
/// slot mean "no media". A falsy `sourceMap` (`null`, `false`, `0`, `""`)
/// decodes to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub id: StyleId,
    pub css: String,
    pub media: Option<String>,
    pub source_map: Option<SourceMap>,
}

impl StyleDescriptor {
    pub fn new(id: impl Into<StyleId>, css: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            css: css.into(),
            media: None,
            source_map: None,
        }
    }

    pub fn media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn source_map(mut self, map: impl Into<SourceMap>) -> Self {
        self.source_map = Some(map.into()).filter(|m| is_truthy(m.as_value()));
        self
    }

    /// Decodes a JSON array of descriptor tuples.
    pub fn list_from_json(json: &str) -> HeadstyleResult<Vec<Self>> {
        serde_json::from_str(json).map_err(|e| HeadstyleError::Descriptor(e.to_string()))
    }

    /// Decodes a single descriptor from an already parsed JSON value.
    pub fn from_value(value: Value) -> HeadstyleResult<Self> {
        serde_json::from_value(value).map_err(|e| HeadstyleError::Descriptor(e.to_string()))
    }

    /// Applies the source-map gate: the map survives only when `source_map`
    /// propagation is enabled.
    pub fn normalize(self, source_map: bool) -> StyleItem {
        let StyleDescriptor {
            id,
            css,
            media,
            source_map: map,
        } = self;
        StyleItem {
            id,
            css,
            media,
            source_map: if source_map { map } else { None },
        }
    }
}

impl<'de> Deserialize<'de> for StyleDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TupleVisitor;

        impl<'de> Visitor<'de> for TupleVisitor {
            type Value = StyleDescriptor;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a style descriptor [id, css, media?, sourceMap?]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<StyleDescriptor, A::Error> {
                let id: StyleId = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let css: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let media = seq.next_element::<Option<String>>()?.flatten();
                let source_map = seq
                    .next_element::<Option<Value>>()?
                    .flatten()
                    .filter(is_truthy)
                    .map(SourceMap);
                while seq.next_element::<IgnoredAny>()?.is_some() {}

                Ok(StyleDescriptor {
                    id,
                    css,
                    media,
                    source_map,
                })
            }
        }

        deserializer.deserialize_seq(TupleVisitor)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A descriptor after normalization, as handed to insertion strategies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleItem {
    pub id: StyleId,
    pub css: String,
    pub media: Option<String>,
    pub source_map: Option<SourceMap>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_tuple() {
        let d = StyleDescriptor::from_value(json!([
            "./app.css",
            "a{color:red}",
            "print",
            {"version": 3, "mappings": "AAAA"}
        ]))
        .unwrap();
        assert_eq!(d.id, StyleId::Name("./app.css".into()));
        assert_eq!(d.css, "a{color:red}");
        assert_eq!(d.media.as_deref(), Some("print"));
        assert_eq!(
            d.source_map.unwrap().as_value(),
            &json!({"version": 3, "mappings": "AAAA"})
        );
    }

    #[test]
    fn test_decode_falsy_fields() {
        let d = StyleDescriptor::from_value(json!([7, "b{}", "", null])).unwrap();
        assert_eq!(d.id, StyleId::Number(7));
        assert_eq!(d.media.as_deref(), Some(""));
        assert_eq!(d.source_map, None);

        let d = StyleDescriptor::from_value(json!([7, "b{}", null, false])).unwrap();
        assert_eq!(d.media, None);
        assert_eq!(d.source_map, None);

        let d = StyleDescriptor::from_value(json!([7, "b{}"])).unwrap();
        assert_eq!(d.media, None);
    }

    #[test]
    fn test_decode_ignores_trailing_elements() {
        let d = StyleDescriptor::from_value(json!(["x", "c{}", "", null, "supports", "layer"]))
            .unwrap();
        assert_eq!(d.css, "c{}");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(
            StyleDescriptor::from_value(json!(["only-id"])),
            Err(HeadstyleError::Descriptor(_))
        ));
        assert!(StyleDescriptor::from_value(json!({"id": 1, "css": ""})).is_err());
        assert!(StyleDescriptor::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_float_ids_from_javascript() {
        let d = StyleDescriptor::from_value(json!([12.0, "a{}"])).unwrap();
        assert_eq!(d.id, StyleId::Number(12));
        assert_eq!(d.id.to_string(), "12");

        let d = StyleDescriptor::from_value(json!([1.5, "a{}"])).unwrap();
        assert_eq!(d.id, StyleId::Name("1.5".into()));
    }

    #[test]
    fn test_id_from_f64() {
        assert_eq!(StyleId::from_f64(12.0), StyleId::Number(12));
        assert_eq!(StyleId::from_f64(-3.0), StyleId::Number(-3));
        assert_eq!(StyleId::from_f64(1.5), StyleId::Name("1.5".into()));
        assert_eq!(StyleId::from_f64(1e300), StyleId::Name(1e300_f64.to_string()));
        assert_eq!(StyleId::from_f64(f64::NAN), StyleId::Name("NaN".into()));
    }

    #[test]
    fn test_normalize_gates_source_map() {
        let d = StyleDescriptor::new("a", "x{}").source_map(json!({"version": 3}));
        assert!(d.clone().normalize(true).source_map.is_some());
        assert!(d.normalize(false).source_map.is_none());
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = StyleDescriptor::new(3_i64, "x{}")
            .media("screen")
            .source_map(json!({"version": 3}))
            .normalize(true);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"id": 3, "css": "x{}", "media": "screen", "sourceMap": {"version": 3}})
        );
    }
}
