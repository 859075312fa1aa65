//! Inline source-map comments.
//!
//! A map is JSON-serialized (compact, keys in their original order), the UTF-8
//! bytes are base64-encoded with the standard alphabet, and the result is
//! wrapped in a `sourceMappingURL` data-URI comment.
//!
//! Numbers are written the way `JSON.stringify` writes them: a float with an
//! integral value in the safe-integer range loses its `.0`, so `3.0` encodes
//! as `3`. Other floats keep serde_json's formatting (`1e21` rather than
//! `1e+21`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use headstyle_core::{HeadstyleError, HeadstyleResult};
use serde_json::{Map, Number, Value};

use crate::descriptor::SourceMap;

const COMMENT_PREFIX: &str = "/*# sourceMappingURL=data:application/json;base64,";
const COMMENT_SUFFIX: &str = " */";

/// Encodes `map` as a single-line `/*# sourceMappingURL=... */` comment.
pub fn source_map_comment(map: &SourceMap) -> HeadstyleResult<String> {
    let json = serde_json::to_string(&js_numbers(map.as_value()))
        .map_err(|e| HeadstyleError::SourceMap(e.to_string()))?;
    let encoded = BASE64_STANDARD.encode(json.as_bytes());
    Ok(format!("{}{}{}", COMMENT_PREFIX, encoded, COMMENT_SUFFIX))
}

fn js_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
                Value::Number(Number::from(f as i64))
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(js_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), js_numbers(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

/// Reads back the inline source map from the last line of `text`.
///
/// Returns `Ok(None)` when the last line is not a data-URI source-map comment,
/// and an error when it is one but does not decode.
pub fn extract_source_map(text: &str) -> HeadstyleResult<Option<SourceMap>> {
    let last_line = text.rsplit('\n').next().unwrap_or_default();
    let Some(encoded) = last_line
        .strip_prefix(COMMENT_PREFIX)
        .and_then(|rest| rest.strip_suffix(COMMENT_SUFFIX))
    else {
        return Ok(None);
    };

    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| HeadstyleError::SourceMap(format!("invalid base64: {}", e)))?;
    let value = serde_json::from_slice(&bytes)
        .map_err(|e| HeadstyleError::SourceMap(format!("invalid JSON: {}", e)))?;
    Ok(Some(SourceMap::new(value)))
}
