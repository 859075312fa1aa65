use std::fmt;

use wasm_bindgen::JsValue;

/// Every failure the injector and the loader bootstrap can surface.
///
/// Nothing in the workspace recovers from these locally; they travel back to
/// whoever called `inject` (or, across the wasm boundary, become a thrown
/// JavaScript `Error`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadstyleError {
    /// The presentation tree rejected an operation (missing head, bad parent...).
    Dom(String),
    /// An exception raised by the host or by a JavaScript insertion function.
    Javascript(String),
    /// A source map could not be serialized or decoded.
    SourceMap(String),
    /// A style descriptor did not have the `[id, css, media?, sourceMap?]` shape.
    Descriptor(String),
    /// Loader options failed validation.
    Config(String),
}

impl fmt::Display for HeadstyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadstyleError::Dom(msg) => write!(f, "DOM Error: {}", msg),
            HeadstyleError::Javascript(msg) => write!(f, "JavaScript Error: {}", msg),
            HeadstyleError::SourceMap(msg) => write!(f, "Source Map Error: {}", msg),
            HeadstyleError::Descriptor(msg) => write!(f, "Descriptor Error: {}", msg),
            HeadstyleError::Config(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl std::error::Error for HeadstyleError {}

impl From<JsValue> for HeadstyleError {
    fn from(value: JsValue) -> Self {
        let msg = value.as_string().unwrap_or_else(|| format!("{:?}", value));
        HeadstyleError::Javascript(msg)
    }
}

impl From<HeadstyleError> for JsValue {
    fn from(err: HeadstyleError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type HeadstyleResult<T> = Result<T, HeadstyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            HeadstyleError::Dom("no head".into()).to_string(),
            "DOM Error: no head"
        );
        assert_eq!(
            HeadstyleError::Config("unknown strategy".into()).to_string(),
            "Config Error: unknown strategy"
        );
        assert_eq!(
            HeadstyleError::Descriptor("too short".into()).to_string(),
            "Descriptor Error: too short"
        );
    }
}
