use std::fmt;

use headstyle_core::{HeadstyleError, HeadstyleResult};
use headstyle_css::InjectOptions;
use headstyle_dom::StyleTree;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::StrategyRegistry;

const LOADER_NAME: &str = "Headstyle Loader";

/// Options object the loader is configured with.
///
/// ```json
/// { "sourceMap": true, "insertionFn": "headWithId" }
/// ```
///
/// `insertionFn` names a strategy registered in a [`StrategyRegistry`]. Any
/// falsy value (`null`, `false`, `""` or a missing key) selects the default
/// head-append strategy. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoaderOptions {
    pub source_map: bool,
    #[serde(
        deserialize_with = "strategy_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub insertion_fn: Option<String>,
}

impl LoaderOptions {
    pub fn from_json(json: &str) -> HeadstyleResult<Self> {
        serde_json::from_str(json).map_err(schema_error)
    }

    pub fn from_value(value: Value) -> HeadstyleResult<Self> {
        serde_json::from_value(value).map_err(schema_error)
    }

    /// Turns the options into injector configuration, looking the strategy
    /// name up in `registry`.
    pub fn resolve<T: StyleTree>(
        &self,
        registry: &StrategyRegistry<T>,
    ) -> HeadstyleResult<InjectOptions<T>> {
        let options = InjectOptions::new().source_map(self.source_map);
        Ok(match registry.resolve(self.insertion_fn.as_deref())? {
            Some(strategy) => options.shared_insertion(strategy),
            None => options,
        })
    }
}

fn schema_error(err: serde_json::Error) -> HeadstyleError {
    HeadstyleError::Config(format!(
        "Invalid options object. {} has been initialized using an options object that does not match the API schema. {}",
        LOADER_NAME, err
    ))
}

fn strategy_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    struct NameVisitor;

    impl<'de> Visitor<'de> for NameVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a strategy name or a falsy value")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()).filter(|s| !s.is_empty()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            if v {
                Err(E::invalid_value(de::Unexpected::Bool(true), &self))
            } else {
                Ok(None)
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(NameVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use headstyle_dom::MemoryDocument;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let opts = LoaderOptions::from_json("{}").unwrap();
        assert_eq!(opts, LoaderOptions::default());
        assert!(!opts.source_map);
        assert_eq!(opts.insertion_fn, None);
    }

    #[test]
    fn test_falsy_insertion_fn_means_default() {
        for raw in [json!(null), json!(false), json!("")] {
            let opts = LoaderOptions::from_value(json!({ "insertionFn": raw })).unwrap();
            assert_eq!(opts.insertion_fn, None);
        }
        let opts = LoaderOptions::from_value(json!({"insertionFn": "appendToBody"})).unwrap();
        assert_eq!(opts.insertion_fn.as_deref(), Some("appendToBody"));
    }

    #[test]
    fn test_schema_violations() {
        for bad in [
            json!({"sourceMap": "yes"}),
            json!({"insertionFn": true}),
            json!({"insertionFn": 3}),
            json!({"insert": "appendToHead"}),
        ] {
            match LoaderOptions::from_value(bad) {
                Err(HeadstyleError::Config(msg)) => assert!(msg.contains(LOADER_NAME)),
                other => panic!("expected config error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_resolve() {
        let registry = StrategyRegistry::<MemoryDocument>::with_builtins();

        let resolved = LoaderOptions::from_json(r#"{"sourceMap": true}"#)
            .unwrap()
            .resolve(&registry)
            .unwrap();
        assert!(resolved.source_map);
        assert!(resolved.insertion.is_none());

        let resolved = LoaderOptions::from_json(r#"{"insertionFn": "headWithId"}"#)
            .unwrap()
            .resolve(&registry)
            .unwrap();
        assert!(resolved.insertion.is_some());

        let err = LoaderOptions::from_json(r#"{"insertionFn": "nowhere"}"#)
            .unwrap()
            .resolve(&registry)
            .err()
            .unwrap();
        assert!(matches!(err, HeadstyleError::Config(_)));
    }
}
