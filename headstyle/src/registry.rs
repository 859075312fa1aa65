use std::collections::HashMap;
use std::rc::Rc;

use headstyle_core::{HeadstyleError, HeadstyleResult};
use headstyle_css::strategy::{AppendToBody, AppendToHead, HeadWithId, InsertionStrategy};
use headstyle_dom::StyleTree;

pub const APPEND_TO_HEAD: &str = "appendToHead";
pub const APPEND_TO_BODY: &str = "appendToBody";
pub const HEAD_WITH_ID: &str = "headWithId";

/// Insertion strategies addressable by name from [`LoaderOptions`](crate::LoaderOptions).
///
/// Strategies are registered up front by the host instead of being shipped
/// as code inside the options.
pub struct StrategyRegistry<T: StyleTree> {
    strategies: HashMap<String, Rc<dyn InsertionStrategy<T>>>,
}

impl<T: StyleTree> Default for StrategyRegistry<T> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl<T: StyleTree> StrategyRegistry<T> {
    /// A registry with no strategies at all.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// `appendToHead`, `appendToBody` and `headWithId`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(APPEND_TO_HEAD, AppendToHead);
        registry.register(APPEND_TO_BODY, AppendToBody);
        registry.register(HEAD_WITH_ID, HeadWithId);
        registry
    }

    /// Registers `strategy` under `name`, returning the one it replaced.
    pub fn register<S>(&mut self, name: &str, strategy: S) -> Option<Rc<dyn InsertionStrategy<T>>>
    where
        S: InsertionStrategy<T> + 'static,
    {
        let previous = self.strategies.insert(name.to_string(), Rc::new(strategy));
        if previous.is_some() {
            headstyle_core::warn!("Insertion strategy '{}' was registered twice; keeping the latest", name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn InsertionStrategy<T>>> {
        self.strategies.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Looks up the strategy for an `insertionFn` option value.
    ///
    /// A missing or empty name yields `Ok(None)`, meaning "use the default".
    pub fn resolve(&self, name: Option<&str>) -> HeadstyleResult<Option<Rc<dyn InsertionStrategy<T>>>> {
        match name.filter(|n| !n.is_empty()) {
            None => Ok(None),
            Some(name) => self.get(name).map(Some).ok_or_else(|| {
                HeadstyleError::Config(format!(
                    "Unknown insertion strategy '{}' (registered: {})",
                    name,
                    self.names().join(", ")
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headstyle_css::descriptor::StyleItem;
    use headstyle_dom::{MemoryDocument, NodeId};

    #[test]
    fn test_builtins() {
        let registry = StrategyRegistry::<MemoryDocument>::with_builtins();
        assert_eq!(registry.names(), vec![APPEND_TO_BODY, APPEND_TO_HEAD, HEAD_WITH_ID]);
        assert!(StrategyRegistry::<MemoryDocument>::empty().names().is_empty());
    }

    #[test]
    fn test_resolve_falsy_and_unknown() {
        let registry = StrategyRegistry::<MemoryDocument>::with_builtins();
        assert!(registry.resolve(None).unwrap().is_none());
        assert!(registry.resolve(Some("")).unwrap().is_none());
        assert!(registry.resolve(Some(APPEND_TO_BODY)).unwrap().is_some());

        match registry.resolve(Some("prepend")) {
            Err(HeadstyleError::Config(msg)) => {
                assert!(msg.contains("prepend"));
                assert!(msg.contains(APPEND_TO_HEAD));
            }
            _ => panic!("expected unknown strategy error"),
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = StrategyRegistry::<MemoryDocument>::with_builtins();
        let previous = registry.register(
            APPEND_TO_HEAD,
            |tree: &MemoryDocument, el: NodeId, _: &StyleItem| -> HeadstyleResult<()> {
                tree.append_child(&tree.body()?, &el)
            },
        );
        assert!(previous.is_some());

        let custom = registry.register(
            "nowhere",
            |_: &MemoryDocument, _: NodeId, _: &StyleItem| -> HeadstyleResult<()> { Ok(()) },
        );
        assert!(custom.is_none());
        assert!(registry.contains("nowhere"));
    }
}
