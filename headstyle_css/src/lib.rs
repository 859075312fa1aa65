pub mod descriptor;
pub mod source_map;
pub mod strategy;

pub mod prelude {
    pub use crate::descriptor::{SourceMap, StyleDescriptor, StyleId, StyleItem};
    pub use crate::source_map::{extract_source_map, source_map_comment};
    pub use crate::strategy::{AppendToBody, AppendToHead, HeadWithId, InsertionStrategy};
    pub use crate::{InjectOptions, inject};
}

use std::rc::Rc;

use headstyle_core::HeadstyleResult;
use headstyle_dom::StyleTree;

use crate::descriptor::{StyleDescriptor, StyleItem};
use crate::source_map::source_map_comment;
use crate::strategy::{AppendToHead, InsertionStrategy};

/// Injector configuration.
///
/// `insertion: None` means [`AppendToHead`]; `source_map` defaults to `false`,
/// which drops source maps even when descriptors carry them.
pub struct InjectOptions<T: StyleTree> {
    pub insertion: Option<Rc<dyn InsertionStrategy<T>>>,
    pub source_map: bool,
}

impl<T: StyleTree> Default for InjectOptions<T> {
    fn default() -> Self {
        Self {
            insertion: None,
            source_map: false,
        }
    }
}

impl<T: StyleTree> Clone for InjectOptions<T> {
    fn clone(&self) -> Self {
        Self {
            insertion: self.insertion.clone(),
            source_map: self.source_map,
        }
    }
}

impl<T: StyleTree> InjectOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_map(mut self, enabled: bool) -> Self {
        self.source_map = enabled;
        self
    }

    pub fn insertion<S>(mut self, strategy: S) -> Self
    where
        S: InsertionStrategy<T> + 'static,
    {
        self.insertion = Some(Rc::new(strategy));
        self
    }

    pub fn shared_insertion(mut self, strategy: Rc<dyn InsertionStrategy<T>>) -> Self {
        self.insertion = Some(strategy);
        self
    }
}

/// Injects one `<style>` element per descriptor.
///
/// Descriptors are normalized, turned into elements and handed to the
/// configured insertion strategy one at a time, in input order. The first
/// error (tree, strategy or source-map serialization) stops the run and is
/// returned as is; elements already inserted stay in place.
///
/// Calling this twice with the same list inserts everything twice.
pub fn inject<T, I>(tree: &T, list: I, options: &InjectOptions<T>) -> HeadstyleResult<()>
where
    T: StyleTree,
    I: IntoIterator<Item = StyleDescriptor>,
{
    let strategy: &dyn InsertionStrategy<T> = match options.insertion.as_deref() {
        Some(strategy) => strategy,
        None => &AppendToHead,
    };

    for item in normalize(list, options.source_map) {
        let element = create_style_tag(tree, &item)?;
        strategy.insert(tree, element, &item)?;
    }
    Ok(())
}

/// Normalizes every descriptor, keeping length and order.
pub fn normalize<I>(list: I, source_map: bool) -> Vec<StyleItem>
where
    I: IntoIterator<Item = StyleDescriptor>,
{
    list.into_iter().map(|d| d.normalize(source_map)).collect()
}

/// Builds a detached `<style type="text/css">` element for `item`.
pub fn create_style_tag<T: StyleTree>(tree: &T, item: &StyleItem) -> HeadstyleResult<T::Element> {
    let element = tree.create_element("style")?;
    if let Some(media) = item.media.as_deref().filter(|m| !m.is_empty()) {
        tree.set_attribute(&element, "media", media)?;
    }
    tree.set_attribute(&element, "type", "text/css")?;
    tree.append_text(&element, &style_text(item)?)?;
    Ok(element)
}

/// Text content of the element: the css, then the source-map comment on its
/// own line when the item still carries a map.
pub fn style_text(item: &StyleItem) -> HeadstyleResult<String> {
    match &item.source_map {
        Some(map) => Ok(format!("{}\n{}", item.css, source_map_comment(map)?)),
        None => Ok(item.css.clone()),
    }
}
