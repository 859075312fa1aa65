use headstyle_core::HeadstyleResult;
use headstyle_dom::StyleTree;

use crate::descriptor::{StyleId, StyleItem};

/// Places a freshly synthesized `<style>` element into the tree.
///
/// Called once per descriptor, in input order. Ownership of `element` passes
/// to the strategy. Errors are returned to the caller of `inject` untouched.
///
/// Any `Fn(&T, T::Element, &StyleItem) -> HeadstyleResult<()>` is a strategy.
pub trait InsertionStrategy<T: StyleTree> {
    fn insert(&self, tree: &T, element: T::Element, item: &StyleItem) -> HeadstyleResult<()>;
}

impl<T, F> InsertionStrategy<T> for F
where
    T: StyleTree,
    F: Fn(&T, T::Element, &StyleItem) -> HeadstyleResult<()>,
{
    fn insert(&self, tree: &T, element: T::Element, item: &StyleItem) -> HeadstyleResult<()> {
        self(tree, element, item)
    }
}

/// Default strategy: the element becomes the last child of `<head>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendToHead;

impl<T: StyleTree> InsertionStrategy<T> for AppendToHead {
    fn insert(&self, tree: &T, element: T::Element, _item: &StyleItem) -> HeadstyleResult<()> {
        tree.append_child(&tree.head()?, &element)
    }
}

/// The element becomes the last child of `<body>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendToBody;

impl<T: StyleTree> InsertionStrategy<T> for AppendToBody {
    fn insert(&self, tree: &T, element: T::Element, _item: &StyleItem) -> HeadstyleResult<()> {
        tree.append_child(&tree.body()?, &element)
    }
}

/// Tags the element with `id="id-<style id>"` (see [`sanitize_id`]) and
/// appends it to `<head>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadWithId;

impl<T: StyleTree> InsertionStrategy<T> for HeadWithId {
    fn insert(&self, tree: &T, element: T::Element, item: &StyleItem) -> HeadstyleResult<()> {
        tree.set_attribute(&element, "id", &sanitize_id(&item.id))?;
        tree.append_child(&tree.head()?, &element)
    }
}

/// Builds `id-<id>` and replaces every non-word character (outside
/// `[A-Za-z0-9_]`) with `_`.
///
/// Characters outside the BMP become two underscores, one per UTF-16 unit,
/// so ids agree with what a browser-side `replace(/\W/g, '_')` yields.
pub fn sanitize_id(id: &StyleId) -> String {
    let raw = format!("id-{}", id);
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.extend(std::iter::repeat_n('_', c.len_utf16()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::StyleDescriptor;
    use headstyle_dom::MemoryDocument;

    #[test]
    fn test_sanitize_id() {
        assert_eq!(
            sanitize_id(&StyleId::from("./src/app.css")),
            "id___src_app_css"
        );
        assert_eq!(sanitize_id(&StyleId::Number(42)), "id_42");
        assert_eq!(sanitize_id(&StyleId::from("a😀")), "id_a__");
    }

    #[test]
    fn test_builtin_targets() {
        let doc = MemoryDocument::new();
        let item = StyleDescriptor::new("./x.css", "x{}").normalize(false);

        let a = doc.create_element("style").unwrap();
        AppendToHead.insert(&doc, a, &item).unwrap();
        let b = doc.create_element("style").unwrap();
        AppendToBody.insert(&doc, b, &item).unwrap();
        let c = doc.create_element("style").unwrap();
        HeadWithId.insert(&doc, c, &item).unwrap();

        assert_eq!(doc.children(doc.head_id()), vec![a, c]);
        assert_eq!(doc.children(doc.body_id()), vec![b]);
        assert_eq!(doc.attribute(c, "id").as_deref(), Some("id___x_css"));
        assert_eq!(doc.attribute(a, "id"), None);
    }

    #[test]
    fn test_closure_is_a_strategy() {
        let doc = MemoryDocument::new();
        let item = StyleDescriptor::new("k", "k{}").normalize(false);
        let strategy = |tree: &MemoryDocument,
                        el: headstyle_dom::NodeId,
                        item: &StyleItem|
         -> HeadstyleResult<()> {
            tree.set_attribute(&el, "data-key", &item.id.to_string())?;
            tree.append_child(&tree.body()?, &el)
        };

        let el = doc.create_element("style").unwrap();
        strategy.insert(&doc, el, &item).unwrap();
        assert_eq!(doc.attribute(el, "data-key").as_deref(), Some("k"));
        assert_eq!(doc.children(doc.body_id()), vec![el]);
    }
}
