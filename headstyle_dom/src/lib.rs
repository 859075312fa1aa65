pub mod memory;
pub mod web;

pub use memory::{MemoryDocument, NodeId};
pub use web::{WebDocument, document, window};

use headstyle_core::HeadstyleResult;

/// The slice of a document the style injector needs.
///
/// The document is passed around as an explicit handle instead of being read
/// from a global, so the injector runs the same against the browser
/// ([`WebDocument`]) and against an in-process tree ([`MemoryDocument`]).
///
/// Handles use interior mutability; every method takes `&self`.
pub trait StyleTree {
    /// Handle to an element node. Cloning the handle never clones the node.
    type Element: Clone;

    /// Creates a detached element named `tag`.
    fn create_element(&self, tag: &str) -> HeadstyleResult<Self::Element>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str)
    -> HeadstyleResult<()>;

    /// Creates a text node holding `text` verbatim and appends it to `element`.
    fn append_text(&self, element: &Self::Element, text: &str) -> HeadstyleResult<()>;

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> HeadstyleResult<()>;

    fn head(&self) -> HeadstyleResult<Self::Element>;

    fn body(&self) -> HeadstyleResult<Self::Element>;
}
