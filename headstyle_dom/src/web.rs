use headstyle_core::{HeadstyleError, HeadstyleResult};
use web_sys::{Document, Element, Window};

// --- Window & Document Access ---

thread_local! {
    static WINDOW: Option<Window> = web_sys::window();
    static DOCUMENT: Option<Document> = WINDOW.with(|w| w.as_ref().and_then(Window::document));
}

/// Returns the cached [`Window`](web_sys::Window).
pub fn window() -> HeadstyleResult<Window> {
    WINDOW
        .with(|w| w.clone())
        .ok_or_else(|| HeadstyleError::Dom("Window not found".into()))
}

/// Returns the cached [`Document`](web_sys::Document).
pub fn document() -> HeadstyleResult<Document> {
    DOCUMENT
        .with(|d| d.clone())
        .ok_or_else(|| HeadstyleError::Dom("Document not found".into()))
}

/// [`StyleTree`](crate::StyleTree) over a live browser document.
#[derive(Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Wraps the document of the current window.
    pub fn current() -> HeadstyleResult<Self> {
        document().map(Self::new)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl crate::StyleTree for WebDocument {
    type Element = Element;

    fn create_element(&self, tag: &str) -> HeadstyleResult<Element> {
        Ok(self.document.create_element(tag)?)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> HeadstyleResult<()> {
        Ok(element.set_attribute(name, value)?)
    }

    fn append_text(&self, element: &Element, text: &str) -> HeadstyleResult<()> {
        let node = self.document.create_text_node(text);
        element.append_child(&node)?;
        Ok(())
    }

    fn append_child(&self, parent: &Element, child: &Element) -> HeadstyleResult<()> {
        parent.append_child(child)?;
        Ok(())
    }

    fn head(&self) -> HeadstyleResult<Element> {
        self.document
            .head()
            .map(Element::from)
            .ok_or_else(|| HeadstyleError::Dom("No <head> element found in document".into()))
    }

    fn body(&self) -> HeadstyleResult<Element> {
        self.document
            .body()
            .map(Element::from)
            .ok_or_else(|| HeadstyleError::Dom("No <body> element found in document".into()))
    }
}
