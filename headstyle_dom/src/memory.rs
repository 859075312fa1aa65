use std::cell::RefCell;
use std::fmt::Write as _;

use headstyle_core::{HeadstyleError, HeadstyleResult};

use crate::StyleTree;

/// Handle to a node stored in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A document kept entirely in memory.
///
/// Nodes live in a flat arena and are never freed; a `NodeId` stays valid
/// for the lifetime of the document. The document starts as
/// `<html><head></head><body></body></html>`.
#[derive(Debug)]
pub struct MemoryDocument {
    nodes: RefCell<Vec<NodeData>>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let doc = Self {
            nodes: RefCell::new(Vec::new()),
            root: NodeId(0),
            head: NodeId(1),
            body: NodeId(2),
        };
        let root = doc.alloc(NodeKind::element("html"));
        let head = doc.alloc(NodeKind::element("head"));
        let body = doc.alloc(NodeKind::element("body"));
        doc.link(root, head);
        doc.link(root, body);
        doc
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn head_id(&self) -> NodeId {
        self.head
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(id.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(id.0).and_then(|n| n.parent)
    }

    /// Tag name of an element node; `None` for text nodes.
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        match &self.nodes.borrow().get(id.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        match &self.nodes.borrow().get(id.0)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// Attributes in the order they were first set.
    pub fn attributes(&self, id: NodeId) -> Vec<(String, String)> {
        match self.nodes.borrow().get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes.clone(),
            _ => Vec::new(),
        }
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        collect_text(&nodes, id, &mut out);
        out
    }

    /// All descendant elements of `scope` named `tag`, in document order.
    pub fn query_all(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = nodes
            .get(scope.0)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            let node = &nodes[id.0];
            if let NodeKind::Element { tag: t, .. } = &node.kind
                && t == tag
            {
                found.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    /// Serializes the subtree rooted at `id` as HTML. Text is written as-is.
    pub fn outer_html(&self, id: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        write_html(&nodes, id, &mut out);
        out
    }

    fn alloc(&self, kind: NodeKind) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(nodes.len() - 1)
    }

    fn link(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    fn check(&self, id: NodeId) -> HeadstyleResult<()> {
        if id.0 < self.nodes.borrow().len() {
            Ok(())
        } else {
            Err(HeadstyleError::Dom(format!("Unknown node {}", id.0)))
        }
    }

    fn check_element(&self, id: NodeId) -> HeadstyleResult<()> {
        self.check(id)?;
        match self.nodes.borrow()[id.0].kind {
            NodeKind::Element { .. } => Ok(()),
            NodeKind::Text(_) => Err(HeadstyleError::Dom(format!(
                "Node {} is a text node and cannot have children or attributes",
                id.0
            ))),
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = nodes[current.0].parent;
        }
        false
    }
}

impl NodeKind {
    fn element(tag: &str) -> Self {
        NodeKind::Element {
            tag: tag.to_string(),
            attributes: Vec::new(),
        }
    }
}

fn collect_text(nodes: &[NodeData], id: NodeId, out: &mut String) {
    let Some(node) = nodes.get(id.0) else {
        return;
    };
    match &node.kind {
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Element { .. } => {
            for child in &node.children {
                collect_text(nodes, *child, out);
            }
        }
    }
}

fn write_html(nodes: &[NodeData], id: NodeId, out: &mut String) {
    let Some(node) = nodes.get(id.0) else {
        return;
    };
    match &node.kind {
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Element { tag, attributes } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                let _ = write!(out, " {}=\"{}\"", name, value.replace('"', "&quot;"));
            }
            out.push('>');
            for child in &node.children {
                write_html(nodes, *child, out);
            }
            let _ = write!(out, "</{}>", tag);
        }
    }
}

impl StyleTree for MemoryDocument {
    type Element = NodeId;

    fn create_element(&self, tag: &str) -> HeadstyleResult<NodeId> {
        if tag.is_empty() {
            return Err(HeadstyleError::Dom("Element tag name is empty".into()));
        }
        Ok(self.alloc(NodeKind::element(tag)))
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> HeadstyleResult<()> {
        self.check_element(*element)?;
        let mut nodes = self.nodes.borrow_mut();
        if let NodeKind::Element { attributes, .. } = &mut nodes[element.0].kind {
            match attributes.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
        Ok(())
    }

    fn append_text(&self, element: &NodeId, text: &str) -> HeadstyleResult<()> {
        self.check_element(*element)?;
        let node = self.alloc(NodeKind::Text(text.to_string()));
        self.link(*element, node);
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> HeadstyleResult<()> {
        self.check_element(*parent)?;
        self.check(*child)?;
        if self.is_ancestor(*child, *parent) {
            return Err(HeadstyleError::Dom(
                "The new child element contains the parent".into(),
            ));
        }
        {
            let mut nodes = self.nodes.borrow_mut();
            if let Some(old) = nodes[child.0].parent.take() {
                nodes[old.0].children.retain(|c| c != child);
            }
        }
        self.link(*parent, *child);
        Ok(())
    }

    fn head(&self) -> HeadstyleResult<NodeId> {
        Ok(self.head)
    }

    fn body(&self) -> HeadstyleResult<NodeId> {
        Ok(self.body)
    }
}
