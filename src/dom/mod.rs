//! In-memory document model.
//!
//! A [`Dom`] is an arena of nodes addressed by [`NodeId`]. [`Dom::detach`]
//! only unlinks a node, so its id stays valid. Nodes dropped by
//! [`Dom::replace`], [`Dom::unwrap_node`], [`Dom::remove_children`] and
//! [`Dom::normalize`] are recycled along with their subtrees, and their ids
//! are handed out again by later allocations; holding one past that point is
//! a logic error. This is the structure the page controller reads and
//! mutates, and the one the UI flows into lines.
//!
//! Elements keep their `class` and `style` attributes in parsed form
//! (a class list and an ordered declaration list) rather than as raw
//! attribute strings.

pub mod parser;

use std::collections::HashMap;

pub use parser::{ParseError, parse_html};

/// Handle to a node inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root.
    Document,
    /// An element with tag, attributes, classes and inline style.
    Element(Element),
    /// A text leaf.
    Text(String),
}

/// Element payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: HashMap<String, String>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    value: String,
    contents_selected: bool,
}

impl Element {
    /// Lower-cased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value, excluding `class` and `style`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// A `data-*` attribute, keyed without the prefix.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attrs.get(&format!("data-{key}")).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Inline style property value.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Current value of a form control.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the control's whole contents are selected.
    pub const fn contents_selected(&self) -> bool {
        self.contents_selected
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena-backed document tree.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
    active_element: Option<NodeId>,
    free: Vec<NodeId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            active_element: None,
            free: Vec::new(),
        }
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots, live or waiting for reuse.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            kind,
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = node;
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Return `node` and its whole subtree to the free list.
    fn recycle(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if self.active_element == Some(current) {
                self.active_element = None;
            }
            let slot = &mut self.nodes[current.0];
            slot.parent = None;
            stack.append(&mut slot.children);
            slot.kind = NodeKind::Text(String::new());
            self.free.push(current);
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeKind::Element(Element {
            tag: tag.to_ascii_lowercase(),
            ..Element::default()
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Text(text.into()))
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text of a text node, `None` for other node kinds.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::Text(_))
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(Element::tag)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Unlink `node` from its parent, if any.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Put `replacement` where `old` is; `old` and its subtree are recycled.
    ///
    /// Returns `false` when `old` has no parent.
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        self.detach(replacement);
        let Some(index) = self.child_index(parent, old) else {
            return false;
        };
        self.nodes[parent.0].children[index] = replacement;
        self.nodes[replacement.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        self.recycle(old);
        true
    }

    /// Replace `node` with its own children, keeping their order. The emptied
    /// `node` is recycled.
    pub fn unwrap_node(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.parent(node) else {
            return false;
        };
        let Some(index) = self.child_index(parent, node) else {
            return false;
        };
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent.0].children;
        siblings.remove(index);
        for (offset, child) in children.into_iter().enumerate() {
            siblings.insert(index + offset, child);
        }
        self.nodes[node.0].parent = None;
        self.recycle(node);
        true
    }

    /// Drop every child of `node`, recycling their subtrees.
    pub fn remove_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
            self.recycle(child);
        }
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|candidate| *candidate == child)
    }

    /// Concatenated text of every text leaf under `node` (or the node itself).
    pub fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Document | NodeKind::Element(_) => {
                let mut out = String::new();
                for leaf in self.text_leaves(node) {
                    if let Some(text) = self.text(leaf) {
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }

    /// Replace the children of `node` with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, value: &str) {
        self.remove_children(node);
        if !value.is_empty() {
            let text = self.create_text(value);
            self.append_child(node, text);
        }
    }

    /// Append a new element under `parent`, optionally holding text.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, text: Option<&str>) -> NodeId {
        let element = self.create_element(tag);
        self.append_child(parent, element);
        if let Some(text) = text {
            self.set_text_content(element, text);
        }
        element
    }

    /// Merge adjacent text nodes and drop empty ones, recursively. Dropped
    /// text nodes are recycled.
    pub fn normalize(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            if let NodeKind::Text(text) = &self.nodes[child.0].kind {
                if text.is_empty() {
                    self.nodes[child.0].parent = None;
                    self.recycle(child);
                    continue;
                }
                if let Some(&previous) = kept.last()
                    && self.is_text(previous)
                {
                    let text = text.clone();
                    if let NodeKind::Text(prev_text) = &mut self.nodes[previous.0].kind {
                        prev_text.push_str(&text);
                    }
                    self.nodes[child.0].parent = None;
                    self.recycle(child);
                    continue;
                }
            } else {
                self.normalize(child);
            }
            kept.push(child);
        }
        self.nodes[node.0].children = kept;
    }

    /// Set an attribute; `class` and `style` are parsed into their structured forms.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => {
                element.classes = value.split_whitespace().map(ToOwned::to_owned).collect();
            }
            "style" => element.style = parse_style_declarations(value),
            "value" => {
                element.value = value.to_string();
                element.attrs.insert(name, value.to_string());
            }
            _ => {
                element.attrs.insert(name, value.to_string());
            }
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|element| element.attr(name))
    }

    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.element(node).and_then(|element| element.data(key))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node)
            && !element.has_class(class)
        {
            element.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node).and_then(|element| element.style(property))
    }

    /// Set an inline style property. An empty value removes the declaration.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let property = property.to_ascii_lowercase();
        if value.is_empty() {
            element.style.retain(|(name, _)| *name != property);
            return;
        }
        if let Some(slot) = element.style.iter_mut().find(|(name, _)| *name == property) {
            slot.1 = value.to_string();
        } else {
            element.style.push((property, value.to_string()));
        }
    }

    /// Inline `display` value of this node only.
    pub fn display(&self, node: NodeId) -> Option<&str> {
        self.style(node, "display")
    }

    /// Whether neither the node nor any ancestor has `display: none`.
    pub fn is_displayed(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.display(current) == Some("none") {
                return false;
            }
            cursor = self.parent(current);
        }
        true
    }

    pub fn value(&self, node: NodeId) -> &str {
        self.element(node).map_or("", Element::value)
    }

    /// Set a control's value; clears any whole-contents selection.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.value = value.to_string();
            element.contents_selected = false;
        }
    }

    /// Mark the control's contents as selected. A no-op on an empty value.
    pub fn select_contents(&mut self, node: NodeId) {
        if let Some(element) = self.element_mut(node) {
            element.contents_selected = !element.value.is_empty();
        }
    }

    pub fn clear_selection(&mut self, node: NodeId) {
        if let Some(element) = self.element_mut(node) {
            element.contents_selected = false;
        }
    }

    pub fn contents_selected(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(Element::contents_selected)
    }

    pub const fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    pub fn focus(&mut self, node: NodeId) {
        self.active_element = Some(node);
    }

    pub fn blur(&mut self) {
        self.active_element = None;
    }

    /// Pre-order descendants of `node`, excluding the node itself.
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(node).to_vec();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    /// Every text leaf under `node`, in document order.
    pub fn text_leaves(&self, node: NodeId) -> Vec<NodeId> {
        self.descendants(node)
            .filter(|candidate| self.is_text(*candidate))
            .collect()
    }

    /// First attached element whose `id` matches.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    /// Elements under `scope` carrying `class`, in document order.
    pub fn query_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    pub fn first_by_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .find(|node| self.has_class(*node, class))
    }

    pub fn first_by_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(scope)
            .find(|node| self.tag_name(*node) == Some(tag))
    }

    /// Nearest of `node` and its ancestors that carries `class`.
    pub fn closest_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }
}

/// Iterator returned by [`Dom::descendants`].
pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.dom.children(node).iter().rev().copied());
        Some(node)
    }
}

fn parse_style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name, value.to_string()))
        })
        .collect()
}
