use smallvec::SmallVec;

use crate::arena::{Arena, AttrId, NodeId};
use crate::num::number::{parse_integer_prefix, parse_number_prefix};

use super::{Content, NodeKind};

/// Borrowed handle to one node of a document.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a Arena,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(arena: &'a Arena, id: NodeId) -> Self {
        Self { arena, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&'a [u8]> {
        self.arena
            .node(self.id)
            .name
            .map(|name| self.arena.get(name))
    }

    pub fn name_str(&self) -> Option<&'a str> {
        self.name().and_then(|name| std::str::from_utf8(name).ok())
    }

    /// Scalar text, if this node holds one.
    pub fn value(&self) -> Option<&'a [u8]> {
        match self.arena.node(self.id).content {
            Content::Scalar(text) => Some(self.arena.get(text)),
            _ => None,
        }
    }

    pub fn value_str(&self) -> Option<&'a str> {
        self.value().and_then(|value| std::str::from_utf8(value).ok())
    }

    pub fn kind(&self) -> NodeKind {
        self.arena.node(self.id).content.kind()
    }

    pub fn content(&self) -> Content {
        self.arena.node(self.id).content
    }

    pub fn has_children(&self) -> bool {
        self.arena.node(self.id).first_child().is_some()
    }

    pub fn children(&self) -> Children<'a> {
        Children {
            arena: self.arena,
            next: self.arena.node(self.id).first_child(),
        }
    }

    pub fn attributes(&self) -> Attributes<'a> {
        Attributes {
            arena: self.arena,
            next: self.arena.node(self.id).attributes.first,
        }
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.arena
            .node(self.id)
            .next
            .map(|id| NodeRef::new(self.arena, id))
    }

    /// Pre-order search below this node. `depth == 0` compares direct
    /// children only; `SEARCH_DEPTH_UNBOUNDED` removes the limit.
    pub fn child(&self, name: impl AsRef<[u8]>, depth: usize) -> Option<NodeRef<'a>> {
        let first = self.arena.node(self.id).first_child();
        find_in_chain(self.arena, first, name.as_ref(), depth)
            .map(|id| NodeRef::new(self.arena, id))
    }

    pub fn child_at(&self, index: usize) -> Option<NodeRef<'a>> {
        self.children().nth(index)
    }

    pub fn attribute(&self, name: impl AsRef<[u8]>) -> Option<AttributeRef<'a>> {
        let name = name.as_ref();
        self.attributes().find(|attr| attr.name() == name)
    }

    /// First sibling after this node with the given name.
    pub fn sibling(&self, name: impl AsRef<[u8]>) -> Option<NodeRef<'a>> {
        let name = name.as_ref();
        let mut cursor = self.next_sibling();
        while let Some(node) = cursor {
            if node.name() == Some(name) {
                return Some(node);
            }
            cursor = node.next_sibling();
        }
        None
    }

    pub fn as_integer(&self) -> i64 {
        self.value().map_or(0, parse_integer_prefix)
    }

    pub fn as_number(&self) -> f64 {
        self.value().map_or(0.0, parse_number_prefix)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name().map(String::from_utf8_lossy))
            .field("kind", &self.kind())
            .finish()
    }
}

pub(crate) fn find_in_chain(
    arena: &Arena,
    first: Option<NodeId>,
    name: &[u8],
    depth: usize,
) -> Option<NodeId> {
    let mut stack: SmallVec<[(NodeId, usize); 16]> = SmallVec::new();
    if let Some(first) = first {
        stack.push((first, depth));
    }
    while let Some((id, depth)) = stack.pop() {
        let node = arena.node(id);
        if node.name.map(|text| arena.get(text)) == Some(name) {
            return Some(id);
        }
        if let Some(next) = node.next {
            stack.push((next, depth));
        }
        if depth > 0 {
            if let Some(child) = node.first_child() {
                stack.push((child, depth - 1));
            }
        }
    }
    None
}

#[derive(Clone, Copy)]
pub struct AttributeRef<'a> {
    arena: &'a Arena,
    id: AttrId,
}

impl<'a> AttributeRef<'a> {
    pub fn id(&self) -> AttrId {
        self.id
    }

    pub fn name(&self) -> &'a [u8] {
        self.arena.get(self.arena.attribute(self.id).name)
    }

    pub fn name_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.name()).ok()
    }

    pub fn value(&self) -> &'a [u8] {
        self.arena.get(self.arena.attribute(self.id).value)
    }

    pub fn value_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.value()).ok()
    }

    pub fn as_integer(&self) -> i64 {
        parse_integer_prefix(self.value())
    }

    pub fn as_number(&self) -> f64 {
        parse_number_prefix(self.value())
    }
}

impl std::fmt::Debug for AttributeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeRef")
            .field("name", &String::from_utf8_lossy(self.name()))
            .field("value", &String::from_utf8_lossy(self.value()))
            .finish()
    }
}

/// Iterator over a sibling chain.
#[derive(Clone)]
pub struct Children<'a> {
    arena: &'a Arena,
    next: Option<NodeId>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(arena: &'a Arena, first: Option<NodeId>) -> Self {
        Self { arena, next: first }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.arena.node(id).next;
        Some(NodeRef::new(self.arena, id))
    }
}

#[derive(Clone)]
pub struct Attributes<'a> {
    arena: &'a Arena,
    next: Option<AttrId>,
}

impl<'a> Iterator for Attributes<'a> {
    type Item = AttributeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.arena.attribute(id).next;
        Some(AttributeRef {
            arena: self.arena,
            id,
        })
    }
}
