//! Uniform node record shared by every format.

mod dump;
mod view;

pub(crate) use dump::ChildDump;
pub use view::{AttributeRef, Attributes, Children, NodeRef};
pub(crate) use view::find_in_chain;

use crate::arena::{AttrId, NodeId, StrRef};

/// Singly linked list threaded through `next` links, with the tail kept
/// for O(1) append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain<Id> {
    pub first: Option<Id>,
    pub last: Option<Id>,
    pub len: usize,
}

impl<Id> Default for Chain<Id> {
    fn default() -> Self {
        Self {
            first: None,
            last: None,
            len: 0,
        }
    }
}

impl<Id: Copy> Chain<Id> {
    /// Returns the previous tail so the caller can link it to `id`.
    pub(crate) fn append(&mut self, id: Id) -> Option<Id> {
        let prev = self.last;
        if self.first.is_none() {
            self.first = Some(id);
        }
        self.last = Some(id);
        self.len += 1;
        prev
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Content {
    #[default]
    Empty,
    Scalar(StrRef),
    /// Named members: JSON object members, XML child elements.
    Object(Chain<NodeId>),
    /// Unnamed JSON array elements.
    Array(Chain<NodeId>),
}

impl Content {
    pub fn kind(&self) -> NodeKind {
        match self {
            Content::Empty => NodeKind::Empty,
            Content::Scalar(_) => NodeKind::Scalar,
            Content::Object(_) => NodeKind::Object,
            Content::Array(_) => NodeKind::Array,
        }
    }

    pub(crate) fn children(&self) -> Option<&Chain<NodeId>> {
        match self {
            Content::Object(chain) | Content::Array(chain) => Some(chain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Empty,
    Scalar,
    Object,
    Array,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Empty => "empty",
            NodeKind::Scalar => "scalar",
            NodeKind::Object => "object",
            NodeKind::Array => "array",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: Option<StrRef>,
    pub content: Content,
    pub attributes: Chain<AttrId>,
    pub next: Option<NodeId>,
}

impl Node {
    pub(crate) fn named(name: Option<StrRef>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub(crate) fn first_child(&self) -> Option<NodeId> {
        self.content.children().and_then(|chain| chain.first)
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: StrRef,
    pub value: StrRef,
    pub next: Option<AttrId>,
}
