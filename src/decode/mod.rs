//! Two-pass parsing: every grammar is one generic scanner that reports what
//! it finds to a [`Pass`]. It runs once with [`Measure`] to compute the
//! exact arena footprint and once with [`Populate`] to build the tree inside
//! an arena of exactly that size.

mod cursor;
pub(crate) mod ini;
pub(crate) mod json;
pub(crate) mod xml;

use tracing::debug;

use crate::arena::{Arena, Footprint, NodeId};
use crate::tree::{Attribute, Chain, Content, Node};
use crate::{Error, ErrorStage, ParseOptions, Result};

pub(crate) use cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Object,
    Array,
}

/// Receiver for the events of one scan.
pub(crate) trait Pass {
    type Id: Copy;

    fn node(&mut self, name: Option<&[u8]>) -> Result<Self::Id>;
    fn scalar(&mut self, node: Self::Id, text: &[u8]) -> Result<()>;
    fn attribute(&mut self, node: Self::Id, name: &[u8], value: &[u8]) -> Result<()>;
    /// Gives `node` an empty child list of the given kind.
    fn open(&mut self, node: Self::Id, kind: ListKind) -> Result<()>;
    /// Appends `child` to `parent`'s child list, or to the roots when
    /// `parent` is `None`.
    fn link(&mut self, parent: Option<Self::Id>, child: Self::Id) -> Result<()>;
}

pub(crate) trait Grammar {
    const NAME: &'static str;

    fn scan<P: Pass>(
        cursor: &mut Cursor<'_>,
        pass: &mut P,
        options: &ParseOptions,
    ) -> Result<()>;
}

#[derive(Debug, Default)]
pub(crate) struct Measure {
    footprint: Footprint,
}

impl Pass for Measure {
    type Id = ();

    fn node(&mut self, name: Option<&[u8]>) -> Result<()> {
        self.footprint.nodes += 1;
        if let Some(name) = name {
            self.footprint.add_string(name);
        }
        Ok(())
    }

    fn scalar(&mut self, _node: (), text: &[u8]) -> Result<()> {
        self.footprint.add_string(text);
        Ok(())
    }

    fn attribute(&mut self, _node: (), name: &[u8], value: &[u8]) -> Result<()> {
        self.footprint.attributes += 1;
        self.footprint.add_string(name);
        self.footprint.add_string(value);
        Ok(())
    }

    fn open(&mut self, _node: (), _kind: ListKind) -> Result<()> {
        Ok(())
    }

    fn link(&mut self, _parent: Option<()>, _child: ()) -> Result<()> {
        Ok(())
    }
}

pub(crate) struct Populate<'a> {
    arena: &'a mut Arena,
    roots: Chain<NodeId>,
}

impl<'a> Populate<'a> {
    fn new(arena: &'a mut Arena) -> Self {
        Self {
            arena,
            roots: Chain::default(),
        }
    }
}

impl Pass for Populate<'_> {
    type Id = NodeId;

    fn node(&mut self, name: Option<&[u8]>) -> Result<NodeId> {
        let name = match name {
            Some(name) => Some(self.arena.intern_measured(name)?),
            None => None,
        };
        self.arena.push_node_measured(Node::named(name))
    }

    fn scalar(&mut self, node: NodeId, text: &[u8]) -> Result<()> {
        let text = self.arena.intern_measured(text)?;
        self.arena.node_mut(node).content = Content::Scalar(text);
        Ok(())
    }

    fn attribute(&mut self, node: NodeId, name: &[u8], value: &[u8]) -> Result<()> {
        let name = self.arena.intern_measured(name)?;
        let value = self.arena.intern_measured(value)?;
        let attr = self.arena.push_attribute_measured(Attribute {
            name,
            value,
            next: None,
        })?;
        self.arena.link_attribute(node, attr);
        Ok(())
    }

    fn open(&mut self, node: NodeId, kind: ListKind) -> Result<()> {
        self.arena.node_mut(node).content = match kind {
            ListKind::Object => Content::Object(Chain::default()),
            ListKind::Array => Content::Array(Chain::default()),
        };
        Ok(())
    }

    fn link(&mut self, parent: Option<NodeId>, child: NodeId) -> Result<()> {
        match parent {
            Some(parent) => self.arena.link_child(parent, child),
            None => {
                self.arena.link_root(&mut self.roots, child);
                Ok(())
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct Parsed {
    pub arena: Arena,
    pub roots: Chain<NodeId>,
}

pub(crate) fn measure<G: Grammar>(input: &[u8], options: &ParseOptions) -> Result<Footprint> {
    let mut measure = Measure::default();
    G::scan(&mut Cursor::new(input), &mut measure, options)?;
    Ok(measure.footprint)
}

pub(crate) fn parse_with<G: Grammar>(input: &[u8], options: &ParseOptions) -> Result<Parsed> {
    let footprint = measure::<G>(input, options)?;

    let mut arena = Arena::with_footprint(footprint, options.growth_region_size);
    let mut populate = Populate::new(&mut arena);
    G::scan(&mut Cursor::new(input), &mut populate, options)?;
    let roots = populate.roots;

    let consumed = arena.consumed();
    if consumed != footprint {
        return Err(Error::capacity(format!(
            "{} populate pass consumed {consumed:?}, measured {footprint:?}",
            G::NAME
        )));
    }
    debug!(
        format = G::NAME,
        input_len = input.len(),
        nodes = footprint.nodes,
        attributes = footprint.attributes,
        bytes = footprint.bytes,
        "parsed document"
    );
    Ok(Parsed { arena, roots })
}

pub(crate) fn check_depth(cursor: &Cursor<'_>, depth: usize, options: &ParseOptions) -> Result<()> {
    if depth > options.max_depth {
        return Err(Error::depth_exceeded(options.max_depth)
            .with_stage(ErrorStage::Parse)
            .with_location(cursor.input(), cursor.pos()));
    }
    Ok(())
}
