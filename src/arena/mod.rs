//! Region-chained byte arena plus index-addressed node and attribute pools.
//!
//! Region 0 is the base region. Its size comes from the measure pass and it
//! is filled exactly once by the populate pass. Every later string goes to a
//! growth region; a request that does not fit the last growth region starts a
//! new one, so earlier references never move.

use tracing::trace;

use crate::tree::{Attribute, Chain, Content, Node};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrId(pub(crate) usize);

/// Location of an interned, NUL-terminated string inside the region chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrRef {
    pub region: usize,
    pub offset: usize,
    pub len: usize,
}

/// Exact storage needed by one parse: the measure pass computes it and the
/// populate pass must consume all of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Footprint {
    pub nodes: usize,
    pub attributes: usize,
    pub bytes: usize,
}

impl Footprint {
    pub(crate) fn add_string(&mut self, text: &[u8]) {
        self.bytes += text.len() + 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    pub regions: usize,
    pub base_capacity: usize,
    pub base_used: usize,
    pub bytes_capacity: usize,
    pub bytes_used: usize,
    pub nodes: usize,
    pub attributes: usize,
}

#[derive(Debug)]
struct Region {
    bytes: Box<[u8]>,
    free: usize,
}

impl Region {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            free: 0,
        }
    }

    /// Growth region of at least `capacity` bytes holding `text` at offset 0.
    fn with_text(capacity: usize, text: &[u8]) -> Self {
        let mut bytes = vec![0u8; capacity.max(text.len() + 1)].into_boxed_slice();
        bytes[..text.len()].copy_from_slice(text);
        Self {
            bytes,
            free: text.len() + 1,
        }
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn push(&mut self, text: &[u8]) -> Option<usize> {
        let needed = text.len() + 1;
        if self.capacity() - self.free < needed {
            return None;
        }
        let offset = self.free;
        self.bytes[offset..offset + text.len()].copy_from_slice(text);
        self.bytes[offset + text.len()] = 0;
        self.free += needed;
        Some(offset)
    }
}

#[derive(Debug)]
pub struct Arena {
    regions: Vec<Region>,
    nodes: Vec<Node>,
    attributes: Vec<Attribute>,
    measured: Footprint,
    growth_region_size: usize,
}

impl Arena {
    pub fn new(growth_region_size: usize) -> Self {
        Self {
            regions: Vec::new(),
            nodes: Vec::new(),
            attributes: Vec::new(),
            measured: Footprint::default(),
            growth_region_size: growth_region_size.max(1),
        }
    }

    /// Allocates the base region and pools at exactly the measured size.
    pub fn with_footprint(footprint: Footprint, growth_region_size: usize) -> Self {
        Self {
            regions: vec![Region::with_capacity(footprint.bytes)],
            nodes: Vec::with_capacity(footprint.nodes),
            attributes: Vec::with_capacity(footprint.attributes),
            measured: footprint,
            growth_region_size: growth_region_size.max(1),
        }
    }

    pub(crate) fn intern_measured(&mut self, text: &[u8]) -> Result<StrRef> {
        let base = self
            .regions
            .first_mut()
            .ok_or_else(|| Error::capacity("arena has no base region"))?;
        let offset = base.push(text).ok_or_else(|| {
            Error::capacity(format!(
                "base region exhausted: {} of {} bytes used, {} more requested",
                base.free,
                base.capacity(),
                text.len() + 1
            ))
        })?;
        Ok(StrRef {
            region: 0,
            offset,
            len: text.len(),
        })
    }

    pub(crate) fn push_node_measured(&mut self, node: Node) -> Result<NodeId> {
        if self.nodes.len() >= self.measured.nodes {
            return Err(Error::capacity(format!(
                "node pool exhausted: {} nodes measured",
                self.measured.nodes
            )));
        }
        Ok(self.push_node(node))
    }

    pub(crate) fn push_attribute_measured(&mut self, attribute: Attribute) -> Result<AttrId> {
        if self.attributes.len() >= self.measured.attributes {
            return Err(Error::capacity(format!(
                "attribute pool exhausted: {} attributes measured",
                self.measured.attributes
            )));
        }
        Ok(self.push_attribute(attribute))
    }

    /// Interns into the growth chain, opening a new region when the last one
    /// cannot hold the request.
    pub(crate) fn intern(&mut self, text: &[u8]) -> StrRef {
        if self.regions.len() > 1 {
            let region = self.regions.len() - 1;
            if let Some(offset) = self.regions[region].push(text) {
                return StrRef {
                    region,
                    offset,
                    len: text.len(),
                };
            }
        }
        if self.regions.is_empty() {
            self.regions.push(Region::with_capacity(0));
        }
        let fresh = Region::with_text(self.growth_region_size, text);
        trace!(
            capacity = fresh.capacity(),
            regions = self.regions.len() + 1,
            "opening growth region"
        );
        self.regions.push(fresh);
        StrRef {
            region: self.regions.len() - 1,
            offset: 0,
            len: text.len(),
        }
    }

    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn push_attribute(&mut self, attribute: Attribute) -> AttrId {
        self.attributes.push(attribute);
        AttrId(self.attributes.len() - 1)
    }

    pub fn get(&self, text: StrRef) -> &[u8] {
        self.regions
            .get(text.region)
            .and_then(|region| region.bytes.get(text.offset..text.offset + text.len))
            .unwrap_or(&[])
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn attribute(&self, id: AttrId) -> &Attribute {
        &self.attributes[id.0]
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Appends `child` to the open child list of `parent`.
    pub(crate) fn link_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let prev = match &mut self.nodes[parent.0].content {
            Content::Object(chain) | Content::Array(chain) => chain.append(child),
            _ => {
                return Err(Error::invalid_node(
                    "cannot append a child to a node without a child list",
                ))
            }
        };
        if let Some(prev) = prev {
            self.nodes[prev.0].next = Some(child);
        }
        Ok(())
    }

    pub(crate) fn link_root(&mut self, roots: &mut Chain<NodeId>, child: NodeId) {
        if let Some(prev) = roots.append(child) {
            self.nodes[prev.0].next = Some(child);
        }
    }

    pub(crate) fn link_attribute(&mut self, node: NodeId, attribute: AttrId) {
        if let Some(prev) = self.nodes[node.0].attributes.append(attribute) {
            self.attributes[prev.0].next = Some(attribute);
        }
    }

    /// Storage actually consumed from the measured pools and base region.
    pub fn consumed(&self) -> Footprint {
        Footprint {
            nodes: self.nodes.len(),
            attributes: self.attributes.len(),
            bytes: self.regions.first().map_or(0, |base| base.free),
        }
    }

    pub fn measured(&self) -> Footprint {
        self.measured
    }

    pub fn stats(&self) -> ArenaStats {
        let base = self.regions.first();
        ArenaStats {
            regions: self.regions.len(),
            base_capacity: base.map_or(0, Region::capacity),
            base_used: base.map_or(0, |region| region.free),
            bytes_capacity: self.regions.iter().map(Region::capacity).sum(),
            bytes_used: self.regions.iter().map(|region| region.free).sum(),
            nodes: self.nodes.len(),
            attributes: self.attributes.len(),
        }
    }

    pub fn release(&mut self) {
        self.regions.clear();
        self.nodes.clear();
        self.attributes.clear();
        self.measured = Footprint::default();
    }
}
