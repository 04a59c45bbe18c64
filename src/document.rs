use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use memchr::{memchr, memmem};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::arena::{Arena, ArenaStats, AttrId, NodeId};
use crate::decode::{self, Parsed};
use crate::encode::xml::needs_cdata;
use crate::encode::{self, Tree};
use crate::num::number::{format_integer, format_number};
use crate::tree::{find_in_chain, Attribute, ChildDump, Chain, Children, Content, Node, NodeRef};
use crate::{Error, ErrorStage, ParseOptions, PrintOptions, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Ini,
    Xml,
    Json,
    Yaml,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Ini => "ini",
            Format::Xml => "xml",
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Guesses the format from a file extension, case-insensitively.
    pub fn from_extension(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "ini" | "cfg" | "conf" => Some(Format::Ini),
            "xml" => Some(Format::Xml),
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ini" => Ok(Format::Ini),
            "xml" => Ok(Format::Xml),
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(Error::unsupported_format(format!("unknown format: {other}"))),
        }
    }
}

/// A parsed configuration tree together with the arena that owns it.
///
/// The format tag records what the tree was parsed from (or created as) and
/// selects the printer. A document with no tag has no content and refuses to
/// print.
#[derive(Debug)]
pub struct Document {
    format: Option<Format>,
    arena: Arena,
    roots: Chain<NodeId>,
    options: ParseOptions,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            format: None,
            arena: Arena::new(options.growth_region_size),
            roots: Chain::default(),
            options,
        }
    }

    /// An empty tree tagged with `format`, ready to be built through the
    /// mutation methods.
    pub fn empty(format: Format) -> Self {
        let mut doc = Self::new();
        doc.format = Some(format);
        doc
    }

    /// Replaces the content with the tree parsed from `input`. Input ends at
    /// the first NUL byte. On error the document is left empty.
    pub fn parse(&mut self, input: impl AsRef<[u8]>, format: Format) -> Result<()> {
        self.release();
        let input = input.as_ref();
        let input = match memchr(0, input) {
            Some(nul) => &input[..nul],
            None => input,
        };
        let parsed = match format {
            Format::Ini => decode::parse_with::<decode::ini::Ini>(input, &self.options)?,
            Format::Xml => decode::parse_with::<decode::xml::Xml>(input, &self.options)?,
            Format::Json => decode::parse_with::<decode::json::Json>(input, &self.options)?,
            Format::Yaml => {
                warn!(input_len = input.len(), "yaml parsing is not implemented, tree left empty");
                Parsed {
                    arena: Arena::new(self.options.growth_region_size),
                    roots: Chain::default(),
                }
            }
        };
        self.arena = parsed.arena;
        self.roots = parsed.roots;
        self.format = Some(format);
        Ok(())
    }

    pub fn print(&self) -> Result<Vec<u8>> {
        self.print_with_options(&PrintOptions::default())
    }

    pub fn print_with_options(&self, options: &PrintOptions) -> Result<Vec<u8>> {
        let tree = self.tree();
        match self.printable_format()? {
            Format::Ini => encode::print_with::<encode::ini::Ini>(tree, options),
            Format::Xml => encode::print_with::<encode::xml::Xml>(tree, options),
            Format::Json => encode::print_with::<encode::json::Json>(tree, options),
            Format::Yaml => Ok(Vec::new()),
        }
    }

    /// Exact byte length [`Document::print_with_options`] would produce.
    pub fn measure_print(&self, options: &PrintOptions) -> Result<usize> {
        let tree = self.tree();
        match self.printable_format()? {
            Format::Ini => encode::measure_with::<encode::ini::Ini>(tree, options),
            Format::Xml => encode::measure_with::<encode::xml::Xml>(tree, options),
            Format::Json => encode::measure_with::<encode::json::Json>(tree, options),
            Format::Yaml => Ok(0),
        }
    }

    pub fn print_to<W: Write>(&self, mut writer: W, options: &PrintOptions) -> Result<()> {
        let out = self.print_with_options(options)?;
        writer.write_all(&out).map_err(Error::io)?;
        Ok(())
    }

    /// Drops every node and string, leaving an empty, reusable document.
    pub fn release(&mut self) {
        self.arena.release();
        self.roots = Chain::default();
        self.format = None;
    }

    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub fn roots(&self) -> Children<'_> {
        Children::new(&self.arena, self.roots.first)
    }

    pub fn root_count(&self) -> usize {
        self.roots.len
    }

    pub fn root(&self, index: usize) -> Option<NodeRef<'_>> {
        self.roots().nth(index)
    }

    /// Pre-order search over the roots. `depth` counts levels below the
    /// roots; `0` compares the roots only.
    pub fn find(&self, name: impl AsRef<[u8]>, depth: usize) -> Option<NodeRef<'_>> {
        find_in_chain(&self.arena, self.roots.first, name.as_ref(), depth)
            .map(|id| NodeRef::new(&self.arena, id))
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.arena
            .contains(id)
            .then(|| NodeRef::new(&self.arena, id))
    }

    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    pub fn append_root(&mut self, name: impl AsRef<[u8]>) -> Result<NodeId> {
        self.mutable_format()?;
        let name = self.arena.intern(name.as_ref());
        let id = self.arena.push_node(Node::named(Some(name)));
        self.arena.link_root(&mut self.roots, id);
        Ok(id)
    }

    /// Appends a named member to `parent`, turning an empty parent into an
    /// object. INI sections take no children.
    pub fn append_child(&mut self, parent: NodeId, name: impl AsRef<[u8]>) -> Result<NodeId> {
        if self.mutable_format()? == Format::Ini {
            return Err(Error::invalid_node("INI sections cannot hold child nodes"));
        }
        self.open_list(parent, false)?;
        let name = self.arena.intern(name.as_ref());
        let id = self.arena.push_node(Node::named(Some(name)));
        self.arena.link_child(parent, id)?;
        Ok(id)
    }

    /// Appends an unnamed element to `parent`, turning an empty parent into
    /// an array. Only JSON has unnamed elements.
    pub fn append_element(&mut self, parent: NodeId) -> Result<NodeId> {
        let format = self.mutable_format()?;
        if format != Format::Json {
            return Err(Error::invalid_node(format!(
                "{format} documents cannot hold unnamed elements"
            )));
        }
        self.open_list(parent, true)?;
        let id = self.arena.push_node(Node::default());
        self.arena.link_child(parent, id)?;
        Ok(id)
    }

    pub fn set_scalar(&mut self, id: NodeId, text: impl AsRef<[u8]>) -> Result<()> {
        let format = self.mutable_format()?;
        self.check_node(id)?;
        let text = text.as_ref();
        match format {
            Format::Ini => {
                return Err(Error::invalid_node(
                    "INI sections hold only key/value attributes",
                ))
            }
            Format::Xml if needs_cdata(text) && memmem::find(text, b"]]>").is_some() => {
                return Err(Error::invalid_node(
                    "XML text needing a CDATA section cannot contain ']]>'",
                ))
            }
            _ => {}
        }
        if self.arena.node(id).first_child().is_some() {
            return Err(Error::invalid_node("cannot set a scalar on a node with children"));
        }
        let text = self.arena.intern(text);
        self.arena.node_mut(id).content = Content::Scalar(text);
        Ok(())
    }

    pub fn set_integer(&mut self, id: NodeId, value: i64) -> Result<()> {
        self.set_scalar(id, format_integer(value))
    }

    pub fn set_number(&mut self, id: NodeId, value: f64) -> Result<()> {
        self.set_scalar(id, format_number(value))
    }

    pub fn add_attribute(
        &mut self,
        id: NodeId,
        name: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<AttrId> {
        let format = self.mutable_format()?;
        self.check_node(id)?;
        let value = value.as_ref();
        match format {
            Format::Json => {
                return Err(Error::invalid_node("JSON nodes cannot hold attributes"))
            }
            Format::Xml if memchr(b'"', value).is_some() && memchr(b'\'', value).is_some() => {
                return Err(Error::invalid_node(
                    "XML attribute values cannot contain both quote characters",
                ))
            }
            _ => {}
        }
        let name = self.arena.intern(name.as_ref());
        let value = self.arena.intern(value);
        let attr = self.arena.push_attribute(Attribute {
            name,
            value,
            next: None,
        });
        self.arena.link_attribute(id, attr);
        Ok(attr)
    }

    fn tree(&self) -> Tree<'_> {
        Tree {
            arena: &self.arena,
            roots: self.roots,
        }
    }

    fn printable_format(&self) -> Result<Format> {
        self.format.ok_or_else(|| {
            Error::unsupported_format("document holds no parsed content")
                .with_stage(ErrorStage::Print)
        })
    }

    /// Format of a document that accepts mutation.
    fn mutable_format(&self) -> Result<Format> {
        match self.format {
            None => Err(Error::invalid_node(
                "document has no format; parse or create it with Document::empty first",
            )),
            Some(Format::Yaml) => {
                Err(Error::not_implemented("yaml document mutation").with_stage(ErrorStage::Tree))
            }
            Some(format) => Ok(format),
        }
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        if !self.arena.contains(id) {
            return Err(Error::invalid_node(format!("unknown node id {}", id.0)));
        }
        Ok(())
    }

    fn open_list(&mut self, parent: NodeId, array: bool) -> Result<()> {
        self.check_node(parent)?;
        let content = &mut self.arena.node_mut(parent).content;
        match (*content, array) {
            (Content::Empty, false) => *content = Content::Object(Chain::default()),
            (Content::Empty, true) => *content = Content::Array(Chain::default()),
            (Content::Object(_), false) | (Content::Array(_), true) => {}
            (Content::Scalar(_), _) => {
                return Err(Error::invalid_node("cannot append to a scalar node"))
            }
            (Content::Object(_), true) => {
                return Err(Error::invalid_node("cannot append an unnamed element to an object"))
            }
            (Content::Array(_), false) => {
                return Err(Error::invalid_node("cannot append a named member to an array"))
            }
        }
        Ok(())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("format", &self.format)?;
        map.serialize_entry("roots", &ChildDump(self.roots()))?;
        map.end()
    }
}
