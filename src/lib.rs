//! Arena-backed parser and printer for INI, XML and JSON configuration
//! documents.
//!
//! Every format parses in two passes over the same scanner: a measure pass
//! sizes the arena exactly, a populate pass fills it. Printing works the same
//! way against a counting sink and then a buffer of the measured length.
//!
//! ```
//! use cfgparse::{Document, Format};
//!
//! let mut doc = Document::new();
//! doc.parse("[server]\nport=8080\n", Format::Ini)?;
//! let server = doc.find("server", 0).unwrap();
//! assert_eq!(server.attribute("port").unwrap().as_integer(), 8080);
//! assert_eq!(doc.print()?, b"[server]\nport=8080\n\n");
//! # Ok::<(), cfgparse::Error>(())
//! ```

pub mod arena;
pub mod constants;
mod decode;
pub mod document;
mod encode;
pub mod error;
pub mod num;
pub mod options;
pub mod parallel;
pub mod tree;

pub use crate::arena::{ArenaStats, AttrId, Footprint, NodeId, StrRef};
pub use crate::constants::SEARCH_DEPTH_UNBOUNDED;
pub use crate::document::{Document, Format};
pub use crate::error::{Error, ErrorKind, ErrorStage, Location};
pub use crate::options::{Indent, ParseOptions, PrintOptions};
pub use crate::tree::{AttributeRef, Content, NodeKind, NodeRef};

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: impl AsRef<[u8]>, format: Format) -> Result<Document> {
    parse_with_options(input, format, &ParseOptions::default())
}

pub fn parse_with_options(
    input: impl AsRef<[u8]>,
    format: Format,
    options: &ParseOptions,
) -> Result<Document> {
    let mut doc = Document::with_options(options.clone());
    doc.parse(input, format)?;
    Ok(doc)
}

pub fn print(doc: &Document) -> Result<Vec<u8>> {
    doc.print()
}

pub fn print_with_options(doc: &Document, options: &PrintOptions) -> Result<Vec<u8>> {
    doc.print_with_options(options)
}
