//! Two-pass printing: each layout is one generic emitter run first against
//! a [`Tally`] to measure the output and then against a `Vec<u8>` allocated
//! at exactly that size.

pub(crate) mod ini;
pub(crate) mod json;
pub(crate) mod xml;
mod writer;

use tracing::debug;

use crate::arena::{Arena, NodeId};
use crate::tree::{Chain, Children};
use crate::{Error, ErrorStage, PrintOptions, Result};

pub(crate) use writer::{Output, Tally, Writer};

/// Borrowed view of a printable tree: the arena plus its root chain.
#[derive(Clone, Copy)]
pub(crate) struct Tree<'a> {
    pub arena: &'a Arena,
    pub roots: Chain<NodeId>,
}

impl<'a> Tree<'a> {
    pub fn roots(&self) -> Children<'a> {
        Children::new(self.arena, self.roots.first)
    }
}

pub(crate) trait Layout {
    const NAME: &'static str;

    fn emit<O: Output>(tree: Tree<'_>, writer: &mut Writer<O>) -> Result<()>;
}

pub(crate) fn measure_with<L: Layout>(tree: Tree<'_>, options: &PrintOptions) -> Result<usize> {
    let mut writer = Writer::new(Tally::default(), options);
    L::emit(tree, &mut writer)?;
    Ok(writer.finish().len)
}

pub(crate) fn print_with<L: Layout>(tree: Tree<'_>, options: &PrintOptions) -> Result<Vec<u8>> {
    let total = measure_with::<L>(tree, options)?;
    let mut writer = Writer::new(Vec::with_capacity(total), options);
    L::emit(tree, &mut writer)?;
    let out = writer.finish();
    if out.len() != total {
        return Err(Error::capacity(format!(
            "{} printer wrote {} bytes, measured {total}",
            L::NAME,
            out.len()
        ))
        .with_stage(ErrorStage::Print));
    }
    debug!(format = L::NAME, bytes = total, "printed document");
    Ok(out)
}
