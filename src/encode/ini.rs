use crate::Result;

use super::{Layout, Output, Tree, Writer};

pub(crate) struct Ini;

impl Layout for Ini {
    const NAME: &'static str = "ini";

    fn emit<O: Output>(tree: Tree<'_>, writer: &mut Writer<O>) -> Result<()> {
        for section in tree.roots() {
            writer.write_byte(b'[');
            writer.write_bytes(section.name().unwrap_or_default());
            writer.write_byte(b']');
            writer.write_newline();
            for attr in section.attributes() {
                writer.write_bytes(attr.name());
                writer.write_byte(b'=');
                writer.write_bytes(attr.value());
                writer.write_newline();
            }
            writer.write_newline();
        }
        Ok(())
    }
}
