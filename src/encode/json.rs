use crate::tree::{Children, Content, NodeKind, NodeRef};
use crate::Result;

use super::{Layout, Output, Tree, Writer};

/// Roots print as the members of one outer object. Objects and arrays keep
/// their own kind tag; arrays holding only scalars stay on one line.
pub(crate) struct Json;

impl Layout for Json {
    const NAME: &'static str = "json";

    fn emit<O: Output>(tree: Tree<'_>, writer: &mut Writer<O>) -> Result<()> {
        if tree.roots.is_empty() {
            writer.write_bytes(b"{}");
            return Ok(());
        }
        writer.write_byte(b'{');
        writer.write_newline();
        members(tree.roots(), writer, 1)?;
        writer.write_byte(b'}');
        Ok(())
    }
}

fn members<O: Output>(children: Children<'_>, writer: &mut Writer<O>, depth: usize) -> Result<()> {
    let mut children = children.peekable();
    while let Some(child) = children.next() {
        writer.write_indent(depth);
        writer.write_quoted(child.name().unwrap_or_default());
        writer.write_bytes(b" : ");
        value(child, writer, depth)?;
        if children.peek().is_some() {
            writer.write_byte(b',');
        }
        writer.write_newline();
    }
    Ok(())
}

/// Writes the value of `node`, whose member line sits at `depth`.
fn value<O: Output>(node: NodeRef<'_>, writer: &mut Writer<O>, depth: usize) -> Result<()> {
    writer.enter(depth)?;
    match node.content() {
        Content::Scalar(_) => writer.write_quoted(node.value().unwrap_or_default()),
        Content::Empty => writer.write_bytes(b"{}"),
        Content::Object(chain) if chain.is_empty() => writer.write_bytes(b"{}"),
        Content::Array(chain) if chain.is_empty() => writer.write_bytes(b"[]"),
        Content::Object(_) => {
            writer.write_byte(b'{');
            writer.write_newline();
            members(node.children(), writer, depth + 1)?;
            writer.write_indent(depth);
            writer.write_byte(b'}');
        }
        Content::Array(_) => {
            if node
                .children()
                .all(|child| child.kind() == NodeKind::Scalar)
            {
                inline_array(node, writer, depth + 1)?;
            } else {
                writer.write_byte(b'[');
                writer.write_newline();
                let mut elements = node.children().peekable();
                while let Some(element) = elements.next() {
                    writer.write_indent(depth + 1);
                    value(element, writer, depth + 1)?;
                    if elements.peek().is_some() {
                        writer.write_byte(b',');
                    }
                    writer.write_newline();
                }
                writer.write_indent(depth);
                writer.write_byte(b']');
            }
        }
    }
    Ok(())
}

/// Scalar elements sit at `depth`.
fn inline_array<O: Output>(node: NodeRef<'_>, writer: &mut Writer<O>, depth: usize) -> Result<()> {
    writer.enter(depth)?;
    writer.write_bytes(b"[ ");
    for (idx, element) in node.children().enumerate() {
        if idx > 0 {
            writer.write_bytes(b", ");
        }
        writer.write_quoted(element.value().unwrap_or_default());
    }
    writer.write_bytes(b" ]");
    Ok(())
}
