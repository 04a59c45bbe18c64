use memchr::memchr;

use crate::constants::is_whitespace;
use crate::tree::{Content, NodeRef};
use crate::Result;

use super::{Layout, Output, Tree, Writer};

pub(crate) struct Xml;

impl Layout for Xml {
    const NAME: &'static str = "xml";

    fn emit<O: Output>(tree: Tree<'_>, writer: &mut Writer<O>) -> Result<()> {
        for root in tree.roots() {
            element(root, writer, 1)?;
        }
        Ok(())
    }
}

/// Roots sit at depth 1 and are not indented.
fn element<O: Output>(node: NodeRef<'_>, writer: &mut Writer<O>, depth: usize) -> Result<()> {
    writer.enter(depth)?;
    let name = node.name().unwrap_or_default();
    writer.write_indent(depth - 1);
    writer.write_byte(b'<');
    writer.write_bytes(name);
    for attr in node.attributes() {
        writer.write_byte(b' ');
        writer.write_bytes(attr.name());
        writer.write_byte(b'=');
        attribute_value(writer, attr.value());
    }

    match node.content() {
        Content::Scalar(_) => {
            writer.write_byte(b'>');
            text(writer, node.value().unwrap_or_default());
            close(writer, name);
        }
        Content::Object(chain) | Content::Array(chain) if !chain.is_empty() => {
            writer.write_byte(b'>');
            writer.write_newline();
            for child in node.children() {
                element(child, writer, depth + 1)?;
            }
            writer.write_indent(depth - 1);
            close(writer, name);
        }
        _ => {
            writer.write_bytes(b"/>");
            writer.write_newline();
        }
    }
    Ok(())
}

/// Double quotes unless the value holds one.
fn attribute_value<O: Output>(writer: &mut Writer<O>, value: &[u8]) {
    let quote = if memchr(b'"', value).is_some() { b'\'' } else { b'"' };
    writer.write_byte(quote);
    writer.write_bytes(value);
    writer.write_byte(quote);
}

/// Whether `value` must go into a CDATA section to parse back unchanged:
/// empty text, markup bytes or surrounding whitespace.
pub(crate) fn needs_cdata(value: &[u8]) -> bool {
    match (value.first(), value.last()) {
        (Some(&first), Some(&last)) => {
            is_whitespace(first) || is_whitespace(last) || memchr(b'<', value).is_some()
        }
        _ => true,
    }
}

fn text<O: Output>(writer: &mut Writer<O>, value: &[u8]) {
    if needs_cdata(value) {
        writer.write_bytes(b"<![CDATA[");
        writer.write_bytes(value);
        writer.write_bytes(b"]]>");
    } else {
        writer.write_bytes(value);
    }
}

fn close<O: Output>(writer: &mut Writer<O>, name: &[u8]) {
    writer.write_bytes(b"</");
    writer.write_bytes(name);
    writer.write_byte(b'>');
    writer.write_newline();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{self, parse_with};
    use crate::encode::print_with;
    use crate::{ErrorKind, ParseOptions, PrintOptions};

    fn print(input: &[u8], options: &PrintOptions) -> Result<Vec<u8>> {
        let parsed = parse_with::<decode::xml::Xml>(input, &ParseOptions::default())?;
        let tree = Tree {
            arena: &parsed.arena,
            roots: parsed.roots,
        };
        print_with::<Xml>(tree, options)
    }

    #[rstest::rstest]
    #[case(br#"<a><b x="1">hi</b></a>"#.as_slice(), "<a>\n\t<b x=\"1\">hi</b>\n</a>\n")]
    #[case(b"<a/>".as_slice(), "<a/>\n")]
    #[case(b"<a k='v'></a>".as_slice(), "<a k=\"v\"/>\n")]
    #[case(b"<a>\n  <b/>\n  <c>t </c>\n</a>".as_slice(), "<a>\n\t<b/>\n\t<c>t</c>\n</a>\n")]
    #[case(br#"<a k='say "hi"' j="it's"/>"#.as_slice(), "<a k='say \"hi\"' j=\"it's\"/>\n")]
    #[case(b"<a><![CDATA[x > y]]></a>".as_slice(), "<a>x > y</a>\n")]
    #[case(b"<a><![CDATA[ 1 < 2 ]]></a>".as_slice(), "<a><![CDATA[ 1 < 2 ]]></a>\n")]
    #[case(b"<a><![CDATA[]]></a>".as_slice(), "<a><![CDATA[]]></a>\n")]
    fn test_canonical_output(#[case] input: &[u8], #[case] expected: &str) {
        let out = print(input, &PrintOptions::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[rstest::rstest]
    #[case(br#"<a k='say "hi"'/>"#.as_slice())]
    #[case(b"<a><![CDATA[ <b>&amp; ]]></a>".as_slice())]
    #[case(b"<a><![CDATA[]]><!-- c --></a>".as_slice())]
    fn test_output_parses_back_to_same_text(#[case] input: &[u8]) {
        let first = parse_with::<decode::xml::Xml>(input, &ParseOptions::default()).unwrap();
        let tree = Tree {
            arena: &first.arena,
            roots: first.roots,
        };
        let printed = print_with::<Xml>(tree, &PrintOptions::default()).unwrap();
        let second = parse_with::<decode::xml::Xml>(&printed, &ParseOptions::default()).unwrap();

        let (a, b) = (
            NodeRef::new(&first.arena, first.roots.first.unwrap()),
            NodeRef::new(&second.arena, second.roots.first.unwrap()),
        );
        assert_eq!(a.value(), b.value());
        assert_eq!(
            a.attributes().map(|attr| attr.value()).collect::<Vec<_>>(),
            b.attributes().map(|attr| attr.value()).collect::<Vec<_>>()
        );
    }

    #[rstest::rstest]
    fn test_print_depth_guard() {
        let options = PrintOptions::default().with_max_depth(2);
        assert!(print(b"<a><b/></a>", &options).is_ok());
        let err = print(b"<a><b><c/></b></a>", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthExceeded);
    }
}
