use crate::constants::{is_tag_name_end, is_whitespace};
use crate::{ParseOptions, Result};

use super::{check_depth, Cursor, Grammar, ListKind, Pass};

/// Elements become nodes, `name="value"` pairs their attributes and bare
/// text their scalar. Declarations, processing instructions and comments
/// are skipped.
pub(crate) struct Xml;

impl Grammar for Xml {
    const NAME: &'static str = "xml";

    fn scan<P: Pass>(cursor: &mut Cursor<'_>, pass: &mut P, options: &ParseOptions) -> Result<()> {
        while let Some(open) = cursor.find(b'<') {
            cursor.set_pos(open);
            if cursor.starts_with(CDATA_OPEN) {
                return Err(cursor.error("character data outside of an element"));
            }
            if skip_markup(cursor)? {
                continue;
            }
            if cursor.peek_at(1) == Some(b'/') {
                return Err(cursor.error("closing tag without a matching open tag"));
            }
            let id = element(cursor, pass, options, 1)?;
            pass.link(None, id)?;
        }
        Ok(())
    }
}

const CDATA_OPEN: &[u8] = b"<![CDATA[";
const CDATA_CLOSE: &[u8] = b"]]>";

/// Skips `<!-- -->`, `<? ?>` and `<! >` at the cursor. Returns whether
/// anything was skipped. A CDATA section is never skipped.
fn skip_markup(cursor: &mut Cursor<'_>) -> Result<bool> {
    let open = cursor.pos();
    if cursor.starts_with(CDATA_OPEN) {
        return Ok(false);
    }
    let (body, terminator, what): (usize, &[u8], &str) = if cursor.starts_with(b"<!--") {
        (4, b"-->", "comment")
    } else if cursor.starts_with(b"<?") {
        (2, b"?>", "processing instruction")
    } else if cursor.starts_with(b"<!") {
        (2, b">", "declaration")
    } else {
        return Ok(false);
    };
    let end = cursor
        .find_from(open + body, terminator)
        .ok_or_else(|| cursor.error_at(format!("unterminated {what}"), open))?;
    cursor.set_pos(end + terminator.len());
    Ok(true)
}

fn element<P: Pass>(
    cursor: &mut Cursor<'_>,
    pass: &mut P,
    options: &ParseOptions,
    depth: usize,
) -> Result<P::Id> {
    check_depth(cursor, depth, options)?;
    let open = cursor.pos();
    cursor.bump();
    let name = cursor.take_while(|byte| !is_tag_name_end(byte));
    if name.is_empty() {
        return Err(cursor.error_at("missing tag name", open));
    }
    let id = pass.node(Some(name))?;

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => return Err(cursor.error_at("unterminated tag", open)),
            Some(b'/') => {
                cursor.bump();
                cursor.expect(b'>', "expected '>' after '/'")?;
                return Ok(id);
            }
            Some(b'>') => {
                cursor.bump();
                break;
            }
            Some(_) => attribute(cursor, pass, id)?,
        }
    }

    content(cursor, pass, options, id, name, depth)?;
    Ok(id)
}

fn attribute<P: Pass>(cursor: &mut Cursor<'_>, pass: &mut P, id: P::Id) -> Result<()> {
    let name = cursor.take_while(|byte| byte != b'=' && !is_tag_name_end(byte));
    if name.is_empty() {
        return Err(cursor.error("expected attribute name"));
    }
    cursor.skip_whitespace();
    cursor.expect(b'=', "expected '=' after attribute name")?;
    cursor.skip_whitespace();
    let quote = match cursor.peek() {
        Some(quote @ (b'"' | b'\'')) => quote,
        _ => return Err(cursor.error("expected quoted attribute value")),
    };
    let open = cursor.pos();
    cursor.bump();
    let close = cursor
        .find(quote)
        .ok_or_else(|| cursor.error_at("unterminated attribute value", open))?;
    let value = cursor.slice(open + 1, close);
    cursor.set_pos(close + 1);
    pass.attribute(id, name, value)
}

/// Element body after the open tag: either text or child elements, never
/// both, followed by the matching close tag.
fn content<P: Pass>(
    cursor: &mut Cursor<'_>,
    pass: &mut P,
    options: &ParseOptions,
    id: P::Id,
    name: &[u8],
    depth: usize,
) -> Result<()> {
    let mut has_children = false;
    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => {
                return Err(cursor.error(format!(
                    "unterminated element <{}>",
                    String::from_utf8_lossy(name)
                )))
            }
            Some(b'<') => {
                if cursor.starts_with(CDATA_OPEN) {
                    if has_children {
                        return Err(cursor.error("mixed text and element content is not supported"));
                    }
                    let text = cdata(cursor)?;
                    pass.scalar(id, text)?;
                    return close_after_text(cursor, name);
                }
                if skip_markup(cursor)? {
                    continue;
                }
                if cursor.peek_at(1) == Some(b'/') {
                    return close_tag(cursor, name);
                }
                if !has_children {
                    pass.open(id, ListKind::Object)?;
                    has_children = true;
                }
                let child = element(cursor, pass, options, depth + 1)?;
                pass.link(Some(id), child)?;
            }
            Some(_) => {
                if has_children {
                    return Err(cursor.error("mixed text and element content is not supported"));
                }
                let start = cursor.pos();
                let lt = cursor.find(b'<').ok_or_else(|| {
                    cursor.error(format!(
                        "unterminated element <{}>",
                        String::from_utf8_lossy(name)
                    ))
                })?;
                let mut end = lt;
                while end > start && is_whitespace(cursor.byte_at(end - 1)) {
                    end -= 1;
                }
                pass.scalar(id, cursor.slice(start, end))?;
                cursor.set_pos(lt);
                return close_after_text(cursor, name);
            }
        }
    }
}

/// Body of the CDATA section at the cursor, taken verbatim.
fn cdata<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8]> {
    let open = cursor.pos();
    let start = open + CDATA_OPEN.len();
    let end = cursor
        .find_from(start, CDATA_CLOSE)
        .ok_or_else(|| cursor.error_at("unterminated CDATA section", open))?;
    cursor.set_pos(end + CDATA_CLOSE.len());
    Ok(cursor.slice(start, end))
}

/// After an element's text only comments, whitespace and the close tag may
/// follow.
fn close_after_text(cursor: &mut Cursor<'_>, name: &[u8]) -> Result<()> {
    cursor.skip_whitespace();
    while skip_markup(cursor)? {
        cursor.skip_whitespace();
    }
    if cursor.peek().is_none() {
        return Err(cursor.error(format!(
            "unterminated element <{}>",
            String::from_utf8_lossy(name)
        )));
    }
    if !cursor.starts_with(b"</") {
        return Err(cursor.error("mixed text and element content is not supported"));
    }
    close_tag(cursor, name)
}

fn close_tag(cursor: &mut Cursor<'_>, name: &[u8]) -> Result<()> {
    let open = cursor.pos();
    cursor.bump();
    cursor.bump();
    let closing = cursor.take_while(|byte| !is_tag_name_end(byte));
    cursor.skip_whitespace();
    cursor.expect(b'>', "expected '>' to end closing tag")?;
    if closing != name {
        return Err(cursor.error_at(
            format!(
                "mismatched closing tag: expected </{}>, found </{}>",
                String::from_utf8_lossy(name),
                String::from_utf8_lossy(closing)
            ),
            open,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{measure, parse_with};
    use crate::ErrorKind;

    #[rstest::rstest]
    fn test_measure_counts_elements_attributes_and_text() {
        let footprint =
            measure::<Xml>(br#"<a><b x="1">hi</b></a>"#, &ParseOptions::default()).unwrap();
        assert_eq!(footprint.nodes, 2);
        assert_eq!(footprint.attributes, 1);
        assert_eq!(footprint.bytes, 2 + 2 + 2 + 2 + 3);
    }

    #[rstest::rstest]
    fn test_skips_declarations_and_comments() {
        let input = b"<?xml version=\"1.0\"?>\n<!DOCTYPE cfg>\n<!-- top -->\n<cfg>\n  <!-- inner -->\n  <item/>\n</cfg>\n";
        let parsed = parse_with::<Xml>(input, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.roots.len, 1);
        assert_eq!(parsed.arena.stats().nodes, 2);
    }

    #[rstest::rstest]
    #[case(b"<a><![CDATA[x > y]]></a>".as_slice(), b"x > y".as_slice())]
    #[case(b"<a>\n  <![CDATA[ <b>&amp; ]]>\n  <!-- c -->\n</a>".as_slice(), b" <b>&amp; ".as_slice())]
    #[case(b"<a><![CDATA[]]></a>".as_slice(), b"".as_slice())]
    fn test_cdata_is_verbatim_scalar(#[case] input: &[u8], #[case] text: &[u8]) {
        let footprint = measure::<Xml>(input, &ParseOptions::default()).unwrap();
        assert_eq!(footprint.bytes, 2 + text.len() + 1);

        let parsed = parse_with::<Xml>(input, &ParseOptions::default()).unwrap();
        let root = parsed.roots.first.unwrap();
        match parsed.arena.node(root).content {
            crate::tree::Content::Scalar(value) => assert_eq!(parsed.arena.get(value), text),
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[rstest::rstest]
    fn test_depth_guard() {
        let options = ParseOptions::default().with_max_depth(2);
        assert!(measure::<Xml>(b"<a><b/></a>", &options).is_ok());
        let err = measure::<Xml>(b"<a><b><c/></b></a>", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthExceeded);
    }

    #[rstest::rstest]
    #[case(b"<a><b></a>".as_slice())]
    #[case(b"<a>text".as_slice())]
    #[case(b"<a x=1/>".as_slice())]
    #[case(b"<a x=\"1/>".as_slice())]
    #[case(b"<a>hi<b/></a>".as_slice())]
    #[case(b"<a><b/>hi</a>".as_slice())]
    #[case(b"</a>".as_slice())]
    #[case(b"<a><!-- open".as_slice())]
    #[case(b"<a><![CDATA[x > y</a>".as_slice())]
    #[case(b"<a>t<![CDATA[x]]></a>".as_slice())]
    #[case(b"<a><![CDATA[x]]>t</a>".as_slice())]
    #[case(b"<a><b/><![CDATA[x]]></a>".as_slice())]
    #[case(b"<![CDATA[x]]><a/>".as_slice())]
    fn test_rejects_malformed(#[case] input: &[u8]) {
        let err = measure::<Xml>(input, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.location.is_some());
    }
}
