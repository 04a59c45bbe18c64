use memchr::memchr2;

use crate::{ParseOptions, Result};

use super::{check_depth, Cursor, Grammar, ListKind, Pass};

/// Members of the outer object become the root nodes. Values are quoted
/// strings, objects or arrays; strings are kept verbatim, escapes included.
pub(crate) struct Json;

impl Grammar for Json {
    const NAME: &'static str = "json";

    fn scan<P: Pass>(cursor: &mut Cursor<'_>, pass: &mut P, options: &ParseOptions) -> Result<()> {
        cursor.skip_whitespace();
        if cursor.peek() != Some(b'{') {
            return Err(cursor.error("JSON document must start with '{'"));
        }
        cursor.bump();
        members(cursor, pass, options, None, 1)?;
        cursor.skip_whitespace();
        if !cursor.is_eof() {
            return Err(cursor.error("unexpected content after the document"));
        }
        Ok(())
    }
}

/// Object members, with the cursor just past the opening `{`. `depth` is the
/// tree level of the members; the outer object's members are roots at 1.
fn members<P: Pass>(
    cursor: &mut Cursor<'_>,
    pass: &mut P,
    options: &ParseOptions,
    parent: Option<P::Id>,
    depth: usize,
) -> Result<()> {
    cursor.skip_whitespace();
    if cursor.peek() == Some(b'}') {
        cursor.bump();
        return Ok(());
    }
    loop {
        cursor.skip_whitespace();
        let key = string(cursor)?;
        cursor.skip_whitespace();
        cursor.expect(b':', "expected ':' after object key")?;
        let child = value(cursor, pass, options, Some(key), depth)?;
        pass.link(parent, child)?;
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(b',') => cursor.bump(),
            Some(b'}') => {
                cursor.bump();
                return Ok(());
            }
            _ => return Err(cursor.error("expected ',' or '}' after object member")),
        }
    }
}

/// Array elements, with the cursor just past the opening `[`.
fn elements<P: Pass>(
    cursor: &mut Cursor<'_>,
    pass: &mut P,
    options: &ParseOptions,
    parent: P::Id,
    depth: usize,
) -> Result<()> {
    cursor.skip_whitespace();
    if cursor.peek() == Some(b']') {
        cursor.bump();
        return Ok(());
    }
    loop {
        let child = value(cursor, pass, options, None, depth)?;
        pass.link(Some(parent), child)?;
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(b',') => cursor.bump(),
            Some(b']') => {
                cursor.bump();
                return Ok(());
            }
            _ => return Err(cursor.error("expected ',' or ']' after array element")),
        }
    }
}

fn value<P: Pass>(
    cursor: &mut Cursor<'_>,
    pass: &mut P,
    options: &ParseOptions,
    name: Option<&[u8]>,
    depth: usize,
) -> Result<P::Id> {
    check_depth(cursor, depth, options)?;
    cursor.skip_whitespace();
    match cursor.peek() {
        Some(b'"') => {
            let text = string(cursor)?;
            let id = pass.node(name)?;
            pass.scalar(id, text)?;
            Ok(id)
        }
        Some(b'{') => {
            cursor.bump();
            let id = pass.node(name)?;
            pass.open(id, ListKind::Object)?;
            members(cursor, pass, options, Some(id), depth + 1)?;
            Ok(id)
        }
        Some(b'[') => {
            cursor.bump();
            let id = pass.node(name)?;
            pass.open(id, ListKind::Array)?;
            elements(cursor, pass, options, id, depth + 1)?;
            Ok(id)
        }
        Some(_) => Err(cursor.error(
            "unsupported JSON value: only strings, objects and arrays are modeled",
        )),
        None => Err(cursor.error("unexpected end of input")),
    }
}

/// Quoted string body. A backslash escapes the byte after it.
fn string<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8]> {
    let open = cursor.pos();
    cursor.expect(b'"', "expected '\"'")?;
    let input = cursor.input();
    let start = cursor.pos();
    let mut idx = start;
    while let Some(offset) = memchr2(b'"', b'\\', &input[idx..]) {
        let at = idx + offset;
        if input[at] == b'"' {
            cursor.set_pos(at + 1);
            return Ok(&input[start..at]);
        }
        idx = (at + 2).min(input.len());
    }
    Err(cursor.error_at("unterminated string", open))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{measure, parse_with};
    use crate::ErrorKind;

    #[rstest::rstest]
    fn test_measure_is_exact_without_margin() {
        let footprint =
            measure::<Json>(br#"{"k":"v","arr":["a",{"x":"y"}]}"#, &ParseOptions::default())
                .unwrap();
        assert_eq!(footprint.nodes, 5);
        assert_eq!(footprint.attributes, 0);
        assert_eq!(footprint.bytes, 2 + 2 + 4 + 2 + 2 + 2);
    }

    #[rstest::rstest]
    fn test_populate_consumes_measured_footprint() {
        let input = br#"{ "a" : { "b" : [ "1", [ "2" ], {} ] }, "c" : "\"q\"" }"#;
        let parsed = parse_with::<Json>(input, &ParseOptions::default()).unwrap();
        let stats = parsed.arena.stats();
        assert_eq!(stats.base_used, stats.base_capacity);
        assert_eq!(parsed.roots.len, 2);
    }

    #[rstest::rstest]
    #[case(b"".as_slice())]
    #[case(b"[\"a\"]".as_slice())]
    #[case(b"{\"n\": 1}".as_slice())]
    #[case(b"{\"b\": true}".as_slice())]
    #[case(b"{\"a\": \"x}".as_slice())]
    #[case(b"{\"a\" \"x\"}".as_slice())]
    #[case(b"{\"a\": \"x\"".as_slice())]
    #[case(b"{\"a\": [\"x\" \"y\"]}".as_slice())]
    #[case(b"{} trailing".as_slice())]
    fn test_rejects_malformed(#[case] input: &[u8]) {
        let err = measure::<Json>(input, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[rstest::rstest]
    fn test_depth_guard() {
        let options = ParseOptions::default().with_max_depth(3);
        assert!(measure::<Json>(br#"{"a":{"b":["c"]}}"#, &options).is_ok());
        assert!(measure::<Json>(br#"{"a":{"b":{"c":{}}}}"#, &options).is_ok());
        let err = measure::<Json>(br#"{"a":{"b":[["d"]]}}"#, &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthExceeded);
    }
}
