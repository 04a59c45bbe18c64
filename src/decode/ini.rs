use crate::constants::{is_ini_key_byte, is_ini_value_byte};
use crate::{ParseOptions, Result};

use super::{Cursor, Grammar, Pass};

/// `[section]` headers open root nodes; `key = value` pairs become
/// attributes of the most recent section.
pub(crate) struct Ini;

impl Grammar for Ini {
    const NAME: &'static str = "ini";

    fn scan<P: Pass>(cursor: &mut Cursor<'_>, pass: &mut P, _options: &ParseOptions) -> Result<()> {
        let mut section: Option<P::Id> = None;
        let mut line_start = true;

        while let Some(byte) = cursor.peek() {
            match byte {
                b'\n' => {
                    line_start = true;
                    cursor.bump();
                }
                b' ' | b'\t' | b'\r' => cursor.bump(),
                b';' | b'#' if line_start => {
                    let end = cursor.find(b'\n').unwrap_or(cursor.input().len());
                    cursor.set_pos(end);
                }
                b'[' => {
                    line_start = false;
                    let id = section_header(cursor, pass)?;
                    pass.link(None, id)?;
                    section = Some(id);
                }
                b'=' => {
                    line_start = false;
                    let key_start = key_value(cursor, pass, section)?;
                    if section.is_none() {
                        return Err(cursor.error_at("key outside of any section", key_start));
                    }
                }
                _ => {
                    line_start = false;
                    cursor.bump();
                }
            }
        }
        Ok(())
    }
}

fn section_header<P: Pass>(cursor: &mut Cursor<'_>, pass: &mut P) -> Result<P::Id> {
    let open = cursor.pos();
    cursor.bump();
    let close = cursor
        .find(b']')
        .ok_or_else(|| cursor.error_at("unterminated section header", open))?;
    let name = cursor.slice(open + 1, close);
    if name.contains(&b'\n') {
        return Err(cursor.error_at("unterminated section header", open));
    }
    cursor.set_pos(close + 1);
    pass.node(Some(name))
}

/// Reads the key backwards from the `=` under the cursor and the value
/// forwards from it. Returns the key offset for error reporting.
fn key_value<P: Pass>(
    cursor: &mut Cursor<'_>,
    pass: &mut P,
    section: Option<P::Id>,
) -> Result<usize> {
    let eq = cursor.pos();
    let mut key_end = eq;
    while key_end > 0 && matches!(cursor.byte_at(key_end - 1), b' ' | b'\t') {
        key_end -= 1;
    }
    let mut key_start = key_end;
    while key_start > 0 && is_ini_key_byte(cursor.byte_at(key_start - 1)) {
        key_start -= 1;
    }
    if key_start == key_end {
        return Err(cursor.error_at("missing key before '='", eq));
    }
    let key = cursor.slice(key_start, key_end);

    cursor.bump();
    cursor.skip_blanks();
    let value = cursor.take_while(is_ini_value_byte);

    if let Some(section) = section {
        pass.attribute(section, key, value)?;
    }
    Ok(key_start)
}
