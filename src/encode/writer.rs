use crate::{Error, ErrorStage, Indent, PrintOptions, Result};

/// Byte sink the printers write through. [`Tally`] only counts, so running
/// a printer against it first yields the exact output length.
pub(crate) trait Output {
    fn put_slice(&mut self, bytes: &[u8]);
    fn put_byte(&mut self, byte: u8);
    fn put_repeat(&mut self, byte: u8, count: usize);
}

#[derive(Debug, Default)]
pub(crate) struct Tally {
    pub len: usize,
}

impl Output for Tally {
    fn put_slice(&mut self, bytes: &[u8]) {
        self.len += bytes.len();
    }

    fn put_byte(&mut self, _byte: u8) {
        self.len += 1;
    }

    fn put_repeat(&mut self, _byte: u8, count: usize) {
        self.len += count;
    }
}

impl Output for Vec<u8> {
    fn put_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }

    fn put_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    fn put_repeat(&mut self, byte: u8, count: usize) {
        self.resize(self.len() + count, byte);
    }
}

pub(crate) struct Writer<O> {
    out: O,
    indent: Indent,
    max_depth: usize,
}

impl<O: Output> Writer<O> {
    pub fn new(out: O, options: &PrintOptions) -> Self {
        Self {
            out,
            indent: options.indent,
            max_depth: options.max_depth,
        }
    }

    pub fn finish(self) -> O {
        self.out
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.put_slice(bytes);
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.out.put_byte(byte);
    }

    pub fn write_newline(&mut self) {
        self.out.put_byte(b'\n');
    }

    pub fn write_indent(&mut self, depth: usize) {
        let (byte, width) = self.indent.unit();
        if depth == 0 || width == 0 {
            return;
        }
        self.out.put_repeat(byte, depth * width);
    }

    pub fn write_quoted(&mut self, text: &[u8]) {
        self.out.put_byte(b'"');
        self.out.put_slice(text);
        self.out.put_byte(b'"');
    }

    /// Guards printer recursion against trees deeper than `max_depth`.
    pub fn enter(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::depth_exceeded(self.max_depth).with_stage(ErrorStage::Print));
        }
        Ok(())
    }
}
