use memchr::{memchr_iter, memrchr};
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotImplemented,
    Syntax,
    DepthExceeded,
    UnsupportedFormat,
    Capacity,
    InvalidNode,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    Parse,
    Print,
    Tree,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Resolves a byte offset into a 1-based line and column.
    pub fn from_offset(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let head = &input[..offset];
        let line = memchr_iter(b'\n', head).count() + 1;
        let column = match memrchr(b'\n', head) {
            Some(newline) => offset - newline,
            None => offset + 1,
        };
        Self {
            offset,
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, ThisError)]
#[error("{message}{}", location_suffix(.location))]
pub struct Error {
    pub kind: ErrorKind,
    pub stage: ErrorStage,
    pub message: String,
    pub location: Option<Location>,
}

fn location_suffix(location: &Option<Location>) -> String {
    match location {
        Some(loc) => format!(" at line {}, column {}", loc.line, loc.column),
        None => String::new(),
    }
}

impl Error {
    pub fn not_implemented(context: &'static str) -> Self {
        Self {
            kind: ErrorKind::NotImplemented,
            stage: ErrorStage::Unknown,
            message: format!("not implemented: {context}"),
            location: None,
        }
    }

    pub fn syntax(message: impl Into<String>, input: &[u8], offset: usize) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            stage: ErrorStage::Parse,
            message: message.into(),
            location: Some(Location::from_offset(input, offset)),
        }
    }

    pub fn depth_exceeded(max_depth: usize) -> Self {
        Self {
            kind: ErrorKind::DepthExceeded,
            stage: ErrorStage::Unknown,
            message: format!("maximum nesting depth of {max_depth} exceeded"),
            location: None,
        }
    }

    pub fn unsupported_format(context: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnsupportedFormat,
            stage: ErrorStage::Unknown,
            message: context.into(),
            location: None,
        }
    }

    pub fn capacity(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Capacity,
            stage: ErrorStage::Unknown,
            message: message.into(),
            location: None,
        }
    }

    pub fn invalid_node(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidNode,
            stage: ErrorStage::Tree,
            message: message.into(),
            location: None,
        }
    }

    pub fn io(err: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            stage: ErrorStage::Unknown,
            message: format!("io error: {err}"),
            location: None,
        }
    }

    pub fn with_stage(mut self, stage: ErrorStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_location(mut self, input: &[u8], offset: usize) -> Self {
        self.location = Some(Location::from_offset(input, offset));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(0, 1, 1)]
    #[case(2, 1, 3)]
    #[case(3, 2, 1)]
    #[case(4, 2, 2)]
    #[case(6, 3, 2)]
    #[case(99, 3, 3)]
    fn test_location_from_offset(#[case] offset: usize, #[case] line: usize, #[case] column: usize) {
        let input = b"ab\nc\nde\n";
        let input = &input[..input.len() - 1];
        let loc = Location::from_offset(input, offset);
        assert_eq!(loc.line, line);
        assert_eq!(loc.column, column);
    }

    #[rstest::rstest]
    fn test_display_includes_location() {
        let err = Error::syntax("unterminated tag", b"<a\n<b", 3);
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.stage, ErrorStage::Parse);
        assert_eq!(err.to_string(), "unterminated tag at line 2, column 1");
    }

    #[rstest::rstest]
    fn test_display_without_location() {
        let err = Error::depth_exceeded(4).with_stage(ErrorStage::Print);
        assert_eq!(err.stage, ErrorStage::Print);
        assert_eq!(err.to_string(), "maximum nesting depth of 4 exceeded");
    }
}
