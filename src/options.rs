use crate::constants::{DEFAULT_MAX_DEPTH, GROWTH_REGION_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tabs,
    Spaces(usize),
}

impl Indent {
    pub fn spaces(count: usize) -> Self {
        Indent::Spaces(count)
    }

    pub(crate) fn unit(self) -> (u8, usize) {
        match self {
            Indent::Tabs => (b'\t', 1),
            Indent::Spaces(count) => (b' ', count),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub max_depth: usize,
    pub growth_region_size: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_growth_region_size(mut self, size: usize) -> Self {
        self.growth_region_size = size.max(1);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            growth_region_size: GROWTH_REGION_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrintOptions {
    pub indent: Indent,
    pub max_depth: usize,
}

impl PrintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
