//! Comments attached to nodes.
//!
//! Only YAML writes comments; the other formats drop them on save.
//! Comment text never contains the `#` marker but keeps any space that
//! followed it, and multi-line content is joined with `\n`.

/// The `kind` of a [`Comment::Simple`] that places it after the value.
pub const INLINE_KIND: &str = "inline";

/// A comment attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Comment {
    /// Format-agnostic comment. `kind` selects the placement: [`INLINE_KIND`]
    /// means inline, anything else means a block above the node.
    Simple { content: String, kind: String },
    /// Lines above the node.
    Block(BlockComment),
    /// Text after the node on the same line.
    Inline(InlineComment),
    /// Block and inline comment on the same node.
    Node(NodeComment),
    /// Header and footer of a document root.
    Root(RootComment),
}

/// Comment lines written above a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockComment {
    pub content: String,
    /// Blank lines written before the comment.
    pub prepend_blank_lines: usize,
}

/// Comment written after a node on the same line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InlineComment {
    pub content: String,
}

/// Block and inline comment of one node. Either part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeComment {
    pub block: Option<BlockComment>,
    pub inline: Option<InlineComment>,
}

/// Comments at the start and end of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RootComment {
    pub header: Option<BlockComment>,
    pub footer: Option<BlockComment>,
}

impl Comment {
    /// A simple block comment.
    pub fn simple(content: impl Into<String>) -> Self {
        Self::Simple {
            content: content.into(),
            kind: String::new(),
        }
    }

    /// A simple comment with an explicit placement kind.
    pub fn simple_with_kind(content: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::Simple {
            content: content.into(),
            kind: kind.into(),
        }
    }

    pub fn block(content: impl Into<String>) -> Self {
        Self::Block(BlockComment::new(content, 0))
    }

    pub fn inline(content: impl Into<String>) -> Self {
        Self::Inline(InlineComment::new(content))
    }

    /// Build a node comment, collapsing to a single part when the other is absent.
    pub fn node(block: Option<BlockComment>, inline: Option<InlineComment>) -> Option<Self> {
        match (block, inline) {
            (None, None) => None,
            (Some(block), None) => Some(Self::Block(block)),
            (None, Some(inline)) => Some(Self::Inline(inline)),
            (block, inline) => Some(Self::Node(NodeComment { block, inline })),
        }
    }

    pub fn root(header: Option<BlockComment>, footer: Option<BlockComment>) -> Self {
        Self::Root(RootComment { header, footer })
    }

    /// Split this comment into its block and inline parts.
    ///
    /// Simple comment content is prefixed with a space per line so it reads
    /// `# text` once written. Root comments have no node placement and yield
    /// nothing.
    pub fn parts(&self) -> (Option<BlockComment>, Option<InlineComment>) {
        match self {
            Self::Simple { content, kind } => {
                let content = pad_lines(content);
                if kind == INLINE_KIND {
                    (None, Some(InlineComment { content }))
                } else {
                    (Some(BlockComment::new(content, 0)), None)
                }
            }
            Self::Block(block) => (Some(block.clone()), None),
            Self::Inline(inline) => (None, Some(inline.clone())),
            Self::Node(node) => (node.block.clone(), node.inline.clone()),
            Self::Root(_) => (None, None),
        }
    }
}

impl BlockComment {
    pub fn new(content: impl Into<String>, prepend_blank_lines: usize) -> Self {
        Self {
            content: content.into(),
            prepend_blank_lines,
        }
    }
}

impl InlineComment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl From<&str> for Comment {
    fn from(content: &str) -> Self {
        Self::simple(content)
    }
}

impl From<String> for Comment {
    fn from(content: String) -> Self {
        Self::simple(content)
    }
}

impl From<BlockComment> for Comment {
    fn from(block: BlockComment) -> Self {
        Self::Block(block)
    }
}

impl From<InlineComment> for Comment {
    fn from(inline: InlineComment) -> Self {
        Self::Inline(inline)
    }
}

fn pad_lines(content: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
