//! YAML file format.

use crate::{comments, emit, load};
use configapi_rs_core::file::read_to_string;
use configapi_rs_core::{FileFormat, FormatError, MapNode, TextFileFormat};
use std::io::{Read, Write};

pub(crate) const FORMAT_NAME: &str = "yaml";

/// How a collection is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStyle {
    /// One entry per line, nested by indentation.
    Block,
    /// Inline `[a, b]` / `{k: v}`.
    Flow,
}

/// YAML format with a mapping root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YamlFormat {
    pub(crate) indent: usize,
    pub(crate) root_style: FlowStyle,
    pub(crate) array_style: FlowStyle,
    pub(crate) list_style: FlowStyle,
    pub(crate) map_style: FlowStyle,
    pub(crate) process_comments: bool,
}

impl YamlFormat {
    /// Block style, two-space indent, flow arrays, comments ignored on load.
    pub const DEFAULT: YamlFormat = YamlFormat {
        indent: 2,
        root_style: FlowStyle::Block,
        array_style: FlowStyle::Flow,
        list_style: FlowStyle::Block,
        map_style: FlowStyle::Block,
        process_comments: false,
    };

    /// [`YamlFormat::DEFAULT`] that also reads comments on load.
    pub const COMMENT_PROCESSING: YamlFormat = YamlFormat {
        process_comments: true,
        ..YamlFormat::DEFAULT
    };

    pub fn builder() -> YamlFormatBuilder {
        YamlFormatBuilder {
            format: Self::DEFAULT,
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn processes_comments(&self) -> bool {
        self.process_comments
    }
}

impl Default for YamlFormat {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builder for [`YamlFormat`].
#[derive(Debug, Clone)]
pub struct YamlFormatBuilder {
    format: YamlFormat,
}

impl YamlFormatBuilder {
    /// Indentation width of nested block mappings. Clamped to `1..=10`.
    pub fn indent(mut self, indent: usize) -> Self {
        self.format.indent = indent.clamp(1, 10);
        self
    }

    /// Style of the whole document. Flow writes everything on one line.
    pub fn flow_style(mut self, style: FlowStyle) -> Self {
        self.format.root_style = style;
        self
    }

    /// Style of primitive arrays.
    pub fn array_style(mut self, style: FlowStyle) -> Self {
        self.format.array_style = style;
        self
    }

    /// Style of lists.
    pub fn list_style(mut self, style: FlowStyle) -> Self {
        self.format.list_style = style;
        self
    }

    /// Style of nested maps.
    pub fn map_style(mut self, style: FlowStyle) -> Self {
        self.format.map_style = style;
        self
    }

    /// Read block, inline and root comments on load.
    pub fn process_comments(mut self, enabled: bool) -> Self {
        self.format.process_comments = enabled;
        self
    }

    pub fn build(self) -> YamlFormat {
        self.format
    }
}

impl FileFormat for YamlFormat {
    type Node = MapNode;

    fn name(&self) -> &'static str {
        FORMAT_NAME
    }

    fn load(&self, reader: &mut dyn Read) -> Result<MapNode, FormatError> {
        let text = read_to_string(reader, FORMAT_NAME)?;
        let mut root = load::parse_root(&text)?;
        if self.process_comments {
            comments::attach(&text, &mut root);
        }
        Ok(root)
    }

    fn save(&self, node: &MapNode, writer: &mut dyn Write) -> Result<(), FormatError> {
        let text = emit::emit_document(self, node);
        writer.write_all(text.as_bytes())?;
        Ok(())
    }
}

impl TextFileFormat for YamlFormat {}
