//! YAML text output.

use crate::format::{FlowStyle, YamlFormat};
use configapi_rs_core::{ArrayNode, BlockComment, Comment, InlineComment, ListNode, MapNode, Node};

const RESERVED: [&str; 10] = ["null", "~", "true", "false", "yes", "no", "on", "off", "y", "n"];

pub(crate) fn emit_document(format: &YamlFormat, root: &MapNode) -> String {
    let mut emitter = Emitter {
        format,
        out: String::new(),
    };

    let (header, footer) = match root.comment() {
        Some(Comment::Root(root)) => (root.header.clone(), root.footer.clone()),
        Some(other) => (other.parts().0, None),
        None => (None, None),
    };

    if let Some(header) = &header {
        emitter.block(header, 0);
        emitter.out.push('\n');
    }

    if format.root_style == FlowStyle::Flow || root.is_empty() {
        emitter.out.push_str(&flow_map(root));
        emitter.out.push('\n');
    } else {
        emitter.entries(root, 0);
    }

    if let Some(footer) = &footer {
        emitter.block(footer, 0);
    }
    emitter.out
}

struct Emitter<'a> {
    format: &'a YamlFormat,
    out: String,
}

impl Emitter<'_> {
    fn entries(&mut self, map: &MapNode, indent: usize) {
        for (key, node) in map {
            let (block, inline) = comment_parts(node);
            if let Some(block) = &block {
                self.block(block, indent);
            }
            self.pad(indent);
            self.entry(key, node.unwrap_comment(), inline.as_ref(), indent);
        }
    }

    /// `key: value` without leading indentation or block comment.
    fn entry(&mut self, key: &str, value: &Node, inline: Option<&InlineComment>, indent: usize) {
        self.out.push_str(&quote(key));
        self.out.push(':');

        if self.nests(value) {
            self.inline(inline);
            self.out.push('\n');
            match value {
                Node::Map(map) => self.entries(map, indent + self.format.indent),
                Node::List(list) => self.items(list.as_slice(), indent),
                Node::Array(array) => self.items(&array.elements(), indent),
                _ => {}
            }
        } else {
            self.out.push(' ');
            self.out.push_str(&flow_value(value));
            self.inline(inline);
            self.out.push('\n');
        }
    }

    fn items(&mut self, items: &[Node], indent: usize) {
        for node in items {
            let (block, inline) = comment_parts(node);
            if let Some(block) = &block {
                self.block(block, indent);
            }
            self.pad(indent);
            self.item(node.unwrap_comment(), inline.as_ref(), indent);
        }
    }

    fn item(&mut self, value: &Node, inline: Option<&InlineComment>, indent: usize) {
        if !self.nests(value) {
            self.out.push_str("- ");
            self.out.push_str(&flow_value(value));
            self.inline(inline);
            self.out.push('\n');
            return;
        }

        match value {
            Node::Map(map) => {
                let mut entries = map.iter();
                let compact = inline.is_none()
                    && map
                        .iter()
                        .next()
                        .is_some_and(|(_, first)| comment_parts(first).0.is_none());
                match entries.next() {
                    Some((key, first)) if compact => {
                        self.out.push_str("- ");
                        let (_, first_inline) = comment_parts(first);
                        self.entry(key, first.unwrap_comment(), first_inline.as_ref(), indent + 2);
                        for (key, node) in entries {
                            let (block, inline) = comment_parts(node);
                            if let Some(block) = &block {
                                self.block(block, indent + 2);
                            }
                            self.pad(indent + 2);
                            self.entry(key, node.unwrap_comment(), inline.as_ref(), indent + 2);
                        }
                    }
                    _ => {
                        self.out.push('-');
                        self.inline(inline);
                        self.out.push('\n');
                        self.entries(map, indent + 2);
                    }
                }
            }
            Node::List(list) => {
                self.out.push('-');
                self.inline(inline);
                self.out.push('\n');
                self.items(list.as_slice(), indent + 2);
            }
            Node::Array(array) => {
                self.out.push('-');
                self.inline(inline);
                self.out.push('\n');
                self.items(&array.elements(), indent + 2);
            }
            _ => {}
        }
    }

    /// Whether `value` is written on the lines below its key or dash.
    fn nests(&self, value: &Node) -> bool {
        match value {
            Node::Map(map) => !map.is_empty() && self.format.map_style == FlowStyle::Block,
            Node::List(list) => !list.is_empty() && self.format.list_style == FlowStyle::Block,
            Node::Array(array) => {
                !array.is_empty() && self.format.array_style == FlowStyle::Block
            }
            _ => false,
        }
    }

    fn block(&mut self, block: &BlockComment, indent: usize) {
        for _ in 0..block.prepend_blank_lines {
            self.out.push('\n');
        }
        for line in block.content.split('\n') {
            if !line.is_empty() {
                self.pad(indent);
                self.out.push('#');
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }

    fn inline(&mut self, inline: Option<&InlineComment>) {
        if let Some(inline) = inline {
            self.out.push_str(" #");
            // An inline comment must stay on its line.
            self.out.extend(inline.content.chars().map(|ch| match ch {
                '\n' | '\r' => ' ',
                ch => ch,
            }));
        }
    }

    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat_n(' ', indent));
    }
}

fn comment_parts(node: &Node) -> (Option<BlockComment>, Option<InlineComment>) {
    node.comment()
        .map(Comment::parts)
        .unwrap_or((None, None))
}

fn flow_value(node: &Node) -> String {
    match node {
        Node::Null => "null".to_string(),
        Node::Bool(value) => value.to_string(),
        Node::Byte(value) => value.to_string(),
        Node::Short(value) => value.to_string(),
        Node::Int(value) => value.to_string(),
        Node::Long(value) => value.to_string(),
        Node::Float(value) => float(f64::from(*value), value.to_string()),
        Node::Double(value) => float(*value, value.to_string()),
        Node::Char(value) => quote(&value.to_string()),
        Node::String(value) => quote(value),
        Node::Enum(value) => quote(value.name),
        Node::List(list) => flow_seq(list),
        Node::Map(map) => flow_map(map),
        Node::Array(array) => flow_array(array),
        Node::Commented(commented) => flow_value(commented.node()),
    }
}

fn flow_seq(list: &ListNode) -> String {
    let items = list.iter().map(flow_value).collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

fn flow_array(array: &ArrayNode) -> String {
    let items = array.elements().iter().map(flow_value).collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

fn flow_map(map: &MapNode) -> String {
    let entries = map
        .iter()
        .map(|(key, value)| format!("{}: {}", quote(key), flow_value(value)))
        .collect::<Vec<_>>();
    format!("{{{}}}", entries.join(", "))
}

/// Floats always carry a `.` so they read back as floats.
fn float(value: f64, text: String) -> String {
    if value.is_nan() {
        ".nan".to_string()
    } else if value == f64::INFINITY {
        ".inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-.inf".to_string()
    } else if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Plain scalar when it reads back as the same string, double-quoted otherwise.
pub(crate) fn quote(text: &str) -> String {
    if !needs_quotes(text) {
        return text.to_string();
    }

    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\0' => quoted.push_str("\\0"),
            '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{feff}' => {
                quoted.push_str(&format!("\\u{:04x}", ch as u32));
            }
            ch if ch.is_control() => quoted.push_str(&format!("\\x{:02x}", ch as u32)),
            ch => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

fn needs_quotes(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return true;
    };

    if text == "<<"
        || RESERVED
            .iter()
            .any(|word| word.eq_ignore_ascii_case(text))
    {
        return true;
    }

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let looks_numeric = unsigned
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_digit() || ch == '.');

    looks_numeric
        || "-?:,[]{}#&*!|>'\"%@`".contains(first)
        || text.starts_with(' ')
        || text.ends_with(' ')
        || text.ends_with(':')
        || text.contains(": ")
        || text.contains(" #")
        || text.contains([',', '[', ']', '{', '}'])
        || text.chars().any(|ch| {
            ch.is_control() || matches!(ch, '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{feff}')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ambiguous_strings_are_quoted() {
        assert_eq!(quote("plain text"), "plain text");
        assert_eq!(quote(""), "\"\"");
        assert_eq!(quote("true"), "\"true\"");
        assert_eq!(quote("No"), "\"No\"");
        assert_eq!(quote("y"), "\"y\"");
        assert_eq!(quote("<<"), "\"<<\"");
        assert_eq!(quote("123"), "\"123\"");
        assert_eq!(quote("-1.5"), "\"-1.5\"");
        assert_eq!(quote("a: b"), "\"a: b\"");
        assert_eq!(quote("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(quote("say \"hi\", ok"), "\"say \\\"hi\\\", ok\"");
        assert_eq!(quote("v1.0"), "v1.0");
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(flow_value(&Node::Double(1.0)), "1.0");
        assert_eq!(flow_value(&Node::Float(0.5)), "0.5");
        assert_eq!(flow_value(&Node::Double(f64::NAN)), ".nan");
        assert_eq!(flow_value(&Node::Double(f64::NEG_INFINITY)), "-.inf");
    }

    #[test]
    fn lists_of_maps_use_compact_entries() {
        let mut root = MapNode::new();
        let list = root.create_list("servers");
        let first = list.add_map();
        first.set("host", "a");
        first.set("port", 80);
        list.add_list().add_all(["x", "y"]);

        assert_eq!(
            emit_document(&YamlFormat::DEFAULT, &root),
            "servers:\n- host: a\n  port: 80\n-\n  - x\n  - \"y\"\n"
        );
    }

    #[test]
    fn inline_comments_stay_on_one_line() {
        let mut root = MapNode::new();
        root.set(
            "key",
            Node::from(1).with_comment(Some(Comment::inline(" first\nsecond"))),
        );
        assert_eq!(
            emit_document(&YamlFormat::DEFAULT, &root),
            "key: 1 # first second\n"
        );
    }

    #[test]
    fn flow_root_writes_one_line() {
        let mut root = MapNode::new();
        root.set("a", 1);
        root.create_list("b").add_all([true, false]);
        let format = YamlFormat::builder().flow_style(FlowStyle::Flow).build();
        assert_eq!(emit_document(&format, &root), "{a: 1, b: [true, false]}\n");
    }
}
