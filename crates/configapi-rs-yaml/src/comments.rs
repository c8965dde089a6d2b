//! Comment recovery.
//!
//! The YAML parser drops comments, so they are recovered with a separate
//! line scan over the same text. The scan tracks the path of the node each
//! structural line belongs to and attaches pending comment lines to it
//! after the tree has been built.
//!
//! Comments inside block scalars and multi-line flow collections are not
//! recovered.

use configapi_rs_core::{BlockComment, Comment, InlineComment, MapNode, Node};
use log::trace;
use std::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug)]
struct Frame {
    column: usize,
    segment: Segment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Blank,
    Comment(String),
}

#[derive(Debug)]
struct Found {
    path: Vec<Segment>,
    block: Option<BlockComment>,
    inline: Option<InlineComment>,
}

#[derive(Debug, Default)]
struct Scanner {
    frames: Vec<Frame>,
    pending: Vec<Pending>,
    seen_structure: bool,
    header: Option<BlockComment>,
    found: Vec<Found>,
    /// Column of the line that opened a block scalar.
    block_scalar: Option<usize>,
    flow_depth: i32,
}

/// Scan `text` for comments and attach them to the nodes of `root`.
pub(crate) fn attach(text: &str, root: &mut MapNode) {
    let mut scanner = Scanner::default();
    for line in text.lines() {
        scanner.line(line.trim_end_matches('\r'));
    }

    let footer = block_from(mem::take(&mut scanner.pending));
    let header = scanner.header.take();

    for found in scanner.found {
        let comment = Comment::node(found.block, found.inline);
        match node_at(root, &found.path) {
            Some(node) => *node = mem::take(node).with_comment(comment),
            None => trace!("no node for comment (path={:?})", found.path),
        }
    }

    if header.is_some() || footer.is_some() {
        root.set_comment(Some(Comment::root(header, footer)));
    }
}

impl Scanner {
    fn line(&mut self, line: &str) {
        let trimmed = line.trim_start();
        let column = line.len() - trimmed.len();

        if let Some(parent) = self.block_scalar {
            if trimmed.is_empty() || column > parent {
                return;
            }
            self.block_scalar = None;
        }

        if self.flow_depth > 0 {
            self.flow_depth += bracket_balance(line);
            return;
        }

        if trimmed.is_empty() {
            self.pending.push(Pending::Blank);
        } else if let Some(content) = trimmed.strip_prefix('#') {
            self.pending.push(Pending::Comment(content.to_string()));
        } else if column == 0
            && ["---", "...", "%"]
                .iter()
                .any(|marker| trimmed.starts_with(marker))
        {
            // Document markers and directives carry no node.
        } else {
            if !self.seen_structure {
                self.seen_structure = true;
                self.split_header();
            }
            self.entry(column, trimmed);
        }
    }

    /// Comments before the first blank line of the document form the root
    /// header when more comment lines follow that blank line.
    fn split_header(&mut self) {
        let mut split = None;
        let mut comment_seen = false;
        for (index, line) in self.pending.iter().enumerate() {
            match line {
                Pending::Comment(_) => comment_seen = true,
                Pending::Blank if comment_seen => split = Some(index),
                Pending::Blank => {}
            }
        }

        if let Some(index) = split {
            let rest = self.pending.split_off(index + 1);
            self.header = block_from(mem::replace(&mut self.pending, rest));
        }
    }

    fn entry(&mut self, column: usize, text: &str) {
        if text == "-" || text.starts_with("- ") {
            self.item(column, text);
        } else {
            self.key(column, text);
        }
    }

    fn item(&mut self, column: usize, text: &str) {
        while self.frames.last().is_some_and(|frame| frame.column > column) {
            self.frames.pop();
        }

        let index = match self.frames.last() {
            Some(Frame {
                column: top,
                segment: Segment::Index(index),
            }) if *top == column => {
                let next = index + 1;
                self.frames.pop();
                next
            }
            _ => 0,
        };
        self.frames.push(Frame {
            column,
            segment: Segment::Index(index),
        });

        let rest = text[1..].trim_start();
        let rest_column = column + (text.len() - rest.len());
        let block = block_from(mem::take(&mut self.pending));

        if rest.is_empty() {
            self.record(block, None);
        } else if let Some(content) = rest.strip_prefix('#') {
            self.record(block, Some(InlineComment::new(content)));
        } else if rest == "-" || rest.starts_with("- ") {
            self.record(block, None);
            self.item(rest_column, rest);
        } else if parse_key(rest).is_some() {
            self.record(block, None);
            self.key(rest_column, rest);
        } else {
            let (value, inline) = split_inline(rest);
            self.record(block, inline.map(InlineComment::new));
            self.value(column, value);
        }
    }

    fn key(&mut self, column: usize, text: &str) {
        let Some((key, rest)) = parse_key(text) else {
            return;
        };

        while self.frames.last().is_some_and(|frame| frame.column >= column) {
            self.frames.pop();
        }
        self.frames.push(Frame {
            column,
            segment: Segment::Key(key),
        });

        let (value, inline) = split_inline(rest.trim_start());
        let block = block_from(mem::take(&mut self.pending));
        self.record(block, inline.map(InlineComment::new));
        self.value(column, value);
    }

    /// Note values that span the following lines.
    fn value(&mut self, column: usize, value: &str) {
        let indicator = value
            .split_whitespace()
            .find(|token| !token.starts_with('&') && !token.starts_with('!'));
        match indicator {
            Some(token) if token.starts_with('|') || token.starts_with('>') => {
                self.block_scalar = Some(column);
            }
            Some(token) if token.starts_with('[') || token.starts_with('{') => {
                self.flow_depth = bracket_balance(value).max(0);
            }
            _ => {}
        }
    }

    fn record(&mut self, block: Option<BlockComment>, inline: Option<InlineComment>) {
        if block.is_none() && inline.is_none() {
            return;
        }
        let path = self
            .frames
            .iter()
            .map(|frame| frame.segment.clone())
            .collect();
        self.found.push(Found {
            path,
            block,
            inline,
        });
    }
}

/// Leading blank lines become `prepend_blank_lines`, blank lines between
/// comment lines become empty content lines, trailing blank lines are
/// dropped.
fn block_from(lines: Vec<Pending>) -> Option<BlockComment> {
    let prepend = lines
        .iter()
        .take_while(|line| **line == Pending::Blank)
        .count();
    let last = lines
        .iter()
        .rposition(|line| matches!(line, Pending::Comment(_)))?;

    let content = lines[prepend..=last]
        .iter()
        .map(|line| match line {
            Pending::Blank => "",
            Pending::Comment(content) => content.as_str(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(BlockComment::new(content, prepend))
}

fn node_at<'a>(root: &'a mut MapNode, path: &[Segment]) -> Option<&'a mut Node> {
    let (first, rest) = path.split_first()?;
    let mut node = match first {
        Segment::Key(key) => root.get_node_mut(key)?,
        Segment::Index(_) => return None,
    };

    for segment in rest {
        node = match (segment, node) {
            (Segment::Key(key), Node::Map(map)) => map.get_node_mut(key)?,
            (Segment::Index(index), Node::List(list)) => list.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Split `key: rest` into the unquoted key and the text after the colon.
fn parse_key(text: &str) -> Option<(String, &str)> {
    let (key, after) = match text.chars().next()? {
        '"' => {
            let (key, consumed) = double_quoted(text)?;
            (key, text[consumed..].trim_start())
        }
        '\'' => {
            let (key, consumed) = single_quoted(text)?;
            (key, text[consumed..].trim_start())
        }
        '[' | '{' | '?' | '#' => return None,
        _ => {
            let bytes = text.as_bytes();
            let colon = (0..bytes.len()).find(|&index| {
                bytes[index] == b':'
                    && bytes
                        .get(index + 1)
                        .is_none_or(|next| *next == b' ' || *next == b'\t')
            })?;
            let key = &text[..colon];
            if key.contains(" #") {
                return None;
            }
            return Some((key.trim_end().to_string(), &text[colon + 1..]));
        }
    };

    let rest = after.strip_prefix(':')?;
    if rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t') {
        Some((key, rest))
    } else {
        None
    }
}

/// Parse a leading double-quoted scalar, returning it and the bytes consumed.
fn double_quoted(text: &str) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = text.char_indices().skip(1);
    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => return Some((value, index + 1)),
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '0' => value.push('\0'),
                    'x' | 'u' | 'U' => {
                        let width = match escaped {
                            'x' => 2,
                            'u' => 4,
                            _ => 8,
                        };
                        let mut code = 0u32;
                        for _ in 0..width {
                            let (_, digit) = chars.next()?;
                            code = code * 16 + digit.to_digit(16)?;
                        }
                        value.push(char::from_u32(code)?);
                    }
                    other => value.push(other),
                }
            }
            other => value.push(other),
        }
    }
    None
}

fn single_quoted(text: &str) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = text.char_indices().skip(1).peekable();
    while let Some((index, ch)) = chars.next() {
        if ch == '\'' {
            if chars.peek().is_some_and(|(_, next)| *next == '\'') {
                chars.next();
                value.push('\'');
            } else {
                return Some((value, index + 1));
            }
        } else {
            value.push(ch);
        }
    }
    None
}

/// Split off an inline comment: a `#` outside quotes that starts the text
/// or follows whitespace. The comment keeps the text after `#` as is.
fn split_inline(text: &str) -> (&str, Option<&str>) {
    let mut quote = None;
    let mut previous = ' ';
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        match (quote, ch) {
            (None, '"') | (None, '\'') if previous.is_whitespace() || index == 0 => {
                quote = Some(ch);
            }
            (Some('"'), '\\') => {
                chars.next();
            }
            (Some('\''), '\'') if chars.peek().is_some_and(|(_, next)| *next == '\'') => {
                chars.next();
            }
            (Some(open), close) if open == close => quote = None,
            (None, '#') if previous.is_whitespace() => {
                return (text[..index].trim_end(), Some(&text[index + 1..]));
            }
            _ => {}
        }
        previous = ch;
    }
    (text.trim_end(), None)
}

/// Net count of opening flow brackets outside quotes and comments.
fn bracket_balance(text: &str) -> i32 {
    let (text, _) = split_inline(text);
    let mut quote = None;
    let mut balance = 0;
    for ch in text.chars() {
        match (quote, ch) {
            (None, '"') | (None, '\'') => quote = Some(ch),
            (Some(open), close) if open == close => quote = None,
            (None, '[') | (None, '{') => balance += 1,
            (None, ']') | (None, '}') => balance -= 1,
            _ => {}
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys_are_unquoted() {
        assert_eq!(parse_key("plain: 1"), Some(("plain".to_string(), " 1")));
        assert_eq!(parse_key("nested:"), Some(("nested".to_string(), "")));
        assert_eq!(
            parse_key("\"a: b\": 1"),
            Some(("a: b".to_string(), " 1"))
        );
        assert_eq!(parse_key("'it''s': x"), Some(("it's".to_string(), " x")));
        assert_eq!(parse_key("url: http://host"), Some(("url".to_string(), " http://host")));
        assert_eq!(parse_key("no colon here"), None);
        assert_eq!(parse_key("[flow]"), None);
    }

    #[test]
    fn inline_comments_respect_quotes() {
        assert_eq!(split_inline("true # inline"), ("true", Some(" inline")));
        assert_eq!(split_inline("\"a # b\" #c"), ("\"a # b\"", Some("c")));
        assert_eq!(split_inline("a#b"), ("a#b", None));
        assert_eq!(split_inline("# only"), ("", Some(" only")));
    }

    #[test]
    fn pending_lines_build_blocks() {
        let block = block_from(vec![
            Pending::Blank,
            Pending::Comment(" a".to_string()),
            Pending::Blank,
            Pending::Comment(" b".to_string()),
            Pending::Blank,
        ]);
        assert_eq!(block, Some(BlockComment::new(" a\n\n b", 1)));
        assert_eq!(block_from(vec![Pending::Blank, Pending::Blank]), None);
    }

    #[test]
    fn comments_reach_nested_list_elements() {
        let mut root = MapNode::new();
        let servers = root.create_list("servers");
        servers.add_map().set("host", "a");
        servers.add_map().set("host", "b");

        attach(
            "servers:\n# first\n- host: a # primary\n- host: b\n",
            &mut root,
        );

        let servers = root.get_list("servers").expect("servers");
        let first = servers.get(0).and_then(Node::as_map).expect("first");
        assert_eq!(first.comment(), Some(&Comment::block(" first")));
        assert_eq!(
            first.get_node("host").and_then(Node::comment),
            Some(&Comment::inline(" primary"))
        );
        assert_eq!(servers.get(1).and_then(Node::comment), None);
    }

    #[test]
    fn block_scalars_are_skipped() {
        let mut root = MapNode::new();
        root.set("text", "line\n# not a comment\n");
        root.set("after", 1);

        attach("text: |\n  line\n  # not a comment\n# real\nafter: 1\n", &mut root);

        assert_eq!(root.get_node("text").and_then(Node::comment), None);
        assert_eq!(
            root.get_node("after").and_then(Node::comment),
            Some(&Comment::block(" real"))
        );
    }
}
