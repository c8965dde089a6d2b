use crate::escape::{escape, unescape};
use configapi_rs_core::file::read_to_string;
use configapi_rs_core::{FileFormat, FormatError, MapNode, TextFileFormat};
use log::trace;
use std::io::{Read, Write};

pub(crate) const FORMAT_NAME: &str = "properties";

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// Flat `key=value` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertiesFormat;

impl PropertiesFormat {
    pub const DEFAULT: PropertiesFormat = PropertiesFormat;
}

impl FileFormat for PropertiesFormat {
    type Node = MapNode;

    fn name(&self) -> &'static str {
        FORMAT_NAME
    }

    fn load(&self, reader: &mut dyn Read) -> Result<MapNode, FormatError> {
        let text = read_to_string(reader, FORMAT_NAME)?;
        let mut map = MapNode::new();
        for line in logical_lines(&text) {
            let (key, value) = split_entry(&line);
            map.set(unescape(key)?, unescape(value)?);
        }
        trace!("loaded properties (entries={})", map.len());
        Ok(map)
    }

    fn save(&self, node: &MapNode, writer: &mut dyn Write) -> Result<(), FormatError> {
        for (key, value) in node {
            let text = value.as_scalar_string().ok_or_else(|| {
                FormatError::unsupported(
                    FORMAT_NAME,
                    format!("{key} holds a {}, not a string-representable value", value.kind()),
                )
            })?;
            writeln!(writer, "{}={}", escape(key, true), escape(&text, false))?;
        }
        Ok(())
    }
}

impl TextFileFormat for PropertiesFormat {}

/// Join continued lines and drop blank and comment lines.
fn logical_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut physical = normalized.split('\n');
    let mut lines = Vec::new();

    while let Some(line) = physical.next() {
        let mut current = line.trim_start_matches(WHITESPACE);
        if current.is_empty() || current.starts_with(['#', '!']) {
            continue;
        }

        let mut logical = String::new();
        loop {
            if !continues(current) {
                logical.push_str(current);
                break;
            }
            logical.push_str(&current[..current.len() - 1]);
            match physical.next() {
                Some(next) => current = next.trim_start_matches(WHITESPACE),
                None => break,
            }
        }
        lines.push(logical);
    }
    lines
}

/// A line continues when it ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|ch| *ch == '\\').count() % 2 == 1
}

/// Split a logical line at the first unescaped `=`, `:` or whitespace.
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (index, ch) in line.char_indices() {
        if !escaped && (ch == '=' || ch == ':') {
            key_end = index;
            value_start = index + 1;
            has_separator = true;
            break;
        }
        if !escaped && WHITESPACE.contains(&ch) {
            key_end = index;
            value_start = index + 1;
            break;
        }
        escaped = ch == '\\' && !escaped;
    }

    for ch in line[value_start..].chars() {
        if WHITESPACE.contains(&ch) {
            value_start += 1;
        } else if !has_separator && (ch == '=' || ch == ':') {
            has_separator = true;
            value_start += 1;
        } else {
            break;
        }
    }

    (&line[..key_end], &line[value_start..])
}
