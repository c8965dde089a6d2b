//! Node encoding.
//!
//! Each node starts with a header byte: the top three bits are the length
//! type and the low five bits the data type. Length types `0..=4` are the
//! length itself, 5 is followed by a `u8`, 6 by a `u16` and 7 by an `i32`.
//! Scalars use length type 0. Multi-byte values are big-endian.

use crate::format::FORMAT_NAME;
use crate::mutf8;
use bytes::{Buf, BufMut, BytesMut};
use configapi_rs_core::{ArrayNode, FormatError, ListNode, MapNode, Node};

pub(crate) const NULL: u8 = 0x00;
pub(crate) const BOOLEAN: u8 = 0x01;
pub(crate) const BYTE: u8 = 0x02;
pub(crate) const DOUBLE: u8 = 0x03;
pub(crate) const FLOAT: u8 = 0x04;
pub(crate) const INT: u8 = 0x05;
pub(crate) const LONG: u8 = 0x06;
pub(crate) const SHORT: u8 = 0x07;
pub(crate) const STRING: u8 = 0x08;
pub(crate) const CHAR: u8 = 0x09;
/// Arrays are `ARRAY | element type`; a bare `ARRAY` is a list of nodes.
pub(crate) const ARRAY: u8 = 0x10;
pub(crate) const MAP: u8 = 0x1f;

const DATA_TYPE_MASK: u8 = 0x1f;
const LENGTH_TYPE_SHIFT: u8 = 5;

const U8_LENGTH: u8 = 5;
const U16_LENGTH: u8 = 6;
const I32_LENGTH: u8 = 7;

/// Deepest map or list nesting the decoder accepts.
const MAX_DEPTH: usize = 128;

pub(crate) fn encode(node: &Node, out: &mut BytesMut) -> Result<(), FormatError> {
    match node {
        Node::Null => out.put_u8(NULL),
        Node::Bool(value) => {
            out.put_u8(BOOLEAN);
            out.put_u8(u8::from(*value));
        }
        Node::Byte(value) => {
            out.put_u8(BYTE);
            out.put_i8(*value);
        }
        Node::Short(value) => {
            out.put_u8(SHORT);
            out.put_i16(*value);
        }
        Node::Int(value) => {
            out.put_u8(INT);
            out.put_i32(*value);
        }
        Node::Long(value) => {
            out.put_u8(LONG);
            out.put_i64(*value);
        }
        Node::Float(value) => {
            out.put_u8(FLOAT);
            out.put_f32(*value);
        }
        Node::Double(value) => {
            out.put_u8(DOUBLE);
            out.put_f64(*value);
        }
        Node::Char(value) => {
            out.put_u8(CHAR);
            out.put_u16(char_unit(*value)?);
        }
        Node::String(value) => {
            out.put_u8(STRING);
            put_string(value, out)?;
        }
        Node::Enum(value) => {
            out.put_u8(STRING);
            put_string(value.name, out)?;
        }
        Node::List(list) => encode_list(list, out)?,
        Node::Map(map) => encode_map(map, out)?,
        Node::Array(array) => encode_array(array, out)?,
        Node::Commented(commented) => encode(commented.node(), out)?,
    }
    Ok(())
}

fn encode_list(list: &ListNode, out: &mut BytesMut) -> Result<(), FormatError> {
    let strings = !list.is_empty()
        && list
            .iter()
            .all(|node| matches!(node.unwrap_comment(), Node::String(_)));

    if strings {
        put_header(ARRAY | STRING, list.len(), out)?;
        for node in list {
            put_string(node.as_str().unwrap_or_default(), out)?;
        }
    } else {
        put_header(ARRAY, list.len(), out)?;
        for node in list {
            encode(node, out)?;
        }
    }
    Ok(())
}

fn encode_map(map: &MapNode, out: &mut BytesMut) -> Result<(), FormatError> {
    put_header(MAP, map.len(), out)?;
    for (key, value) in map {
        put_string(key, out)?;
        encode(value, out)?;
    }
    Ok(())
}

fn encode_array(array: &ArrayNode, out: &mut BytesMut) -> Result<(), FormatError> {
    match array {
        ArrayNode::Bool(values) => {
            put_header(ARRAY | BOOLEAN, values.len(), out)?;
            values.iter().for_each(|value| out.put_u8(u8::from(*value)));
        }
        ArrayNode::Byte(values) => {
            put_header(ARRAY | BYTE, values.len(), out)?;
            values.iter().for_each(|value| out.put_i8(*value));
        }
        ArrayNode::Char(values) => {
            put_header(ARRAY | CHAR, values.len(), out)?;
            for value in values {
                out.put_u16(char_unit(*value)?);
            }
        }
        ArrayNode::Short(values) => {
            put_header(ARRAY | SHORT, values.len(), out)?;
            values.iter().for_each(|value| out.put_i16(*value));
        }
        ArrayNode::Int(values) => {
            put_header(ARRAY | INT, values.len(), out)?;
            values.iter().for_each(|value| out.put_i32(*value));
        }
        ArrayNode::Long(values) => {
            put_header(ARRAY | LONG, values.len(), out)?;
            values.iter().for_each(|value| out.put_i64(*value));
        }
        ArrayNode::Float(values) => {
            put_header(ARRAY | FLOAT, values.len(), out)?;
            values.iter().for_each(|value| out.put_f32(*value));
        }
        ArrayNode::Double(values) => {
            put_header(ARRAY | DOUBLE, values.len(), out)?;
            values.iter().for_each(|value| out.put_f64(*value));
        }
    }
    Ok(())
}

fn put_header(data_type: u8, length: usize, out: &mut BytesMut) -> Result<(), FormatError> {
    match length {
        0..=4 => out.put_u8(((length as u8) << LENGTH_TYPE_SHIFT) | data_type),
        5..=0xff => {
            out.put_u8((U8_LENGTH << LENGTH_TYPE_SHIFT) | data_type);
            out.put_u8(length as u8);
        }
        0x100..=0xffff => {
            out.put_u8((U16_LENGTH << LENGTH_TYPE_SHIFT) | data_type);
            out.put_u16(length as u16);
        }
        _ => {
            let length = i32::try_from(length).map_err(|_| {
                FormatError::unsupported(
                    FORMAT_NAME,
                    format!("{length} elements do not fit in a length"),
                )
            })?;
            out.put_u8((I32_LENGTH << LENGTH_TYPE_SHIFT) | data_type);
            out.put_i32(length);
        }
    }
    Ok(())
}

fn put_string(value: &str, out: &mut BytesMut) -> Result<(), FormatError> {
    let bytes = mutf8::encode(value);
    let length = u16::try_from(bytes.len()).map_err(|_| {
        FormatError::unsupported(
            FORMAT_NAME,
            format!("string of {} encoded bytes exceeds 65535", bytes.len()),
        )
    })?;
    out.put_u16(length);
    out.put_slice(&bytes);
    Ok(())
}

fn char_unit(value: char) -> Result<u16, FormatError> {
    u16::try_from(u32::from(value)).map_err(|_| {
        FormatError::unsupported(
            FORMAT_NAME,
            format!("char U+{:X} is outside the basic multilingual plane", u32::from(value)),
        )
    })
}

/// Reads nodes from a byte slice.
pub(crate) struct Decoder<'a> {
    buf: &'a [u8],
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, depth: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub(crate) fn node(&mut self) -> Result<Node, FormatError> {
        let header = self.u8()?;
        let data_type = header & DATA_TYPE_MASK;
        let length_type = header >> LENGTH_TYPE_SHIFT;

        let node = match data_type {
            NULL => Node::Null,
            BOOLEAN => Node::Bool(self.u8()? != 0),
            BYTE => Node::Byte(self.fixed(1, |buf| buf.get_i8())?),
            SHORT => Node::Short(self.fixed(2, |buf| buf.get_i16())?),
            INT => Node::Int(self.fixed(4, |buf| buf.get_i32())?),
            LONG => Node::Long(self.fixed(8, |buf| buf.get_i64())?),
            FLOAT => Node::Float(self.fixed(4, |buf| buf.get_f32())?),
            DOUBLE => Node::Double(self.fixed(8, |buf| buf.get_f64())?),
            CHAR => Node::Char(self.char()?),
            STRING => Node::String(self.string()?),
            MAP => {
                let length = self.length(length_type)?;
                self.descend()?;
                let mut map = MapNode::new();
                for _ in 0..length {
                    let key = self.string()?;
                    map.set(key, self.node()?);
                }
                self.depth -= 1;
                Node::Map(map)
            }
            ARRAY => {
                let length = self.length(length_type)?;
                self.descend()?;
                let mut list = ListNode::new();
                for _ in 0..length {
                    list.add(self.node()?);
                }
                self.depth -= 1;
                Node::List(list)
            }
            _ if data_type == ARRAY | STRING => {
                let length = self.length(length_type)?;
                let mut list = ListNode::new();
                for _ in 0..length {
                    list.add(self.string()?);
                }
                Node::List(list)
            }
            _ if data_type & ARRAY != 0 => {
                let length = self.length(length_type)?;
                Node::Array(self.array(data_type & !ARRAY, length)?)
            }
            other => {
                return Err(FormatError::parse(
                    FORMAT_NAME,
                    format!("unknown data type 0x{other:02x}"),
                ));
            }
        };
        Ok(node)
    }

    fn descend(&mut self) -> Result<(), FormatError> {
        if self.depth >= MAX_DEPTH {
            return Err(FormatError::parse(
                FORMAT_NAME,
                format!("nesting deeper than {MAX_DEPTH} levels"),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn array(&mut self, element_type: u8, length: usize) -> Result<ArrayNode, FormatError> {
        Ok(match element_type {
            BOOLEAN => ArrayNode::Bool(self.repeat(length, 1, |buf| buf.get_u8() != 0)?),
            BYTE => ArrayNode::Byte(self.repeat(length, 1, |buf| buf.get_i8())?),
            SHORT => ArrayNode::Short(self.repeat(length, 2, |buf| buf.get_i16())?),
            INT => ArrayNode::Int(self.repeat(length, 4, |buf| buf.get_i32())?),
            LONG => ArrayNode::Long(self.repeat(length, 8, |buf| buf.get_i64())?),
            FLOAT => ArrayNode::Float(self.repeat(length, 4, |buf| buf.get_f32())?),
            DOUBLE => ArrayNode::Double(self.repeat(length, 8, |buf| buf.get_f64())?),
            CHAR => {
                let units = self.repeat(length, 2, |buf| buf.get_u16())?;
                ArrayNode::Char(units.into_iter().map(unit_char).collect::<Result<_, _>>()?)
            }
            other => {
                return Err(FormatError::parse(
                    FORMAT_NAME,
                    format!("unknown array element type 0x{other:02x}"),
                ));
            }
        })
    }

    fn length(&mut self, length_type: u8) -> Result<usize, FormatError> {
        match length_type {
            0..=4 => Ok(usize::from(length_type)),
            U8_LENGTH => self.u8().map(usize::from),
            U16_LENGTH => self.fixed(2, |buf| buf.get_u16()).map(usize::from),
            _ => {
                let length = self.fixed(4, |buf| buf.get_i32())?;
                usize::try_from(length).map_err(|_| {
                    FormatError::parse(FORMAT_NAME, format!("negative length {length}"))
                })
            }
        }
    }

    fn string(&mut self) -> Result<String, FormatError> {
        let length = usize::from(self.fixed(2, |buf| buf.get_u16())?);
        self.need(length)?;
        let (bytes, rest) = self.buf.split_at(length);
        self.buf = rest;
        mutf8::decode(bytes)
            .ok_or_else(|| FormatError::parse(FORMAT_NAME, "malformed modified UTF-8 string"))
    }

    fn char(&mut self) -> Result<char, FormatError> {
        unit_char(self.fixed(2, |buf| buf.get_u16())?)
    }

    fn u8(&mut self) -> Result<u8, FormatError> {
        self.fixed(1, |buf| buf.get_u8())
    }

    fn fixed<T>(
        &mut self,
        size: usize,
        read: impl FnOnce(&mut &'a [u8]) -> T,
    ) -> Result<T, FormatError> {
        self.need(size)?;
        Ok(read(&mut self.buf))
    }

    fn repeat<T>(
        &mut self,
        length: usize,
        size: usize,
        mut read: impl FnMut(&mut &'a [u8]) -> T,
    ) -> Result<Vec<T>, FormatError> {
        self.need(length.saturating_mul(size))?;
        Ok((0..length).map(|_| read(&mut self.buf)).collect())
    }

    fn need(&self, size: usize) -> Result<(), FormatError> {
        if self.buf.remaining() < size {
            return Err(FormatError::parse(
                FORMAT_NAME,
                format!(
                    "unexpected end of input (needed {size} bytes, {} left)",
                    self.buf.remaining()
                ),
            ));
        }
        Ok(())
    }
}

fn unit_char(unit: u16) -> Result<char, FormatError> {
    char::from_u32(u32::from(unit)).ok_or_else(|| {
        FormatError::parse(FORMAT_NAME, format!("unpaired surrogate 0x{unit:04x} as char"))
    })
}
