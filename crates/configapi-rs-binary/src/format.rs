use crate::codec::{self, Decoder};
use bytes::BytesMut;
use configapi_rs_core::{FileFormat, FormatError, Node};
use log::trace;
use std::io::{Read, Write};

pub(crate) const FORMAT_NAME: &str = "binary";

/// Binary format. Reads and writes byte streams only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinaryFormat;

impl BinaryFormat {
    pub const DEFAULT: BinaryFormat = BinaryFormat;

    /// Encode `node` into a new buffer.
    pub fn to_bytes(&self, node: &Node) -> Result<Vec<u8>, FormatError> {
        let mut out = BytesMut::new();
        codec::encode(node, &mut out)?;
        trace!("encoded binary node (bytes={})", out.len());
        Ok(out.to_vec())
    }

    /// Decode exactly one node from `bytes`.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Node, FormatError> {
        if bytes.is_empty() {
            return Err(FormatError::parse(FORMAT_NAME, "empty input"));
        }

        let mut decoder = Decoder::new(bytes);
        let node = decoder.node()?;
        if decoder.remaining() > 0 {
            return Err(FormatError::parse(
                FORMAT_NAME,
                format!("{} trailing bytes after the root node", decoder.remaining()),
            ));
        }
        Ok(node)
    }
}

impl FileFormat for BinaryFormat {
    type Node = Node;

    fn name(&self) -> &'static str {
        FORMAT_NAME
    }

    fn load(&self, reader: &mut dyn Read) -> Result<Node, FormatError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.from_bytes(&bytes)
    }

    fn save(&self, node: &Node, writer: &mut dyn Write) -> Result<(), FormatError> {
        writer.write_all(&self.to_bytes(node)?)?;
        Ok(())
    }
}
