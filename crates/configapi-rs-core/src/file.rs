//! File format abstraction.

use crate::FormatError;
use log::debug;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Reads and writes a node tree in one concrete format.
pub trait FileFormat {
    /// Root node type produced by [`FileFormat::load`].
    type Node: Default;

    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    fn load(&self, reader: &mut dyn Read) -> Result<Self::Node, FormatError>;

    fn save(&self, node: &Self::Node, writer: &mut dyn Write) -> Result<(), FormatError>;

    /// Load `path`. A missing file yields an empty root.
    fn load_path(&self, path: &Path) -> Result<Self::Node, FormatError> {
        if !path.exists() {
            debug!(
                "file missing, using empty root (format={}, path={})",
                self.name(),
                path.display()
            );
            return Ok(Self::Node::default());
        }

        debug!(
            "loading file (format={}, path={})",
            self.name(),
            path.display()
        );
        let mut reader = BufReader::new(File::open(path)?);
        self.load(&mut reader)
    }

    /// Save to `path`, creating parent directories as needed.
    fn save_path(&self, node: &Self::Node, path: &Path) -> Result<(), FormatError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        debug!(
            "saving file (format={}, path={})",
            self.name(),
            path.display()
        );
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(node, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Formats with a textual representation.
pub trait TextFileFormat: FileFormat {
    fn load_str(&self, text: &str) -> Result<Self::Node, FormatError> {
        self.load(&mut text.as_bytes())
    }

    fn save_to_string(&self, node: &Self::Node) -> Result<String, FormatError> {
        let mut buffer = Vec::new();
        self.save(node, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| FormatError::parse(self.name(), err.to_string()))
    }
}

/// Read all of `reader` as UTF-8 text.
pub fn read_to_string(reader: &mut dyn Read, format: &'static str) -> Result<String, FormatError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    String::from_utf8(bytes).map_err(|err| FormatError::parse(format, err.to_string()))
}
