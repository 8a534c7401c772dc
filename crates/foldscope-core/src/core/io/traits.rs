use super::error::ReadError;
use crate::core::models::molecule::Molecule;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Defines the interface for reading a structure file format into a [`Molecule`].
///
/// Implementors only provide [`read_str`](StructureFile::read_str), which must be
/// total: content problems are recovered record by record. The provided methods
/// add the decoding and I/O steps, which are the only ways reading can fail.
pub trait StructureFile {
    /// Parses already-decoded text.
    ///
    /// # Arguments
    ///
    /// * `source_name` - The file name the text came from; becomes the molecule id.
    /// * `text` - The full file content.
    fn read_str(source_name: &str, text: &str) -> Molecule;

    /// Decodes raw bytes as UTF-8 and parses them.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Decoding`] if the bytes are not valid UTF-8.
    fn read_bytes(source_name: &str, bytes: Vec<u8>) -> Result<Molecule, ReadError> {
        let text = String::from_utf8(bytes)?;
        Ok(Self::read_str(source_name, &text))
    }

    /// Reads the whole stream and parses it.
    ///
    /// Line endings are handled by [`read_str`](StructureFile::read_str), so the
    /// stream is consumed as bytes rather than through a line reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the stream fails or its content is not UTF-8.
    fn read_from(source_name: &str, reader: &mut impl Read) -> Result<Molecule, ReadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::read_bytes(source_name, bytes)
    }

    /// Reads a structure file from disk, using its file name as the source name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read, or is not UTF-8.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Molecule, ReadError> {
        let path = path.as_ref();
        let source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&source_name, &mut reader)
    }
}
