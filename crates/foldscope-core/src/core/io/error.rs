use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Failure to obtain the text of a structure file.
///
/// Malformed records are never reported here; they are dropped while parsing.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("File content is not valid UTF-8: {0}")]
    Decoding(#[from] FromUtf8Error),
}
