//! Typed decoders for raw stored bytes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("value is not valid UTF-8")]
    Utf8,

    #[error("value is not an integer: {0:?}")]
    NotAnInteger(String),
}

/// Decodes raw bytes as UTF-8 text.
pub fn utf8(raw: &[u8]) -> Result<String, DecodeError> {
    String::from_utf8(raw.to_vec()).map_err(|_| DecodeError::Utf8)
}

/// Parses raw bytes as a signed decimal integer, ignoring surrounding whitespace.
pub fn integer(raw: &[u8]) -> Result<i64, DecodeError> {
    let text = std::str::from_utf8(raw).map_err(|_| DecodeError::Utf8)?;
    text.trim()
        .parse()
        .map_err(|_| DecodeError::NotAnInteger(text.to_string()))
}
