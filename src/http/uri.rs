//! Percent-decoding of request URIs and their mapping onto the content base.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),
    #[error("decoded URI is not valid UTF-8")]
    InvalidUtf8,
    #[error("URI must start with '/': {0:?}")]
    NotAbsolute(String),
    #[error("URI escapes the content base: {0:?}")]
    Traversal(String),
}

/// Replaces every `%XX` escape with the byte it names. Both characters after
/// `%` must be hex digits. `+` is left as is.
pub fn decode_bytes(escaped: &str) -> Result<Vec<u8>, UriError> {
    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|&b| hex_value(b));
            let lo = bytes.get(i + 2).and_then(|&b| hex_value(b));
            match (hi, lo) {
                (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                _ => return Err(UriError::InvalidEscape(i)),
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    Ok(out)
}

/// Percent-decodes a URI into a string.
pub fn decode_uri(escaped: &str) -> Result<String, UriError> {
    String::from_utf8(decode_bytes(escaped)?).map_err(|_| UriError::InvalidUtf8)
}

/// Appends a decoded, query-free URI path to the content base. The trailing
/// `/` of a directory request is kept. Paths with a `..` segment are refused.
pub fn resolve_uri(content_base: &str, uri: &str) -> Result<String, UriError> {
    if !uri.starts_with('/') {
        return Err(UriError::NotAbsolute(uri.to_string()));
    }
    if uri.split('/').any(|segment| segment == "..") {
        return Err(UriError::Traversal(uri.to_string()));
    }
    Ok(format!("{}{}", content_base, uri))
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
