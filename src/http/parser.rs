use crate::http::headers::HeaderSet;
use crate::http::request::{QUERY_HEADER, RequestLine};
use thiserror::Error;

/// Longest request or header line accepted, terminator included.
pub const MAX_LINE: usize = 8192;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    InvalidRequest(String),
    #[error("line exceeds {} bytes", MAX_LINE)]
    LineTooLong,
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),
    #[error("header store full, dropped {0:?}")]
    HeadersFull(String),
}

/// Splits a request line into method, escaped URI and version. Exactly three
/// whitespace-delimited tokens are required.
pub fn parse_request_line(line: &str) -> Result<RequestLine, ParseError> {
    let mut parts = line.split_whitespace();

    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(uri), Some(version), None) => Ok(RequestLine {
            method: method.to_string(),
            uri: uri.to_string(),
            version: version.to_string(),
        }),
        _ => Err(ParseError::InvalidRequest(line.to_string())),
    }
}

/// Splits a header line at its first `:`, skipping spaces that lead the
/// value. Lines without a delimiter yield `None`.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    Some((name, value.trim_start_matches(' ')))
}

/// Stores one raw header line into `headers`. Lines without a delimiter are
/// skipped; a full store is reported as an error.
pub fn store_header_line(headers: &mut HeaderSet, line: &str) -> Result<(), ParseError> {
    if let Some((name, value)) = parse_header_line(line) {
        if !headers.put(name, value) {
            return Err(ParseError::HeadersFull(name.to_string()));
        }
    }
    Ok(())
}

/// Cuts the URI at the first `?` or `&`, returning the path part and the
/// query that followed the delimiter.
pub fn split_query(uri: &str) -> (&str, Option<&str>) {
    match uri.find(['?', '&']) {
        Some(i) => (&uri[..i], Some(&uri[i + 1..])),
        None => (uri, None),
    }
}

/// Moves the query of `uri` into `headers` under the synthetic `?` name and
/// returns the remaining path.
pub fn extract_query<'a>(uri: &'a str, headers: &mut HeaderSet) -> Result<&'a str, ParseError> {
    let (path, query) = split_query(uri);
    if let Some(query) = query {
        if !headers.put(QUERY_HEADER, query) {
            return Err(ParseError::HeadersFull(QUERY_HEADER.to_string()));
        }
    }
    Ok(path)
}

/// Removes a trailing `\n` or `\r\n`.
pub fn trim_newline(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Offset just past the first `\n` in `buf`.
pub fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n').map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_needs_three_tokens() {
        let line = parse_request_line("GET /index.html HTTP/1.0").unwrap();
        assert_eq!(line.method, "GET");
        assert_eq!(line.uri, "/index.html");
        assert_eq!(line.version, "HTTP/1.0");

        assert!(parse_request_line("GET /").is_err());
        assert!(parse_request_line("GET / HTTP/1.0 extra").is_err());
        assert!(parse_request_line("").is_err());
    }

    #[test]
    fn query_split_on_first_delimiter() {
        assert_eq!(split_query("/a/b?x=1&y=2"), ("/a/b", Some("x=1&y=2")));
        assert_eq!(split_query("/a&x=1"), ("/a", Some("x=1")));
        assert_eq!(split_query("/plain"), ("/plain", None));
    }
}
