use crate::http::headers::HeaderSet;
use crate::http::parser::ParseError;

/// Name of the synthetic request header that carries the query string.
pub const QUERY_HEADER: &str = "?";

/// HTTP request methods the file server dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Transfer the resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// PUT - Create or replace the resource
    PUT,
    /// POST - Store the request body at the resource path
    POST,
    /// DELETE - Remove a file or an empty directory
    DELETE,
}

impl Method {
    /// Parses an HTTP method name, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use fileserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), Some(Method::GET));
    /// assert_eq!(Method::from_str("PATCH"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        [
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::POST,
            Method::DELETE,
        ]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::PUT => "PUT",
            Method::POST => "POST",
            Method::DELETE => "DELETE",
        }
    }
}

/// The three tokens of a request line, as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Method token exactly as received
    pub method: String,
    /// Percent-encoded request URI, query included
    pub uri: String,
    /// Protocol version token (e.g. "HTTP/1.0")
    pub version: String,
}

/// A request whose line and headers have been read off the wire.
#[derive(Debug, Clone)]
pub struct Request {
    pub line: RequestLine,
    /// Decoded URI path with the query removed
    pub path: String,
    /// Request headers, plus the query under [`QUERY_HEADER`] when present
    pub headers: HeaderSet,
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.find_ignore_case(key)
    }

    /// Query string that followed the first `?` or `&` of the URI.
    pub fn query(&self) -> Option<&str> {
        self.headers.find(QUERY_HEADER, 0)
    }

    /// Parsed `Content-Length`, `Ok(None)` when the header is absent.
    pub fn content_length(&self) -> Result<Option<u64>, ParseError> {
        self.header("Content-Length")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|_| ParseError::InvalidContentLength(v.to_string()))
            })
            .transpose()
    }
}
