/// HTTP status codes produced by the file server.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): PUT created a new resource
/// - `BadRequest` (400): Malformed request line or URI
/// - `NotFound` (404): Resource not found
/// - `MethodNotAllowed` (405): Operation impossible on this resource
/// - `LengthRequired` (411): Upload without `Content-Length`
/// - `NotImplemented` (501): Unrecognized method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 411 Length Required
    LengthRequired,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use fileserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::LengthRequired.as_u16(), 411);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::LengthRequired => 411,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// Minimal HTML page naming the status in both title and body.
pub fn error_page(code: u16, reason: &str) -> String {
    format!(
        "<html><head><title>{code} {reason}</title></head><body>{code} {reason}</body></html>"
    )
}
