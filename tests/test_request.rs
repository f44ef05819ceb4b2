use fileserve::http::headers::HeaderSet;
use fileserve::http::parser::ParseError;
use fileserve::http::request::{Method, QUERY_HEADER, Request, RequestLine};

fn request_with(headers: &[(&str, &str)]) -> Request {
    let mut set = HeaderSet::new();
    for (name, value) in headers {
        set.put(*name, *value);
    }

    Request {
        line: RequestLine {
            method: "PUT".to_string(),
            uri: "/upload".to_string(),
            version: "HTTP/1.0".to_string(),
        },
        path: "/upload".to_string(),
        headers: set,
    }
}

#[test]
fn test_method_from_str_ignores_case() {
    let methods = vec![
        ("GET", Method::GET),
        ("head", Method::HEAD),
        ("Put", Method::PUT),
        ("POST", Method::POST),
        ("delete", Method::DELETE),
    ];

    for (method_str, expected_method) in methods {
        assert_eq!(Method::from_str(method_str), Some(expected_method));
    }
}

#[test]
fn test_method_from_str_unknown() {
    assert_eq!(Method::from_str("OPTIONS"), None);
    assert_eq!(Method::from_str("PATCH"), None);
    assert_eq!(Method::from_str(""), None);
}

#[test]
fn test_request_header_lookup_ignores_case() {
    let req = request_with(&[("Host", "example.com"), ("content-type", "text/plain")]);

    assert_eq!(req.header("host"), Some("example.com"));
    assert_eq!(req.header("Content-Type"), Some("text/plain"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_content_length_parsing() {
    let req = request_with(&[("Content-Length", "42")]);
    assert_eq!(req.content_length(), Ok(Some(42)));
}

#[test]
fn test_request_content_length_missing() {
    let req = request_with(&[]);
    assert_eq!(req.content_length(), Ok(None));
}

#[test]
fn test_request_content_length_invalid() {
    let req = request_with(&[("Content-Length", "not-a-number")]);

    assert_eq!(
        req.content_length(),
        Err(ParseError::InvalidContentLength("not-a-number".to_string()))
    );
}

#[test]
fn test_request_query() {
    let req = request_with(&[(QUERY_HEADER, "a=1")]);
    assert_eq!(req.query(), Some("a=1"));
    assert_eq!(request_with(&[]).query(), None);
}
