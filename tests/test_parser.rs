use staticd::http::parser::{ParseError, parse_request_line};

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.target, "/");
}

#[test]
fn test_parse_ignores_tokens_after_target() {
    let req = b"GET /index.html HTTP/1.1 extra tokens\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.target, "/index.html");
}

#[test]
fn test_parse_without_version() {
    let parsed = parse_request_line(b"GET /a.pdf").unwrap();

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.target, "/a.pdf");
}

#[test]
fn test_parse_method_is_not_checked() {
    let parsed = parse_request_line(b"BREW /pot HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(parsed.method, "BREW");
    assert_eq!(parsed.target, "/pot");
}

#[test]
fn test_parse_target_is_not_checked() {
    let parsed = parse_request_line(b"GET ../../etc/passwd HTTP/1.1\r\n").unwrap();

    assert_eq!(parsed.target, "../../etc/passwd");
}

#[test]
fn test_parse_tolerates_repeated_whitespace() {
    let parsed = parse_request_line(b"GET \t  /x.gif   HTTP/1.1\r\n").unwrap();

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.target, "/x.gif");
}

#[test]
fn test_parse_empty_request() {
    assert_eq!(parse_request_line(b""), Err(ParseError::Empty));
    assert_eq!(parse_request_line(b"   \r\n"), Err(ParseError::Empty));
}

#[test]
fn test_parse_single_token() {
    assert_eq!(parse_request_line(b"GET"), Err(ParseError::MissingTarget));
    assert_eq!(parse_request_line(b"GARBAGE\r\n\r\n"), Err(ParseError::MissingTarget));
}

#[test]
fn test_parse_invalid_utf8() {
    let result = parse_request_line(b"GET /\xff\xfe HTTP/1.1\r\n");

    assert!(matches!(result, Err(ParseError::InvalidEncoding)));
}
