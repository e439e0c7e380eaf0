use std::fmt;

use crate::http::request::Request;

/// Reasons a request line could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace before the end of the first line
    Empty,
    /// Only one token on the first line
    MissingTarget,
    /// Method or target is not valid UTF-8
    InvalidEncoding,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("empty request"),
            ParseError::MissingTarget => f.write_str("request line has no target"),
            ParseError::InvalidEncoding => f.write_str("request line is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Extracts the method and target from the first line of `buf`.
///
/// Tokens past the second one (usually the protocol version) and every
/// following line are ignored.
pub fn parse_request_line(buf: &[u8]) -> Result<Request, ParseError> {
    let line = first_line(buf);
    let mut parts = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    let method = parts.next().ok_or(ParseError::Empty)?;
    let target = parts.next().ok_or(ParseError::MissingTarget)?;

    let method = std::str::from_utf8(method).map_err(|_| ParseError::InvalidEncoding)?;
    let target = std::str::from_utf8(target).map_err(|_| ParseError::InvalidEncoding)?;

    Ok(Request::new(method, target))
}

fn first_line(buf: &[u8]) -> &[u8] {
    match buf.iter().position(|&b| b == b'\n') {
        Some(end) => &buf[..end],
        None => buf,
    }
}
