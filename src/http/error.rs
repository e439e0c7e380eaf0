use std::fmt;
use std::io;

use crate::http::parser::ParseError;
use crate::http::response::StatusCode;

/// Everything that can go wrong while serving one connection.
///
/// None of these escape the connection task; each either becomes an error
/// page or ends the exchange early.
#[derive(Debug)]
pub enum RequestError {
    /// The request line could not be parsed
    MalformedRequest(ParseError),
    /// Nothing servable at the resolved path
    ResourceNotFound(String),
    /// The file passed the existence check but could not be opened or read
    ResourceUnreadable { path: String, source: io::Error },
    /// Reading from or writing to the client failed
    ConnectionIo(io::Error),
}

impl RequestError {
    /// Status answered for this error, if the socket is still usable.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::MalformedRequest(_) => Some(StatusCode::InternalServerError),
            RequestError::ResourceNotFound(_) => Some(StatusCode::NotFound),
            RequestError::ResourceUnreadable { .. } => Some(StatusCode::InternalServerError),
            RequestError::ConnectionIo(_) => None,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MalformedRequest(e) => write!(f, "malformed request: {}", e),
            RequestError::ResourceNotFound(path) => write!(f, "resource not found: {}", path),
            RequestError::ResourceUnreadable { path, source } => {
                write!(f, "resource {} unreadable: {}", path, source)
            }
            RequestError::ConnectionIo(e) => write!(f, "connection I/O error: {}", e),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::MalformedRequest(e) => Some(e),
            RequestError::ResourceNotFound(_) => None,
            RequestError::ResourceUnreadable { source, .. } => Some(source),
            RequestError::ConnectionIo(e) => Some(e),
        }
    }
}

impl From<ParseError> for RequestError {
    fn from(e: ParseError) -> Self {
        RequestError::MalformedRequest(e)
    }
}
