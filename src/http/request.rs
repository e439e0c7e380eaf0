/// A parsed request line.
///
/// Only the first two whitespace-delimited tokens of the request are kept.
/// The method is not checked against any list of known verbs; the server
/// answers every method the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The request method token (e.g. "GET")
    pub method: String,
    /// The request target (e.g. "/index.html")
    pub target: String,
}

impl Request {
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
        }
    }
}
