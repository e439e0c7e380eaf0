/// Body sent with a 404 response.
pub const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>\n";

/// Body sent with a 500 response.
pub const SERVER_ERROR_BODY: &str = "<h1>500 Internal Server Error</h1>\n";

/// Content type of the fixed error pages.
const ERROR_PAGE_TYPE: &str = "text/html";

/// HTTP status codes the server produces.
///
/// - `Ok` (200): File found and served
/// - `NotFound` (404): Nothing to serve at the target
/// - `InternalServerError` (500): Malformed request or unreadable file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use staticd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the reason phrase written on the status line.
    pub fn reason_phrase(&self) -> &'static str {
        reason_phrase(self.as_u16())
    }

    /// The fixed HTML page sent for error statuses.
    pub fn error_page(&self) -> Option<&'static str> {
        match self {
            StatusCode::Ok => None,
            StatusCode::NotFound => Some(NOT_FOUND_BODY),
            StatusCode::InternalServerError => Some(SERVER_ERROR_BODY),
        }
    }
}

/// Maps a numeric code to its reason phrase. Codes other than 200 and 404
/// all read "Internal Server Error".
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

/// Formats the header block for a response.
///
/// The block uses bare `\n` line endings and ends with a blank line:
///
/// ```
/// # use staticd::http::response::render_header;
/// assert_eq!(
///     render_header(200, 9, "text/html"),
///     "HTTP/1.1 200 OK\nContent-Length: 9\nContent-Type: text/html\n\n"
/// );
/// ```
pub fn render_header(code: u16, content_length: u64, content_type: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\nContent-Length: {}\nContent-Type: {}\n\n",
        code,
        reason_phrase(code),
        content_length,
        content_type
    )
}

/// Status line and the two headers every response carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub status: StatusCode,
    pub content_length: u64,
    pub content_type: String,
}

impl ResponseHeader {
    pub fn new(status: StatusCode, content_length: u64, content_type: impl Into<String>) -> Self {
        Self {
            status,
            content_length,
            content_type: content_type.into(),
        }
    }

    /// Header for a successfully resolved file.
    pub fn ok(content_length: u64, content_type: impl Into<String>) -> Self {
        Self::new(StatusCode::Ok, content_length, content_type)
    }

    /// Header matching the fixed error page of `status`.
    ///
    /// `StatusCode::Ok` has no page and falls back to the 500 page.
    pub fn error_page(status: StatusCode) -> (Self, &'static str) {
        let (status, body) = match status.error_page() {
            Some(body) => (status, body),
            None => (StatusCode::InternalServerError, SERVER_ERROR_BODY),
        };
        (
            Self::new(status, body.len() as u64, ERROR_PAGE_TYPE),
            body,
        )
    }

    pub fn render(&self) -> String {
        render_header(self.status.as_u16(), self.content_length, &self.content_type)
    }
}
