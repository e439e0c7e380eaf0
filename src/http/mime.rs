/// Content type used when the extension is missing or not in the table.
pub const DEFAULT_MIME: &str = "application/octet-stream";

const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("gif", "image/gif"),
    ("jpeg", "image/jpeg"),
    ("mp3", "audio/mpeg"),
    ("pdf", "application/pdf"),
];

/// Looks up the extension after the last '.' of `path`.
///
/// Matching is exact and case-sensitive. Returns `None` for unknown or
/// missing extensions.
pub fn lookup(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Content type for `path`, falling back to [`DEFAULT_MIME`].
pub fn mime_for_path(path: &str) -> &'static str {
    lookup(path).unwrap_or(DEFAULT_MIME)
}
