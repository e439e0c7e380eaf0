use staticd::http::mime::{DEFAULT_MIME, lookup, mime_for_path};

#[test]
fn test_known_extensions() {
    let table = vec![
        ("index.html", "text/html"),
        ("img/anim.gif", "image/gif"),
        ("photo.jpeg", "image/jpeg"),
        ("song.mp3", "audio/mpeg"),
        ("paper.pdf", "application/pdf"),
    ];

    for (path, expected) in table {
        assert_eq!(mime_for_path(path), expected, "{}", path);
    }
}

#[test]
fn test_last_extension_wins() {
    assert_eq!(mime_for_path("archive.pdf.html"), "text/html");
    assert_eq!(mime_for_path("page.html.bak"), DEFAULT_MIME);
}

#[test]
fn test_unknown_extension_falls_back() {
    assert_eq!(lookup("notes.txt"), None);
    assert_eq!(mime_for_path("notes.txt"), "application/octet-stream");
    assert_eq!(mime_for_path("photo.jpg"), DEFAULT_MIME);
}

#[test]
fn test_missing_extension_falls_back() {
    assert_eq!(lookup("Makefile"), None);
    assert_eq!(mime_for_path("Makefile"), DEFAULT_MIME);
    assert_eq!(mime_for_path("trailing."), DEFAULT_MIME);
}

#[test]
fn test_matching_is_case_sensitive() {
    assert_eq!(mime_for_path("INDEX.HTML"), DEFAULT_MIME);
}
