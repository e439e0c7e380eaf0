mod common;

use bytes::Bytes;
use common::TempDir;
use staticd::server::request_log::{ENTRY_SEPARATOR, RequestLog};

#[tokio::test]
async fn test_log_entries_are_appended_in_order() {
    let dir = TempDir::new("log");
    let path = dir.path().join("log.out");

    let log = RequestLog::create(&path).await.unwrap();
    let handle = log.handle();
    handle.append(Bytes::from_static(b"GET / HTTP/1.1\r\n\r\n")).await;
    handle.append(Bytes::from_static(b"GET /a.gif HTTP/1.1\r\n\r\n")).await;
    drop(handle);
    log.close().await;

    let contents = std::fs::read(&path).unwrap();
    let mut expected = Vec::new();
    expected.extend_from_slice(ENTRY_SEPARATOR);
    expected.extend_from_slice(b"GET / HTTP/1.1\r\n\r\n");
    expected.extend_from_slice(ENTRY_SEPARATOR);
    expected.extend_from_slice(b"GET /a.gif HTTP/1.1\r\n\r\n");
    assert_eq!(contents, expected);
}

#[tokio::test]
async fn test_log_is_truncated_on_create() {
    let dir = TempDir::new("log");
    let path = dir.write("log.out", b"stale entries from a previous run");

    let log = RequestLog::create(&path).await.unwrap();
    log.close().await;

    assert!(std::fs::read(&path).unwrap().is_empty());
}

#[tokio::test]
async fn test_log_records_empty_request() {
    let dir = TempDir::new("log");
    let path = dir.path().join("log.out");

    let log = RequestLog::create(&path).await.unwrap();
    log.handle().append(Bytes::new()).await;
    log.close().await;

    assert_eq!(std::fs::read(&path).unwrap(), ENTRY_SEPARATOR.to_vec());
}

#[tokio::test]
async fn test_log_create_fails_for_missing_directory() {
    let dir = TempDir::new("log");

    assert!(RequestLog::create(dir.path().join("no/such/dir/log.out")).await.is_err());
}
