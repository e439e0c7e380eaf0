#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use staticd::config::Config;
use staticd::server::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Scratch directory removed on drop.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "staticd-{}-{}-{}",
            name,
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let file = self.path.join(relative);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&file, contents).unwrap();
        file
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// A server running in the background on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub log_path: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestServer {
    /// Serves `root`, writing the request log next to it.
    pub async fn start(root: &Path, log_dir: &Path) -> Self {
        Self::start_with(root, log_dir, |_| {}).await
    }

    pub async fn start_with(root: &Path, log_dir: &Path, tweak: impl FnOnce(&mut Config)) -> Self {
        let mut cfg = Config::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.static_files.root = root.to_path_buf();
        cfg.request_log.path = log_dir.join("log.out");
        tweak(&mut cfg);

        let server = Server::bind(&cfg).await.unwrap();
        let addr = server.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server.run_until(async {
            let _ = rx.await;
        }));

        Self {
            addr,
            log_path: cfg.request_log.path,
            shutdown: Some(tx),
            task: Some(task),
        }
    }

    /// Stops the server and waits for it to release its resources.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.unwrap().unwrap();
        }
    }
}

/// Sends raw bytes, half-closes, and reads the whole response.
pub async fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("response timed out")
        .unwrap();
    response
}

pub async fn get(addr: SocketAddr, target: &str) -> Vec<u8> {
    send_raw(addr, format!("GET {} HTTP/1.1\r\n\r\n", target).as_bytes()).await
}

/// Splits a response at the blank line ending the header block.
pub fn split_response(response: &[u8]) -> (String, Vec<u8>) {
    let end = response
        .windows(2)
        .position(|w| w == b"\n\n")
        .expect("no header terminator");
    let head = String::from_utf8(response[..end + 2].to_vec()).unwrap();
    (head, response[end + 2..].to_vec())
}

pub fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines()
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(": "))
}
