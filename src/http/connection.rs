use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::files::{NotFoundReason, PathResolver, Resolution, ResolvedResource};
use crate::http::error::RequestError;
use crate::http::parser::{parse_request_line, ParseError};
use crate::http::request::Request;
use crate::http::response::{ResponseHeader, StatusCode};
use crate::http::writer::{stream_body, BodyError, ResponseWriter};
use crate::server::request_log::RequestLogHandle;

/// Initial read buffer size.
const READ_CHUNK: usize = 4096;

/// Reads of leftover request bytes attempted before closing.
const DRAIN_LIMIT: usize = 64;

/// True once `buf` has enough for the parser to produce an answer other
/// than "need more tokens".
fn holds_request_line(buf: &[u8]) -> bool {
    !matches!(
        parse_request_line(buf),
        Err(ParseError::Empty) | Err(ParseError::MissingTarget)
    )
}

/// Per-connection limits, copied into every connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub max_request_bytes: usize,
    pub chunk_size: usize,
    pub read_timeout: Option<Duration>,
}

/// Shared collaborators every connection needs.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub resolver: Arc<PathResolver>,
    pub request_log: RequestLogHandle,
    pub settings: ConnectionSettings,
}

pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    ctx: ConnectionContext,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Parsing(Bytes),
    Resolving(Request),
    Serving200(ResolvedResource, File),
    Serving404(RequestError),
    Serving500(RequestError),
    Closed,
}

impl ConnectionState {
    /// Error page state for `cause`. Errors without a status of their own
    /// (client I/O) get a best-effort 500.
    pub fn failed(cause: RequestError) -> Self {
        match cause.status() {
            Some(StatusCode::NotFound) => ConnectionState::Serving404(cause),
            _ => ConnectionState::Serving500(cause),
        }
    }

    /// Opens a resolved file. A file that vanished or became unreadable
    /// since the existence check is a 500, a failed lookup a 404.
    pub async fn from_resolution(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Found(resource) => match File::open(&resource.fs_path).await {
                Ok(file) => ConnectionState::Serving200(resource, file),
                Err(source) => {
                    tracing::error!(
                        path = %resource.local_path,
                        error = %source,
                        "Failed to open resolved file"
                    );
                    ConnectionState::failed(RequestError::ResourceUnreadable {
                        path: resource.local_path,
                        source,
                    })
                }
            },
            Resolution::NotFound { local_path, reason } => {
                match &reason {
                    NotFoundReason::OutsideRoot => {
                        tracing::warn!(path = %local_path, "Rejected path outside the served root")
                    }
                    NotFoundReason::NotAFile => {
                        tracing::debug!(path = %local_path, "Target is not a regular file")
                    }
                    NotFoundReason::Missing(e) => {
                        tracing::debug!(path = %local_path, error = %e, "Target not found")
                    }
                }
                ConnectionState::failed(RequestError::ResourceNotFound(local_path))
            }
        }
    }
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, ctx: ConnectionContext) -> Self {
        Self {
            stream,
            peer,
            ctx,
            state: ConnectionState::Reading,
        }
    }

    /// Serves exactly one request, then closes the socket.
    ///
    /// Returns the status sent, or the I/O error that cut the exchange short.
    pub async fn run(&mut self) -> Result<StatusCode, RequestError> {
        let mut outcome = Err(RequestError::ConnectionIo(io::Error::other("no response sent")));

        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await {
                    Ok(raw) => {
                        self.ctx.request_log.append(raw.clone()).await;
                        ConnectionState::Parsing(raw)
                    }
                    Err(e) => {
                        tracing::warn!(peer = %self.peer, error = %e, "Failed to read request");
                        ConnectionState::failed(RequestError::ConnectionIo(e))
                    }
                },

                ConnectionState::Parsing(raw) => match parse_request_line(&raw) {
                    Ok(request) => {
                        tracing::info!(
                            peer = %self.peer,
                            method = %request.method,
                            target = %request.target,
                            "Handling request"
                        );
                        ConnectionState::Resolving(request)
                    }
                    Err(e) => {
                        tracing::warn!(peer = %self.peer, error = %e, "Malformed request");
                        ConnectionState::failed(e.into())
                    }
                },

                ConnectionState::Resolving(request) => self.resolve(&request).await,

                ConnectionState::Serving200(resource, file) => {
                    outcome = self.serve_file(&resource, file).await;
                    ConnectionState::Closed
                }

                ConnectionState::Serving404(cause) | ConnectionState::Serving500(cause) => {
                    outcome = self.serve_error_page(&cause).await;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        self.close().await;
        outcome
    }

    async fn read_request(&mut self) -> io::Result<Bytes> {
        match self.ctx.settings.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.read_request_line())
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "timed out waiting for request"))?,
            None => self.read_request_line().await,
        }
    }

    /// Reads until the buffer holds a method and a target, the first line
    /// ends, the client stops sending, or the size cap is reached.
    async fn read_request_line(&mut self) -> io::Result<Bytes> {
        let max = self.ctx.settings.max_request_bytes;
        let mut buffer = BytesMut::with_capacity(max.min(READ_CHUNK));

        while buffer.len() < max {
            let remaining = (max - buffer.len()) as u64;
            let n = (&mut self.stream).take(remaining).read_buf(&mut buffer).await?;

            if n == 0 {
                // Client finished sending
                break;
            }

            if buffer[buffer.len() - n..].contains(&b'\n') || holds_request_line(&buffer) {
                break;
            }
        }

        Ok(buffer.freeze())
    }

    async fn resolve(&self, request: &Request) -> ConnectionState {
        let resolution = self.ctx.resolver.resolve(&request.target).await;
        ConnectionState::from_resolution(resolution).await
    }

    async fn serve_file(
        &mut self,
        resource: &ResolvedResource,
        file: File,
    ) -> Result<StatusCode, RequestError> {
        let header = ResponseHeader::ok(resource.len, resource.content_type);
        ResponseWriter::new(&header)
            .write_to_stream(&mut self.stream)
            .await
            .map_err(RequestError::ConnectionIo)?;

        // Never send more than the advertised length
        let mut body = file.take(resource.len);
        let sent = stream_body(&mut body, &mut self.stream, self.ctx.settings.chunk_size)
            .await
            .map_err(|e| match e {
                BodyError::Read(source) => RequestError::ResourceUnreadable {
                    path: resource.local_path.clone(),
                    source,
                },
                BodyError::Write(e) => RequestError::ConnectionIo(e),
            })?;

        if sent < resource.len {
            tracing::warn!(
                peer = %self.peer,
                path = %resource.local_path,
                expected = resource.len,
                sent,
                "File shrank while being served"
            );
        }

        tracing::info!(
            peer = %self.peer,
            status = 200,
            path = %resource.local_path,
            bytes = sent,
            "Response sent"
        );
        Ok(StatusCode::Ok)
    }

    async fn serve_error_page(&mut self, cause: &RequestError) -> Result<StatusCode, RequestError> {
        let status = cause.status().unwrap_or(StatusCode::InternalServerError);
        let (header, body) = ResponseHeader::error_page(status);
        ResponseWriter::with_body(&header, body.as_bytes())
            .write_to_stream(&mut self.stream)
            .await
            .map_err(RequestError::ConnectionIo)?;

        tracing::info!(
            peer = %self.peer,
            status = header.status.as_u16(),
            cause = %cause,
            "Response sent"
        );
        Ok(header.status)
    }

    async fn close(&mut self) {
        // Unread request bytes would turn the close into a reset
        let mut scratch = [0u8; 1024];
        for _ in 0..DRAIN_LIMIT {
            match self.stream.try_read(&mut scratch) {
                Ok(n) if n > 0 => continue,
                _ => break,
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(peer = %self.peer, error = %e, "Error closing connection");
        }
    }
}
