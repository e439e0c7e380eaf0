use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

use crate::config::Config;
use crate::files::{PathResolver, TraversalPolicy};
use crate::http::connection::{Connection, ConnectionContext, ConnectionSettings};
use crate::server::request_log::RequestLog;

/// Pause after a failed accept so a persistent error (e.g. out of file
/// descriptors) does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Owns every resource that lives for the whole process: the listening
/// socket, the request log, and the set of in-flight connections.
pub struct Server {
    listener: TcpListener,
    request_log: RequestLog,
    ctx: ConnectionContext,
    limit: Arc<Semaphore>,
    connections: JoinSet<()>,
}

impl Server {
    /// Opens the request log, checks the served root and binds the listener.
    ///
    /// Any failure here is fatal to the process.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        cfg.validate()?;

        let request_log = RequestLog::create(&cfg.request_log.path)
            .await
            .with_context(|| {
                format!("failed to create request log {}", cfg.request_log.path.display())
            })?;

        let policy = TraversalPolicy::from_allow_flag(cfg.static_files.allow_traversal);
        let resolver = PathResolver::new(
            &cfg.static_files.root,
            cfg.static_files.index.clone(),
            policy,
        )
        .with_context(|| {
            format!("invalid static root {}", cfg.static_files.root.display())
        })?;

        if policy == TraversalPolicy::Allow {
            tracing::warn!("Path traversal allowed, files outside the root can be served");
        }

        let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
            .await
            .with_context(|| format!("failed to bind {}", cfg.listen_addr()))?;

        let addr = listener.local_addr()?;
        info!(
            addr = %addr,
            root = %resolver.root().display(),
            "Listening"
        );

        let settings = ConnectionSettings {
            max_request_bytes: cfg.server.max_request_bytes,
            chunk_size: cfg.static_files.chunk_size,
            read_timeout: cfg.server.read_timeout_ms.map(Duration::from_millis),
        };

        let ctx = ConnectionContext {
            resolver: Arc::new(resolver),
            request_log: request_log.handle(),
            settings,
        };

        Ok(Self {
            listener,
            request_log,
            ctx,
            limit: Arc::new(Semaphore::new(cfg.server.max_connections)),
            connections: JoinSet::new(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` completes, then closes the
    /// listener, every open connection and the request log.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let Server {
            listener,
            request_log,
            ctx,
            limit,
            mut connections,
        } = self;

        tokio::pin!(shutdown);

        loop {
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = limit.clone().acquire_owned() => {
                    permit.context("connection limit closed")?
                }
            };

            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        info!(peer = %peer, "Accepted connection");

                        let ctx = ctx.clone();
                        connections.spawn(async move {
                            let _permit = permit;
                            let mut conn = Connection::new(socket, peer, ctx);
                            match conn.run().await {
                                Ok(status) => tracing::debug!(
                                    peer = %peer,
                                    status = status.as_u16(),
                                    "Connection closed"
                                ),
                                Err(e) => tracing::error!(peer = %peer, error = %e, "Connection error"),
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                }
            }

            while let Some(finished) = connections.try_join_next() {
                if let Err(e) = finished {
                    if e.is_panic() {
                        tracing::error!(error = %e, "Connection task panicked");
                    }
                }
            }
        }

        drop(listener);

        let in_flight = connections.len();
        if in_flight > 0 {
            info!(in_flight, "Closing open connections");
        }
        connections.shutdown().await;

        // The log writer stops once every handle is gone
        drop(ctx);
        request_log.close().await;

        info!("Server stopped");
        Ok(())
    }
}
