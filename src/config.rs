//! Server configuration.
//!
//! Settings come from three layers, later layers winning:
//! built-in defaults, an optional YAML file, and the command line.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   max_connections: 32
//!   read_timeout_ms: 5000
//! static_files:
//!   root: ./public
//!   allow_traversal: false
//! request_log:
//!   path: log.out
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

/// Command line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "staticd")]
#[command(about = "Minimal static file server")]
#[command(version)]
pub struct Cli {
    /// TCP port to listen on
    pub port: u16,

    /// Optional YAML configuration file
    #[arg(short, long, env = "STATICD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory files are served from (defaults to the working directory)
    #[arg(short, long, env = "STATICD_ROOT")]
    pub root: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub request_log: RequestLogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on connections handled at once. 1 gives strictly
    /// sequential service.
    pub max_connections: usize,
    /// Bound on the time spent waiting for the request line. None waits forever.
    pub read_timeout_ms: Option<u64>,
    pub max_request_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
    /// Document served for the target "/".
    pub index: String,
    /// Serve paths that resolve outside `root` (e.g. "/../secret").
    pub allow_traversal: bool,
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestLogConfig {
    pub path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            max_connections: 32,
            read_timeout_ms: None,
            max_request_bytes: 65536,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: "index.html".to_string(),
            allow_traversal: false,
            chunk_size: 65536,
        }
    }
}

impl Default for RequestLogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("log.out"),
        }
    }
}

impl Config {
    /// Builds the effective configuration from parsed arguments.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        cfg.server.port = cli.port;
        if let Some(root) = &cli.root {
            cfg.static_files.root = root.clone();
        }
        if let Some(host) = &cli.host {
            cfg.server.host = host.clone();
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.max_connections == 0 {
            anyhow::bail!("server.max_connections must be at least 1");
        }
        if self.server.max_request_bytes == 0 {
            anyhow::bail!("server.max_request_bytes must be at least 1");
        }
        if self.static_files.chunk_size == 0 {
            anyhow::bail!("static_files.chunk_size must be at least 1");
        }
        if self.static_files.index.is_empty() {
            anyhow::bail!("static_files.index must not be empty");
        }
        Ok(())
    }

    /// Address string handed to the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
