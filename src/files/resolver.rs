//! Target to file resolution
//!
//! A target is turned into a path relative to the served root by applying
//! the default document rule ("/" becomes "/index.html") and stripping the
//! leading slash. The file must then exist and be a regular file.

use std::io;
use std::path::{Path, PathBuf};

use crate::http::mime::mime_for_path;

/// Whether resolved paths may leave the served root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalPolicy {
    /// Canonicalize and reject anything outside the root
    Contain,
    /// Serve whatever the relative path reaches, ".." included
    Allow,
}

impl TraversalPolicy {
    pub fn from_allow_flag(allow: bool) -> Self {
        if allow {
            TraversalPolicy::Allow
        } else {
            TraversalPolicy::Contain
        }
    }
}

/// A file ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    /// Target with the leading slash stripped (e.g. "img/logo.gif")
    pub local_path: String,
    /// Location on disk
    pub fs_path: PathBuf,
    /// Size in bytes at resolution time
    pub len: u64,
    pub content_type: &'static str,
}

#[derive(Debug)]
pub enum NotFoundReason {
    /// Metadata lookup failed (missing, permission denied, ...)
    Missing(io::Error),
    /// The path exists but is not a regular file
    NotAFile,
    /// The path escapes the served root
    OutsideRoot,
}

#[derive(Debug)]
pub enum Resolution {
    Found(ResolvedResource),
    NotFound {
        local_path: String,
        reason: NotFoundReason,
    },
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    index: String,
    policy: TraversalPolicy,
}

impl PathResolver {
    /// Creates a resolver for `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>, index: impl Into<String>, policy: TraversalPolicy) -> io::Result<Self> {
        let root = std::fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        Ok(Self {
            root,
            index: index.into(),
            policy,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Applies the default document rule and strips the leading slash.
    pub fn local_path(&self, target: &str) -> String {
        if target == "/" {
            return self.index.clone();
        }
        target.strip_prefix('/').unwrap_or(target).to_string()
    }

    pub async fn resolve(&self, target: &str) -> Resolution {
        let local_path = self.local_path(target);
        let joined = self.root.join(&local_path);

        let fs_path = match self.policy {
            TraversalPolicy::Allow => joined,
            TraversalPolicy::Contain => match tokio::fs::canonicalize(&joined).await {
                Ok(canonical) if canonical.starts_with(&self.root) => canonical,
                Ok(_) => {
                    return Resolution::NotFound {
                        local_path,
                        reason: NotFoundReason::OutsideRoot,
                    };
                }
                Err(e) => {
                    return Resolution::NotFound {
                        local_path,
                        reason: NotFoundReason::Missing(e),
                    };
                }
            },
        };

        let metadata = match tokio::fs::metadata(&fs_path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                return Resolution::NotFound {
                    local_path,
                    reason: NotFoundReason::Missing(e),
                };
            }
        };

        if !metadata.is_file() {
            return Resolution::NotFound {
                local_path,
                reason: NotFoundReason::NotAFile,
            };
        }

        Resolution::Found(ResolvedResource {
            content_type: mime_for_path(&local_path),
            len: metadata.len(),
            fs_path,
            local_path,
        })
    }
}
