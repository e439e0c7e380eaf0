//! HTTP protocol implementation.
//!
//! This module implements the one-request-per-connection exchange the server
//! speaks: read a request line, resolve its target to a file, answer with a
//! header block and the file bytes (or a fixed error page), then close.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Extracts method and target from the raw request bytes
//! - **`request`**: The parsed request line
//! - **`response`**: Status codes, error pages and header formatting
//! - **`writer`**: Writes header blocks and streams file bodies
//! - **`mime`**: MIME type detection based on file extensions
//! - **`error`**: Per-request error taxonomy
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the request line
//!        └──────┬──────┘
//!               │ bytes received (logged)     read error → Serving500
//!               ▼
//!        ┌─────────────┐
//!        │   Parsing   │                      malformed → Serving500
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │  Resolving  │ ─ not found → Serving404
//!        └──────┬──────┘ ─ open fails → Serving500
//!               ▼
//!        ┌─────────────┐
//!        │ Serving200  │ ← Header, then file body in chunks
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Closed    │ ← Reached from every serving state
//!        └─────────────┘
//! ```

pub mod connection;
pub mod error;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
