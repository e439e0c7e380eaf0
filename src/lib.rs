//! staticd - minimal static file server
//!
//! Core library for request handling and the accept loop.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
