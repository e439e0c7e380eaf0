//! Listening socket, accept loop and process-wide resources.

pub mod listener;
pub mod request_log;

pub use listener::Server;
pub use request_log::{RequestLog, RequestLogHandle};
