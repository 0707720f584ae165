//! HTTP protocol implementation.
//!
//! This module implements a one-request-per-connection HTTP/1.1 engine.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: Drives one connection through the request-response state machine
//! - **`parser`**: Parses an incoming request out of a single read
//! - **`request`**: Request representation, methods and the retained header set
//! - **`encoding`**: `Accept-Encoding` negotiation and gzip encoding
//! - **`router`**: Maps a request target onto a `ResourceKind`
//! - **`response`**: Response representation with builder pattern
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One read of the request bytes
//!        └──────┬──────┘
//!               │ Request parsed      (malformed / empty → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route and run the handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warden::http::connection::Connection;
//! use warden::resources::Resources;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:4221").await?;
//!     let resources = Arc::new(Resources::new(None));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let resources = resources.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, resources);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod encoding;
pub mod router;
pub mod connection;
pub mod writer;
