//! HTTP/1.x request processing for the file server.
//!
//! # Architecture
//!
//! - **`connection`**: Reads one request off a stream and drives it to a response
//! - **`methods`**: GET, HEAD, PUT, POST and DELETE handlers
//! - **`parser`**: Request-line, header-line and query parsing
//! - **`headers`**: Ordered header store used for both requests and responses
//! - **`uri`**: Percent-decoding and mapping of URIs onto the content base
//! - **`mime`**: Media type lookup by file extension
//! - **`listing`**: HTML index pages for directory requests
//! - **`response`**: Status codes and the error page
//! - **`writer`**: Serializes status lines, header blocks and error pages
//!
//! # Request Pipeline
//!
//! Every connection carries exactly one request:
//!
//! ```text
//!        ┌──────────────────┐
//!        │  Request line    │ ← unreadable: close without a response
//!        └──────┬───────────┘   malformed: 400
//!               ▼
//!        ┌──────────────────┐
//!        │  Headers, query  │ ← query stored under "?"
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │  Decode/resolve  │ ← bad escape or ".." segment: 400
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │  Method handler  │ ← unknown method: 501
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │  Flush and close │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fileserve::http::connection::Connection;
//! use fileserve::server::context::ServerContext;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = Arc::new(ServerContext::new(Default::default(), Default::default()));
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let ctx = Arc::clone(&ctx);
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, ctx).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod headers;
pub mod listing;
pub mod methods;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod uri;
pub mod writer;
