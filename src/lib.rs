//! fileserve - minimal HTTP/1.x file server
//!
//! Serves, stores and deletes files beneath a content base directory, one
//! request per connection.

pub mod config;
pub mod http;
pub mod server;
