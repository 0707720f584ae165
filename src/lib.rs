//! Warden - minimal HTTP/1.1 engine
//!
//! Core library for request parsing, routing, resource handlers and
//! response framing.

pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod server;
