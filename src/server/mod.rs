//! Connection source: TCP accept loop feeding the HTTP engine.

pub mod listener;
