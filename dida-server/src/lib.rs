//! Dida development backend library.
//!
//! Exposes the HTTP server so tests and tools can embed it. The server keeps
//! tasks and projects in memory, issues bearer tokens on sign-in, and wraps
//! every body in the `{code, data, message}` envelope.

pub mod config;
pub mod server;
pub mod store;
