//! Shared wire definitions for the dida HTTP API.
//!
//! Every response body is an [`envelope::ApiEnvelope`]; the payload types
//! carried inside it live in the sibling modules.

pub mod auth;
pub mod envelope;
pub mod project;
pub mod task;
