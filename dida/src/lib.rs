//! `dida`: terminal client library for the dida to-do app.

pub mod api;
pub mod app;
pub mod command;
pub mod config;
pub mod goto;
pub mod login;
pub mod message;
pub mod router;
pub mod store;
pub mod token;
pub mod ui;
