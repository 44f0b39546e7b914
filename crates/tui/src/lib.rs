//! Terminal client for the SDG Finance personal-finance service.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod ui;
