//! # cobuy
//!
//! Application layer over `cobuy-core`: configuration, the CLI and the
//! HTTP API. The binary in `main.rs` only sets up logging and dispatches.

pub mod api;
pub mod cli;
pub mod config;
