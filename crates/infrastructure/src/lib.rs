//! reqres-check infrastructure - adapters and configuration
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod config;

pub use adapters::{ReqwestHttpClient, StdoutDiagnostics, WriterDiagnostics};
pub use config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, RunnerConfig};
