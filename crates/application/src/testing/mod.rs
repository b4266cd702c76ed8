//! Response testing.
//!
//! This module provides the runner that evaluates assertions against HTTP responses.

mod runner;

pub use runner::AssertionRunner;
