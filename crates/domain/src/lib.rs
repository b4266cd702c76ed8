//! reqres domain - core types
//!
//! This crate defines the domain model for the reqres API check runner:
//! requests, responses, assertions, scenarios and run reports.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod report;
pub mod request;
pub mod response;
pub mod scenario;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use report::{RunReport, ScenarioResult};
pub use scenario::{CreatedUser, Requirement, RunContext, ScenarioId};
pub use testing::{Assertion, AssertionFailure, ScenarioOutcome};
