//! reqres-check application layer
//!
//! Holds the scenario catalog, the suite runner and the ports they drive.
//! Concrete HTTP and output adapters live in the infrastructure crate.

pub mod diagnostics;
pub mod error;
pub mod naming;
pub mod ports;
pub mod scenarios;
pub mod testing;

pub use diagnostics::render_exchange;
pub use error::{ApplicationError, ApplicationResult};
pub use naming::random_string;
pub use ports::{DiagnosticsSink, HttpClient, HttpClientError, NoopDiagnostics};
pub use scenarios::{RunMode, ScenarioCatalog, ScenarioPlan, SuiteRunner};
pub use testing::AssertionRunner;
