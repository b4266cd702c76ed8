//! Port adapters.

mod diagnostics;
mod reqwest_client;

pub use diagnostics::{StdoutDiagnostics, WriterDiagnostics};
pub use reqwest_client::ReqwestHttpClient;
