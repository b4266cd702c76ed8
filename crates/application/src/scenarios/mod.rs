//! The scenario catalog and the runner that executes it.

mod catalog;
mod runner;

pub use catalog::{ScenarioCatalog, ScenarioPlan};
pub use runner::{RunMode, SuiteRunner};
