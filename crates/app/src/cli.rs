//! CLI argument parsing using clap derive API
//!
//! Purely declarative; turning flags into a [`RunnerConfig`] is the only
//! logic here.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use reqres_application::RunMode;
use reqres_domain::ScenarioId;
use reqres_infrastructure::{DEFAULT_BASE_URL, RunnerConfig};

/// Checks the reqres demo API scenario by scenario.
///
/// Scenarios run in a fixed order; update and delete checks reuse the user
/// created earlier in the same run.
#[derive(Parser, Debug)]
#[command(name = "reqres-check", version, about, long_about = None)]
pub struct Cli {
    /// Base URL the scenario paths are appended to.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Value for the `x-api-key` header.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Keep running after a scenario fails.
    #[arg(long)]
    pub keep_going: bool,

    /// Run only this scenario (repeatable). Order on the command line is
    /// ignored; scenarios always run in catalog order.
    #[arg(long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<ScenarioId>,

    /// List the scenarios and exit.
    #[arg(long)]
    pub list: bool,

    /// Do not print request/response diagnostics.
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format for the report.
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl Cli {
    /// Configuration for this invocation.
    pub fn runner_config(&self) -> RunnerConfig {
        let mode = if self.keep_going {
            RunMode::ContinueOnFailure
        } else {
            RunMode::FailFast
        };

        RunnerConfig::new()
            .with_base_url(self.base_url.as_str())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_api_key(self.api_key.clone())
            .with_mode(mode)
    }

    /// Scenarios to run; all of them when none were named.
    pub fn selection(&self) -> Vec<ScenarioId> {
        if self.scenarios.is_empty() {
            ScenarioId::ALL.to_vec()
        } else {
            self.scenarios.clone()
        }
    }
}
