//! reqres-check - entry point
//!
//! Parses flags, sets up logging, runs the selected scenarios and maps the
//! outcome to an exit code.

mod cli;
mod error;
mod output;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use reqres_application::{DiagnosticsSink, NoopDiagnostics, SuiteRunner};
use reqres_domain::RunReport;
use reqres_infrastructure::{ReqwestHttpClient, StdoutDiagnostics, WriterDiagnostics};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, OutputFormat};
use crate::error::{CliError, EXIT_FAILED};
use crate::output::{OutputWriter, ScenarioListing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "reqres-check failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Logs go to stderr so stdout carries only diagnostics and the report.
fn init_tracing(log_level: Option<&str>) {
    let filter = log_level.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        EnvFilter::new,
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let writer = OutputWriter::new(cli.output);

    if cli.list {
        writer.render(&ScenarioListing::all())?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = cli.runner_config();
    let catalog = config.catalog()?;
    let client = ReqwestHttpClient::new(&config)?;

    // JSON mode keeps stdout for the report.
    let diagnostics: Arc<dyn DiagnosticsSink> = match (cli.quiet, cli.output) {
        (true, _) => Arc::new(NoopDiagnostics),
        (false, OutputFormat::Text) => Arc::new(StdoutDiagnostics::stdout()),
        (false, OutputFormat::Json) => Arc::new(WriterDiagnostics::new(io::stderr())),
    };

    let runner = SuiteRunner::new(Arc::new(client), diagnostics, catalog).with_mode(config.mode);

    tracing::info!(base_url = %config.base_url, mode = ?config.mode, "starting run");
    writer.banner(&format!("Running API checks against {}...", config.base_url))?;

    let report = runner.run_selected(&cli.selection()).await?;

    writer.banner("All checks finished.")?;
    writer.render(&report)?;

    tracing::info!(
        run_id = %report.run_id,
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        "run finished"
    );

    Ok(ExitCode::from(exit_status(&report)))
}

/// Exit status for a finished run: skips alone still succeed.
fn exit_status(report: &RunReport) -> u8 {
    if report.succeeded() { 0 } else { EXIT_FAILED }
}
